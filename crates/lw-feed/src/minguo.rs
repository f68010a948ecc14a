//! Minguo (offset-calendar) date normalization.
//!
//! The regulator publishes dates with the year counted from 1911, in two
//! shapes: a 7-digit compact form (`1130120`) and a slash form (`113/01/20`).
//! Disposition periods arrive as two slash dates joined by a full-width
//! tilde (`115/01/20～115/02/02`).
//!
//! Everything in this module is total: malformed input yields
//! [`UNDEFINED_DATE`], never an error. Callers must treat the sentinel as
//! "unknown" and guard for it before any date-range comparison.

use chrono::NaiveDate;

/// Offset between the regulator's year numbering and the Gregorian year.
pub const YEAR_OFFSET: i32 = 1911;

/// Separator between the two sides of a period range string.
pub const RANGE_SEPARATOR: char = '\u{ff5e}'; // ～

/// Sentinel returned for any date string that cannot be normalized.
pub const UNDEFINED_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
    Some(d) => d,
    None => panic!("sentinel date must construct"),
};

/// True when `date` is the [`UNDEFINED_DATE`] sentinel.
pub fn is_undefined(date: NaiveDate) -> bool {
    date == UNDEFINED_DATE
}

/// Normalize a minguo date string to a Gregorian date.
///
/// Accepts `YYYMMDD` and `YYY/MM/DD`. Returns [`UNDEFINED_DATE`] for the
/// wrong length, non-digit characters, or an out-of-range month/day.
pub fn parse_date(s: &str) -> NaiveDate {
    let s = s.trim();
    if s.contains('/') {
        parse_slash(s)
    } else {
        parse_compact(s)
    }
}

/// Split a `START～END` period string and normalize each side.
///
/// A side that is missing (fewer than two parts after the split) or
/// malformed comes back as [`UNDEFINED_DATE`].
pub fn parse_range(s: &str) -> (NaiveDate, NaiveDate) {
    let mut parts = s.split(RANGE_SEPARATOR);
    let start = match parts.next() {
        Some(p) => parse_date(p),
        None => UNDEFINED_DATE,
    };
    let end = match parts.next() {
        Some(p) => parse_date(p),
        None => UNDEFINED_DATE,
    };
    (start, end)
}

fn parse_compact(s: &str) -> NaiveDate {
    if s.len() != 7 || !s.chars().all(|c| c.is_ascii_digit()) {
        return UNDEFINED_DATE;
    }
    from_offset_parts(&s[..3], &s[3..5], &s[5..7])
}

fn parse_slash(s: &str) -> NaiveDate {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 {
        return UNDEFINED_DATE;
    }
    from_offset_parts(parts[0].trim(), parts[1].trim(), parts[2].trim())
}

fn from_offset_parts(year: &str, month: &str, day: &str) -> NaiveDate {
    let year: i32 = match year.parse() {
        Ok(v) => v,
        Err(_) => return UNDEFINED_DATE,
    };
    let month: u32 = match month.parse() {
        Ok(v) => v,
        Err(_) => return UNDEFINED_DATE,
    };
    let day: u32 = match day.parse() {
        Ok(v) => v,
        Err(_) => return UNDEFINED_DATE,
    };
    NaiveDate::from_ymd_opt(year + YEAR_OFFSET, month, day).unwrap_or(UNDEFINED_DATE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
