//! Sliding-window heuristic over a security's attention-flag history.
//!
//! Three signals are computed from the same capped history slice: the
//! longest recent consecutive run, the short-window count, and the
//! long-window count. Thresholds map them to a tier, most severe first.

use chrono::{Duration, NaiveDate};

use crate::types::{
    RiskAssessment, RiskTier, Thresholds, HISTORY_CAP, LONG_WINDOW_DAYS, RUN_GAP_TOLERANCE_DAYS,
    SHORT_WINDOW_DAYS,
};

/// Fixed reason attached to Warning assessments.
pub const WARNING_REASON: &str = "approaching disposition thresholds";

/// Classify one security from its recent attention-flag dates.
///
/// `dates` must be sorted descending (most recent first), contain only dates
/// at or before `reference`, and exclude the undefined-date sentinel. The
/// loader caps the slice to the [`HISTORY_CAP`] most recent events; the cap
/// is re-asserted here so a misbehaving caller cannot widen the windows.
pub fn assess(
    code: &str,
    reference: NaiveDate,
    dates: &[NaiveDate],
    thresholds: &Thresholds,
) -> RiskAssessment {
    let dates = &dates[..dates.len().min(HISTORY_CAP)];

    if dates.is_empty() {
        return RiskAssessment {
            code: code.to_string(),
            tier: RiskTier::Safe,
            reason: None,
            consecutive_run: 0,
            in_short_window: 0,
            in_long_window: 0,
        };
    }

    let run = consecutive_run(dates);
    let in_short_window = count_on_or_after(dates, reference - Duration::days(SHORT_WINDOW_DAYS));
    let in_long_window = count_on_or_after(dates, reference - Duration::days(LONG_WINDOW_DAYS));

    let (tier, reason) = if run >= thresholds.danger_consecutive_run
        || in_short_window >= thresholds.danger_short_window
        || in_long_window >= thresholds.danger_long_window
    {
        (
            RiskTier::Danger,
            Some(format!(
                "consecutive run {run}; {in_short_window} flags in {SHORT_WINDOW_DAYS} days; \
                 {in_long_window} flags in {LONG_WINDOW_DAYS} days"
            )),
        )
    } else if run == thresholds.warning_consecutive_run
        || in_short_window >= thresholds.warning_short_window
        || in_long_window >= thresholds.warning_long_window
    {
        (RiskTier::Warning, Some(WARNING_REASON.to_string()))
    } else {
        (RiskTier::Safe, None)
    };

    RiskAssessment {
        code: code.to_string(),
        tier,
        reason,
        consecutive_run: run,
        in_short_window,
        in_long_window,
    }
}

/// Length of the most-recent run of flag dates whose successive gaps are
/// each within [`RUN_GAP_TOLERANCE_DAYS`] whole days.
///
/// Walks the descending list from the newest date; the walk stops at the
/// first larger gap and later dates do not restart it.
pub fn consecutive_run(dates_desc: &[NaiveDate]) -> u32 {
    let mut run = 0u32;
    for (i, date) in dates_desc.iter().enumerate() {
        if i == 0 {
            run = 1;
            continue;
        }
        let gap = (dates_desc[i - 1] - *date).num_days();
        if gap <= RUN_GAP_TOLERANCE_DAYS {
            run += 1;
        } else {
            break;
        }
    }
    run
}

fn count_on_or_after(dates: &[NaiveDate], cutoff: NaiveDate) -> u32 {
    dates.iter().filter(|d| **d >= cutoff).count() as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
