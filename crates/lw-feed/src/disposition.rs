//! Disposition-list feed client.
//!
//! The upstream endpoint is looser than the attention list in two ways:
//! the payload is either `{"data": [...]}` or a bare array, and each row is
//! a positional array of heterogeneous fields rather than a keyed object.
//! The payload ambiguity is resolved once at the fetch boundary; the row
//! layout is a schema-on-read contract keyed by the column offsets below.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::minguo;

// ---------------------------------------------------------------------------
// Row layout
// ---------------------------------------------------------------------------

/// Announcement date, minguo slash form. Not persisted.
pub const COL_ANNOUNCE_DATE: usize = 1;
/// Security code.
pub const COL_CODE: usize = 2;
/// Security name. The persisted record deliberately does not carry it.
pub const COL_NAME: usize = 3;
/// Restriction period, `START～END` minguo slash dates.
pub const COL_PERIOD: usize = 6;
/// Disposition measures text.
pub const COL_MEASURES: usize = 8;
/// Rows with fewer fields than this are skipped.
pub const MIN_ROW_LEN: usize = 9;

/// A restriction window as extracted from one upstream row.
///
/// Period dates are normalized at fetch time; either side may be the
/// [`minguo::UNDEFINED_DATE`] sentinel when the range string was malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispositionRecord {
    pub code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub measures: String,
}

// ---------------------------------------------------------------------------
// Payload shape
// ---------------------------------------------------------------------------

/// The two payload shapes the endpoint has been observed to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DispositionPayload {
    Tagged { data: Vec<Value> },
    Bare(Vec<Value>),
}

impl DispositionPayload {
    fn into_rows(self) -> Vec<Value> {
        match self {
            DispositionPayload::Tagged { data } => data,
            DispositionPayload::Bare(rows) => rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the disposition-list endpoint.
#[derive(Debug, Clone)]
pub struct DispositionFeed {
    http: reqwest::Client,
    url: String,
}

impl DispositionFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch the current disposition list.
    ///
    /// A transport or payload-level decode failure is logged and degraded to
    /// an empty batch. A failure inside a single row skips that row only.
    pub async fn fetch(&self) -> Vec<DispositionRecord> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(err) => {
                error!(error = ?err, "disposition feed fetch failed");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<DispositionRecord>> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("disposition feed request failed")?
            .error_for_status()
            .context("disposition feed returned error status")?;

        let payload = resp
            .json::<DispositionPayload>()
            .await
            .context("disposition feed json decode failed")?;

        Ok(parse_rows(payload.into_rows()))
    }
}

fn parse_rows(rows: Vec<Value>) -> Vec<DispositionRecord> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(cells) = row.as_array() else {
            warn!(row = %row, "disposition row is not an array; skipped");
            continue;
        };
        if cells.len() < MIN_ROW_LEN {
            debug!(len = cells.len(), "short disposition row skipped");
            continue;
        }
        match parse_row(cells) {
            Ok(Some(rec)) => out.push(rec),
            Ok(None) => {} // blank code
            Err(err) => {
                warn!(error = ?err, row = %row, "disposition row parse failed; skipped");
            }
        }
    }
    out
}

/// Decode one positional row. `Ok(None)` means a structurally fine row with
/// a blank code, which the upstream list does contain for section headers.
fn parse_row(cells: &[Value]) -> Result<Option<DispositionRecord>> {
    let code = text_cell(cells, COL_CODE).context("code cell")?;
    if code.is_empty() {
        return Ok(None);
    }

    let period = text_cell(cells, COL_PERIOD).context("period cell")?;
    let (start_date, end_date) = minguo::parse_range(&period);

    let measures = text_cell(cells, COL_MEASURES).context("measures cell")?;

    Ok(Some(DispositionRecord {
        code,
        start_date,
        end_date,
        measures,
    }))
}

/// Read a cell as trimmed text. Null and absent cells read as empty; any
/// non-scalar cell is a row-level failure.
fn text_cell(cells: &[Value], idx: usize) -> Result<String> {
    match cells.get(idx) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(anyhow!("expected text at column {idx}, got {other}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_row(code: &str, period: &str, measures: &str) -> Value {
        json!([
            "1",
            "115/01/19",
            code,
            "某公司",
            "x",
            "notice",
            period,
            "type",
            measures,
        ])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tagged_payload_resolves_to_rows() {
        let payload: DispositionPayload =
            serde_json::from_value(json!({ "data": [full_row("2330", "115/01/20～115/02/02", "m")] }))
                .unwrap();
        assert_eq!(payload.into_rows().len(), 1);
    }

    #[test]
    fn bare_payload_resolves_to_rows() {
        let payload: DispositionPayload =
            serde_json::from_value(json!([full_row("2330", "115/01/20～115/02/02", "m")])).unwrap();
        assert_eq!(payload.into_rows().len(), 1);
    }

    #[test]
    fn row_decodes_by_position() {
        let rows = parse_rows(vec![full_row("2330", "115/01/20～115/02/02", "分盤交易")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "2330");
        assert_eq!(rows[0].start_date, date(2026, 1, 20));
        assert_eq!(rows[0].end_date, date(2026, 2, 2));
        assert_eq!(rows[0].measures, "分盤交易");
    }

    #[test]
    fn short_row_is_skipped() {
        let rows = parse_rows(vec![
            json!(["1", "115/01/19", "2330"]),
            full_row("2603", "115/01/20～115/02/02", "m"),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "2603");
    }

    #[test]
    fn blank_code_row_is_skipped() {
        let rows = parse_rows(vec![full_row("", "115/01/20～115/02/02", "m")]);
        assert!(rows.is_empty());
    }

    #[test]
    fn bad_cell_skips_that_row_only() {
        let bad = json!(["1", "115/01/19", ["not", "text"], "n", "x", "y", "p", "t", "m"]);
        let rows = parse_rows(vec![bad, full_row("2603", "115/01/20～115/02/02", "m")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "2603");
    }

    #[test]
    fn non_array_row_is_skipped() {
        let rows = parse_rows(vec![json!({"not": "a row"})]);
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_period_yields_sentinel_dates() {
        let rows = parse_rows(vec![full_row("2330", "nonsense", "m")]);
        assert_eq!(rows.len(), 1);
        assert!(minguo::is_undefined(rows[0].start_date));
        assert!(minguo::is_undefined(rows[0].end_date));
    }

    #[test]
    fn numeric_code_cell_reads_as_text() {
        let row = json!(["1", "115/01/19", 2330, "n", "x", "y", "115/01/20～115/02/02", "t", "m"]);
        let rows = parse_rows(vec![row]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "2330");
    }

    #[test]
    fn null_measures_reads_as_empty() {
        let row = json!(["1", "115/01/19", "2330", "n", "x", "y", "115/01/20～115/02/02", "t", null]);
        let rows = parse_rows(vec![row]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].measures, "");
    }
}
