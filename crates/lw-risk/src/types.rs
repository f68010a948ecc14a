use serde::{Deserialize, Serialize};

/// Calendar-day window approximating the regulator's 10-trading-day count.
pub const SHORT_WINDOW_DAYS: i64 = 14;

/// Calendar-day window approximating the regulator's 30-trading-day count.
pub const LONG_WINDOW_DAYS: i64 = 45;

/// Largest whole-day gap between two flag dates still treated as adjacent
/// trading days. Absorbs a single weekend; it is a heuristic, not a
/// trading-calendar lookup.
pub const RUN_GAP_TOLERANCE_DAYS: i64 = 3;

/// Most-recent flag dates considered per assessment. Window counts can
/// under-count when the true history exceeds this cap; that is accepted.
pub const HISTORY_CAP: usize = 30;

/// Tier thresholds. Evaluated most severe first; first match wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thresholds {
    /// Consecutive run at or above this is Danger.
    pub danger_consecutive_run: u32,
    /// Short-window count at or above this is Danger.
    pub danger_short_window: u32,
    /// Long-window count at or above this is Danger.
    pub danger_long_window: u32,

    /// Consecutive run exactly equal to this is Warning.
    pub warning_consecutive_run: u32,
    /// Short-window count at or above this is Warning.
    pub warning_short_window: u32,
    /// Long-window count at or above this is Warning.
    pub warning_long_window: u32,
}

impl Thresholds {
    /// The regulator's published escalation rules.
    pub fn sane_defaults() -> Self {
        Self {
            danger_consecutive_run: 3,
            danger_short_window: 6,
            danger_long_window: 12,
            warning_consecutive_run: 2,
            warning_short_window: 4,
            warning_long_window: 9,
        }
    }
}

/// Classification output category. Ordered so callers can sort by severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Safe,
    Warning,
    Danger,
}

/// One security's classification. Derived on every query; never persisted.
///
/// All three raw counters are carried regardless of tier so a caller can
/// re-derive or override the tiering policy without re-querying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub code: String,
    pub tier: RiskTier,
    /// Danger reports the raw counters; Warning is a fixed note; Safe none.
    pub reason: Option<String>,
    pub consecutive_run: u32,
    pub in_short_window: u32,
    pub in_long_window: u32,
}
