//! lw-risk
//!
//! Escalation-risk classification for watch-listed securities. Pure and
//! synchronous: callers load the flag-date history (lw-db) and hand it in;
//! nothing here touches the network or the database.

pub mod engine;
pub mod types;

pub use engine::{assess, consecutive_run, WARNING_REASON};
pub use types::{
    RiskAssessment, RiskTier, Thresholds, HISTORY_CAP, LONG_WINDOW_DAYS, RUN_GAP_TOLERANCE_DAYS,
    SHORT_WINDOW_DAYS,
};
