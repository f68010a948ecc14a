use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A listed security as tracked in the registry.
///
/// Created on first sighting from either feed and never deleted. The name is
/// the code itself when the security was first seen via the disposition feed,
/// which carries no name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    pub code: String,
    pub name: String,
}

/// "Security X was flagged for attention on date D."
///
/// At most one event exists per `(code, date)` pair; the ingestion merger
/// enforces this, not the storage schema. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionEvent {
    pub code: String,
    pub date: NaiveDate,
    pub reason: Option<String>,
}

/// A trading-restriction window imposed by the regulator.
///
/// `end_date` is inclusive. Identity is `(code, start_date)`; a later row
/// with the same start is dropped even if its end date or measures differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispositionInterval {
    pub code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub measures: String,
}

/// An attention event joined with its security's display name, as served by
/// the query layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionListing {
    #[serde(flatten)]
    pub event: AttentionEvent,
    pub name: String,
}

/// A disposition interval joined with its security's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispositionListing {
    #[serde(flatten)]
    pub interval: DispositionInterval,
    pub name: String,
}
