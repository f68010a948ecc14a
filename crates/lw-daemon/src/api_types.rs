//! Response and query-parameter types for the HTTP API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Optional `?date=YYYY-MM-DD`; defaults to the server's current date.
#[derive(Debug, Clone, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}
