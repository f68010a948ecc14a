//! Attention-list feed client.
//!
//! The upstream endpoint returns a flat JSON array of keyed objects. The
//! date stays as the raw minguo digit string here; the ingestion merger
//! normalizes it exactly once, immediately before its uniqueness check.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::error;

/// One row of the attention list exactly as published upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttentionRecord {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Minguo compact digits, e.g. `"1130120"`. Not normalized here.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "TradingInfoForAttention", default)]
    pub reason: String,
}

/// HTTP client for the attention-list endpoint.
#[derive(Debug, Clone)]
pub struct AttentionFeed {
    http: reqwest::Client,
    url: String,
}

impl AttentionFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch the current attention list.
    ///
    /// Any transport or decode failure is logged and degraded to an empty
    /// batch so the caller's ingestion pass can continue with the other feed.
    pub async fn fetch(&self) -> Vec<AttentionRecord> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(err) => {
                error!(error = ?err, "attention feed fetch failed");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<AttentionRecord>> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("attention feed request failed")?
            .error_for_status()
            .context("attention feed returned error status")?;

        resp.json::<Vec<AttentionRecord>>()
            .await
            .context("attention feed json decode failed")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
