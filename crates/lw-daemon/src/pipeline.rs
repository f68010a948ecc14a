//! One ingestion pass: fetch both upstream lists, merge into the logs.

use anyhow::Result;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use lw_config::Config;
use lw_db::MergeStats;
use lw_feed::{AttentionFeed, DispositionFeed};

/// The two upstream clients, built once from config.
pub struct Feeds {
    pub attention: AttentionFeed,
    pub disposition: DispositionFeed,
}

impl Feeds {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            attention: AttentionFeed::new(cfg.attention_url.clone()),
            disposition: DispositionFeed::new(cfg.disposition_url.clone()),
        }
    }
}

/// Outcome of one pass, tagged for log correlation.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub pass_id: Uuid,
    pub attention: MergeStats,
    pub disposition: MergeStats,
}

/// Run one ingestion pass.
///
/// A feed fetch failure has already been degraded to an empty batch (and
/// logged) by the feed client, so one dead feed never blocks the other. A
/// merge/commit failure is fatal for the pass and propagates; the next
/// scheduled pass retries from scratch against the idempotent merger.
pub async fn run_pass(pool: &PgPool, feeds: &Feeds) -> Result<PassReport> {
    let pass_id = Uuid::new_v4();
    info!(%pass_id, "ingestion pass started");

    let fetched = feeds.attention.fetch().await;
    info!(%pass_id, rows = fetched.len(), "attention feed fetched");
    let attention = lw_db::merge_attention(pool, &fetched).await?;

    let fetched = feeds.disposition.fetch().await;
    info!(%pass_id, rows = fetched.len(), "disposition feed fetched");
    let disposition = lw_db::merge_dispositions(pool, &fetched).await?;

    info!(
        %pass_id,
        attention_inserted = attention.rows_inserted,
        attention_skipped = attention.rows_skipped_existing,
        disposition_inserted = disposition.rows_inserted,
        disposition_skipped = disposition.rows_skipped_existing,
        securities_created = attention.securities_created + disposition.securities_created,
        "ingestion pass finished"
    );

    Ok(PassReport {
        pass_id,
        attention,
        disposition,
    })
}
