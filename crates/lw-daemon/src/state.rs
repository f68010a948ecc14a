//! Shared daemon state.

use lw_config::Config;
use lw_risk::Thresholds;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::pipeline::Feeds;

pub struct AppState {
    pub pool: PgPool,
    pub cfg: Config,
    pub thresholds: Thresholds,
    pub feeds: Feeds,
    /// Held for the duration of one ingestion pass. A scheduled tick or a
    /// manual trigger that cannot take it immediately is skipped, never
    /// queued, so two passes can never race on the merger's existence
    /// checks.
    pub ingest_guard: Mutex<()>,
}

impl AppState {
    pub fn new(pool: PgPool, cfg: Config) -> Self {
        let feeds = Feeds::from_config(&cfg);
        Self {
            pool,
            cfg,
            thresholds: Thresholds::sane_defaults(),
            feeds,
            ingest_guard: Mutex::new(()),
        }
    }
}
