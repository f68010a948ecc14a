//! Periodic ingestion trigger.
//!
//! One tokio task owns the cadence. Overlap is prevented, not queued: a
//! tick that fires while a pass still holds the guard is skipped and the
//! work is picked up at the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, warn};

use crate::pipeline;
use crate::state::AppState;

pub fn spawn_scheduler(state: Arc<AppState>) {
    let period = Duration::from_secs(state.cfg.fetch_interval_secs);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately, so a fresh daemon ingests at
        // boot instead of waiting a full period.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Ok(_guard) = state.ingest_guard.try_lock() else {
                warn!("previous ingestion pass still running; skipping this trigger");
                continue;
            };

            if let Err(err) = pipeline::run_pass(&state.pool, &state.feeds).await {
                error!(error = ?err, "scheduled ingestion pass failed");
            }
        }
    });
}
