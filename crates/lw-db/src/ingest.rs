//! Idempotent merge of fetched feed records into the persistent logs.
//!
//! Safe to re-run on overlapping data: every insert is preceded by an
//! existence check on the record's natural key. The check-then-insert pair
//! is only correct because a pass is the single writer; concurrent passes
//! are excluded upstream by the scheduler's overlap guard.
//!
//! Commit discipline: security creation commits immediately so later
//! records in the same pass observe the row; event and interval inserts for
//! one feed's batch share a single transaction committed at batch end.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, warn};

use lw_feed::minguo;
use lw_feed::{AttentionRecord, DispositionRecord};

/// Counters for one feed's merge batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub rows_read: u64,
    pub rows_inserted: u64,
    pub rows_skipped_existing: u64,
    pub rows_skipped_blank_code: u64,
    pub securities_created: u64,
    /// Rows whose date string failed normalization and were stored under the
    /// sentinel date.
    pub sentinel_dates: u64,
}

/// Insert a security row for `code` if none exists. Returns true on create.
///
/// Runs directly on the pool (auto-commit) so subsequent records in the
/// same ingestion pass, including those inside an open batch transaction,
/// see the row.
pub async fn ensure_security(pool: &PgPool, code: &str, name: &str) -> Result<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("select exists(select 1 from securities where code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
            .context("security existence check failed")?;

    if exists {
        return Ok(false);
    }

    sqlx::query("insert into securities (code, name) values ($1, $2)")
        .bind(code)
        .bind(name)
        .execute(pool)
        .await
        .context("insert security failed")?;

    Ok(true)
}

/// Merge one attention-list batch into the attention-event log.
///
/// Dates are normalized here, exactly once, immediately before the
/// `(code, date)` uniqueness check. A date that fails normalization is
/// stored under the sentinel so the flag itself is not lost.
pub async fn merge_attention(pool: &PgPool, records: &[AttentionRecord]) -> Result<MergeStats> {
    let mut stats = MergeStats::default();

    let mut tx = pool.begin().await.context("begin attention batch failed")?;

    for rec in records {
        stats.rows_read += 1;

        if rec.code.trim().is_empty() {
            stats.rows_skipped_blank_code += 1;
            continue;
        }

        if ensure_security(pool, &rec.code, &rec.name).await? {
            stats.securities_created += 1;
        }

        let date = minguo::parse_date(&rec.date);
        if minguo::is_undefined(date) {
            warn!(code = %rec.code, raw = %rec.date, "attention date failed to normalize; storing sentinel");
            stats.sentinel_dates += 1;
        }

        let (exists,): (bool,) = sqlx::query_as(
            "select exists(select 1 from attention_events where code = $1 and date = $2)",
        )
        .bind(&rec.code)
        .bind(date)
        .fetch_one(&mut *tx)
        .await
        .context("attention existence check failed")?;

        if exists {
            stats.rows_skipped_existing += 1;
            continue;
        }

        sqlx::query("insert into attention_events (code, date, reason) values ($1, $2, $3)")
            .bind(&rec.code)
            .bind(date)
            .bind(&rec.reason)
            .execute(&mut *tx)
            .await
            .context("insert attention event failed")?;
        stats.rows_inserted += 1;
    }

    tx.commit().await.context("commit attention batch failed")?;

    debug!(?stats, "attention batch merged");
    Ok(stats)
}

/// Merge one disposition-list batch into the interval log.
///
/// The identity key is `(code, start_date)` only: a later row with the same
/// start is dropped even when its end date or measures differ. A security
/// first sighted here gets its code as a placeholder name; the feed carries
/// none.
pub async fn merge_dispositions(
    pool: &PgPool,
    records: &[DispositionRecord],
) -> Result<MergeStats> {
    let mut stats = MergeStats::default();

    let mut tx = pool.begin().await.context("begin disposition batch failed")?;

    for rec in records {
        stats.rows_read += 1;

        if rec.code.trim().is_empty() {
            stats.rows_skipped_blank_code += 1;
            continue;
        }

        if ensure_security(pool, &rec.code, &rec.code).await? {
            stats.securities_created += 1;
        }

        if minguo::is_undefined(rec.start_date) || minguo::is_undefined(rec.end_date) {
            warn!(code = %rec.code, "disposition interval carries a sentinel date");
            stats.sentinel_dates += 1;
        }

        let (exists,): (bool,) = sqlx::query_as(
            "select exists(select 1 from disposition_intervals where code = $1 and start_date = $2)",
        )
        .bind(&rec.code)
        .bind(rec.start_date)
        .fetch_one(&mut *tx)
        .await
        .context("disposition existence check failed")?;

        if exists {
            stats.rows_skipped_existing += 1;
            continue;
        }

        sqlx::query(
            "insert into disposition_intervals (code, start_date, end_date, measures) \
             values ($1, $2, $3, $4)",
        )
        .bind(&rec.code)
        .bind(rec.start_date)
        .bind(rec.end_date)
        .bind(&rec.measures)
        .execute(&mut *tx)
        .await
        .context("insert disposition interval failed")?;
        stats.rows_inserted += 1;
    }

    tx.commit().await.context("commit disposition batch failed")?;

    debug!(?stats, "disposition batch merged");
    Ok(stats)
}
