//! Date-scoped reads for the query/reporting layer.
//!
//! All orderings are explicit so responses are deterministic.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

use lw_feed::minguo;
use lw_schemas::{
    AttentionEvent, AttentionListing, DispositionInterval, DispositionListing, Security,
};

/// Look up one security by code.
pub async fn find_security(pool: &PgPool, code: &str) -> Result<Option<Security>> {
    let row = sqlx::query("select code, name from securities where code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
        .context("find_security query failed")?;

    match row {
        None => Ok(None),
        Some(r) => Ok(Some(Security {
            code: r.try_get("code")?,
            name: r.try_get("name")?,
        })),
    }
}

/// Attention events flagged on exactly `date`, with security names.
pub async fn attention_on(pool: &PgPool, date: NaiveDate) -> Result<Vec<AttentionListing>> {
    let rows = sqlx::query(
        r#"
        select a.code, s.name, a.date, a.reason
        from attention_events a
        join securities s on s.code = a.code
        where a.date = $1
        order by a.code asc
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await
    .context("attention_on query failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(AttentionListing {
            event: AttentionEvent {
                code: r.try_get("code")?,
                date: r.try_get("date")?,
                reason: r.try_get("reason")?,
            },
            name: r.try_get("name")?,
        });
    }
    Ok(out)
}

/// Disposition intervals whose `[start_date, end_date]` window contains
/// `date` (both bounds inclusive), with security names.
pub async fn dispositions_covering(
    pool: &PgPool,
    date: NaiveDate,
) -> Result<Vec<DispositionListing>> {
    let rows = sqlx::query(
        r#"
        select d.code, s.name, d.start_date, d.end_date, d.measures
        from disposition_intervals d
        join securities s on s.code = d.code
        where d.start_date <= $1
          and d.end_date >= $1
        order by d.code asc, d.start_date asc
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await
    .context("dispositions_covering query failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(DispositionListing {
            interval: DispositionInterval {
                code: r.try_get("code")?,
                start_date: r.try_get("start_date")?,
                end_date: r.try_get("end_date")?,
                measures: r.try_get("measures")?,
            },
            name: r.try_get("name")?,
        });
    }
    Ok(out)
}

/// The most recent flag dates for one security at or before `reference`,
/// newest first, capped to `limit` rows.
///
/// Sentinel-dated events are excluded: an unknown flag date cannot
/// participate in the classifier's gap and window arithmetic.
pub async fn recent_attention_dates(
    pool: &PgPool,
    code: &str,
    reference: NaiveDate,
    limit: usize,
) -> Result<Vec<NaiveDate>> {
    let dates: Vec<NaiveDate> = sqlx::query_scalar(
        r#"
        select date
        from attention_events
        where code = $1
          and date <= $2
          and date > $3
        order by date desc
        limit $4
        "#,
    )
    .bind(code)
    .bind(reference)
    .bind(minguo::UNDEFINED_DATE)
    .bind(limit as i64)
    .fetch_all(pool)
    .await
    .context("recent_attention_dates query failed")?;

    Ok(dates)
}

/// Codes of securities with at least one attention event on or after
/// `since`. The candidate set for the risk report.
pub async fn recently_flagged_codes(pool: &PgPool, since: NaiveDate) -> Result<Vec<String>> {
    let codes: Vec<String> = sqlx::query_scalar(
        r#"
        select distinct code
        from attention_events
        where date >= $1
        order by code asc
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await
    .context("recently_flagged_codes query failed")?;

    Ok(codes)
}
