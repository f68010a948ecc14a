//! Axum router and all HTTP handlers for lw-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. All handlers are `pub(crate)` so the scenario tests in
//! `tests/` can compose the router directly.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Local, NaiveDate};
use tracing::error;

use lw_risk::{RiskAssessment, RiskTier};
use lw_schemas::{AttentionListing, DispositionListing};

use crate::{
    api_types::{DateQuery, ErrorResponse, HealthResponse},
    pipeline::{self, PassReport},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/attention", get(attention_listing))
        .route("/v1/disposition", get(disposition_listing))
        .route("/v1/risk", get(risk_report))
        .route("/v1/ingest/run", post(ingest_run))
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(err: anyhow::Error) -> ApiError {
    error!(error = ?err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal error".to_string(),
        }),
    )
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: "lw-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/attention?date=
// ---------------------------------------------------------------------------

pub(crate) async fn attention_listing(
    State(st): State<Arc<AppState>>,
    Query(q): Query<DateQuery>,
) -> Result<Json<Vec<AttentionListing>>, ApiError> {
    let date = q.date.unwrap_or_else(today);
    let rows = lw_db::query::attention_on(&st.pool, date)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

// ---------------------------------------------------------------------------
// GET /v1/disposition?date=
// ---------------------------------------------------------------------------

pub(crate) async fn disposition_listing(
    State(st): State<Arc<AppState>>,
    Query(q): Query<DateQuery>,
) -> Result<Json<Vec<DispositionListing>>, ApiError> {
    let date = q.date.unwrap_or_else(today);
    let rows = lw_db::query::dispositions_covering(&st.pool, date)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

// ---------------------------------------------------------------------------
// GET /v1/risk
// ---------------------------------------------------------------------------

/// Classify every security flagged within the candidate window and report
/// the ones that are not Safe, most severe first.
pub(crate) async fn risk_report(
    State(st): State<Arc<AppState>>,
) -> Result<Json<Vec<RiskAssessment>>, ApiError> {
    let reference = today();
    let since = reference - Duration::days(st.cfg.risk_candidate_window_days);

    let codes = lw_db::query::recently_flagged_codes(&st.pool, since)
        .await
        .map_err(internal_error)?;

    let mut report = Vec::new();
    for code in codes {
        let dates =
            lw_db::query::recent_attention_dates(&st.pool, &code, reference, lw_risk::HISTORY_CAP)
                .await
                .map_err(internal_error)?;
        let assessment = lw_risk::assess(&code, reference, &dates, &st.thresholds);
        if assessment.tier != RiskTier::Safe {
            report.push(assessment);
        }
    }

    report.sort_by(|a, b| {
        b.tier
            .cmp(&a.tier)
            .then(b.consecutive_run.cmp(&a.consecutive_run))
    });

    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// POST /v1/ingest/run
// ---------------------------------------------------------------------------

/// Manual ingestion trigger. Shares the scheduler's overlap guard: if a
/// pass is already running the request is refused, not queued.
pub(crate) async fn ingest_run(
    State(st): State<Arc<AppState>>,
) -> Result<Json<PassReport>, ApiError> {
    let Ok(_guard) = st.ingest_guard.try_lock() else {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "an ingestion pass is already running".to_string(),
            }),
        ));
    };

    let report = pipeline::run_pass(&st.pool, &st.feeds)
        .await
        .map_err(internal_error)?;
    Ok(Json(report))
}
