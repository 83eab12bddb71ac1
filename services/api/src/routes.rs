use crate::infra::{AppState, BoardServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use job_board::accounts::account_router;
use job_board::admin::admin_router;
use job_board::applications::application_router;
use job_board::jobs::job_router;
use serde_json::json;
use std::sync::atomic::Ordering;

/// The full HTTP surface: board routers plus the operational endpoints.
/// `AppState` is expected as an outer `Extension` layer.
pub(crate) fn with_board_routes(services: &BoardServices) -> Router {
    Router::new()
        .merge(account_router(services.accounts.clone()))
        .merge(job_router(services.jobs.clone()))
        .merge(application_router(services.applications.clone()))
        .merge(admin_router(services.admin.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(services.tokens.clone()))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
