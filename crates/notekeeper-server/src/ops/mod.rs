//! Operational HTTP endpoints.
//!
//! - `/health`        : liveness
//! - `/basic-metrics` : request tally and live note count as JSON
//! - `/metrics`       : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::app_state::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn basic_metrics(State(state): State<AppState>) -> Json<Value> {
    let snap = state.metrics().basic_snapshot();
    Json(json!({
        "requestCount": snap.request_count,
        "notesCount": state.store().len(),
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().snapshot();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
