//! Axum router wiring.
//!
//! `routes` declares the endpoints; `instrument` wraps any route table with
//! panic containment and the request pipeline and binds the state.

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{api::notes, app_state::AppState, ops, pipeline};

pub fn build_router(state: AppState) -> Router {
    instrument(routes(), state)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(notes::list).post(notes::create))
        .route(
            "/notes/:id",
            get(notes::get).put(notes::update).delete(notes::delete),
        )
        .route("/basic-metrics", get(ops::basic_metrics))
        .route("/metrics", get(ops::metrics))
        .route("/health", get(ops::health))
}

/// Layers apply to every route and to the fallback. The pipeline is outermost
/// so it observes the 500 produced for a panicking handler.
pub fn instrument(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn_with_state(state.clone(), pipeline::track))
        .with_state(state)
}
