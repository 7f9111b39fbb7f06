//! notekeeper server
//!
//! In-memory notes API with per-request correlation ids, JSON access logs,
//! and Prometheus metrics on `/metrics`.

use notekeeper_core::error::{NotesError, Result};
use notekeeper_server::{app_state, config, obs, router};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load()?;
    obs::logging::init_logging(&cfg.logging)?;

    let state = app_state::AppState::new(cfg);
    let listen = state.cfg().server.listen_addr()?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| NotesError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, port = listen.port(), "notekeeper-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| NotesError::Internal(format!("server failed: {e}")))?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
