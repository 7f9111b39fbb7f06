//! Structured logging.
//!
//! All output goes through `tracing`. `init_logging` installs the process
//! subscriber. The request pipeline writes access records through
//! `record_begin`/`record_end`, which carry structured `method`, `uri`,
//! `status` and `duration_ms` fields next to the free-text message; `record`
//! writes a bare event. Every record has an RFC 3339 timestamp (added by the
//! subscriber) and the request's `trace_id`.

use std::time::{Duration, UNIX_EPOCH};

use axum::http::{Method, StatusCode, Uri};
use serde::Deserialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use notekeeper_core::error::{NotesError, Result};

use crate::config::LoggingSection;
use crate::obs::CorrelationContext;

/// Target used for access records so they can be filtered separately.
pub const ACCESS_TARGET: &str = "notekeeper::access";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line (default).
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
    /// Single-line human-readable output.
    Compact,
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured filter.
pub fn init_logging(cfg: &LoggingSection) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| parse_filter(&cfg.filter))?;

    let installed = match cfg.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact())
            .try_init(),
    };
    installed.map_err(|e| NotesError::Internal(format!("logging init failed: {e}")))?;

    tracing::info!(format = ?cfg.format, "logging initialized");
    Ok(())
}

/// Parse filter directives from config. A bad filter is a startup failure.
pub fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| NotesError::Internal(format!("logging.filter invalid: {e}")))
}

/// Emit one free-text access record tagged with a correlation id.
pub fn record(event: &str, correlation_id: &str) {
    tracing::info!(target: ACCESS_TARGET, trace_id = %correlation_id, "{}", event);
}

/// Access record written when a request enters the pipeline.
pub fn record_begin(ctx: &CorrelationContext, method: &Method, uri: &Uri) {
    let started_unix_ms = ctx
        .started_wall()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0);
    tracing::info!(
        target: ACCESS_TARGET,
        trace_id = %ctx.id(),
        method = %method,
        uri = %uri,
        started_unix_ms,
        "Incoming {} {}",
        method,
        uri
    );
}

/// Access record written once the response status is final.
pub fn record_end(ctx: &CorrelationContext, method: &Method, status: StatusCode, elapsed: Duration) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
        target: ACCESS_TARGET,
        trace_id = %ctx.id(),
        method = %method,
        status = status.as_u16(),
        duration_ms,
        "Completed {} in {}ms",
        status.as_u16(),
        duration_ms
    );
}
