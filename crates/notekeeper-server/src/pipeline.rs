//! Request instrumentation.
//!
//! Every request goes through [`track`]:
//!
//! ```text
//! START      correlation id + start time, bump request tally, log "Incoming"
//! HANDLING   run the routed handler untouched
//! COMPLETED  log "Completed", count (method, route, status), refresh notes gauge
//! ```
//!
//! COMPLETED runs from `RequestScope::drop`, so it happens exactly once on
//! every exit path. Panics inside handlers are turned into a 500 by the
//! catch-panic layer below this one; if a panic still unwinds through here the
//! scope records 500. A request dropped before any response exists (client
//! went away) is logged as abandoned and is not counted.

use std::thread;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::obs::logging;
use crate::obs::{CorrelationContext, CorrelationId};

pub async fn track(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let ctx = CorrelationContext::begin();
    state.metrics().begin_request();

    let method = req.method().clone();
    let route = route_label(&req);
    logging::record_begin(&ctx, &method, req.uri());

    req.extensions_mut().insert(CorrelationId(ctx.id().to_owned()));
    let scope = RequestScope::open(state, ctx, method, route);

    let response = next.run(req).await;
    scope.complete(response.status());
    response
}

/// Matched route template, or the raw path when nothing matched.
fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned())
}

pub(crate) struct RequestScope {
    state: AppState,
    ctx: CorrelationContext,
    method: Method,
    route: String,
    status: Option<StatusCode>,
}

impl RequestScope {
    pub(crate) fn open(state: AppState, ctx: CorrelationContext, method: Method, route: String) -> Self {
        Self {
            state,
            ctx,
            method,
            route,
            status: None,
        }
    }

    /// Mark the response status as final and finish the request.
    pub(crate) fn complete(mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn finish(&self, status: StatusCode) {
        let elapsed = self.ctx.elapsed();
        logging::record_end(&self.ctx, &self.method, status, elapsed);

        let metrics = self.state.metrics();
        metrics.increment_request(self.method.as_str(), &self.route, status.as_u16());
        metrics.observe_duration(self.method.as_str(), &self.route, elapsed);
        metrics.set_live_count(self.state.store().len());
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        match self.status {
            Some(status) => self.finish(status),
            None if thread::panicking() => self.finish(StatusCode::INTERNAL_SERVER_ERROR),
            None => logging::record("Abandoned before response", self.ctx.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use notekeeper_core::NewNote;

    use super::*;
    use crate::config::ServiceConfig;

    fn scope(state: &AppState, method: Method, route: &str) -> RequestScope {
        RequestScope::open(state.clone(), CorrelationContext::begin(), method, route.to_owned())
    }

    #[test]
    fn completed_scope_counts_once() {
        let state = AppState::new(ServiceConfig::default());
        state.store().create(NewNote::default());

        scope(&state, Method::POST, "/notes").complete(StatusCode::CREATED);

        assert_eq!(state.metrics().requests_for("POST", "/notes", 201), 1);
        assert_eq!(state.metrics().durations_observed("POST", "/notes"), 1);
        assert_eq!(state.metrics().live_count(), 1);
    }

    #[test]
    fn abandoned_scope_is_not_counted() {
        let state = AppState::new(ServiceConfig::default());
        state.store().create(NewNote::default());

        drop(scope(&state, Method::GET, "/notes"));

        assert!(!state.metrics().snapshot().contains("http_requests_total{"));
        assert_eq!(state.metrics().live_count(), 0, "gauge untouched");
    }

    #[test]
    fn unwinding_scope_records_500() {
        let state = AppState::new(ServiceConfig::default());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _scope = scope(&state, Method::GET, "/notes/:id");
            panic!("handler fault");
        }));

        assert!(result.is_err());
        assert_eq!(state.metrics().requests_for("GET", "/notes/:id", 500), 1);
    }
}
