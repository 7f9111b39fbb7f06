#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use notekeeper_server::{app_state::AppState, config::ServiceConfig, router};

pub fn fresh_app() -> (AppState, Router) {
    let state = AppState::new(ServiceConfig::default());
    let app = router::build_router(state.clone());
    (state, app)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body is UTF-8")
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let res = app.clone().oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec();
    TestResponse { status, content_type, body }
}

pub async fn send_raw(app: &Router, method: Method, uri: &str, body: &'static str) -> TestResponse {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("valid request");
    let res = app.clone().oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec();
    TestResponse { status, content_type: None, body }
}
