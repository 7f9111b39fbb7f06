//! Notes API behaviour through the full router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::collections::HashSet;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{fresh_app, send, send_raw};

#[tokio::test]
async fn health_reports_healthy() {
    let (_, app) = fresh_app();
    let res = send(&app, Method::GET, "/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "status": "healthy" }));
}

#[tokio::test]
async fn crud_lifecycle() {
    let (_, app) = fresh_app();

    let created = send(
        &app,
        Method::POST,
        "/notes",
        Some(json!({ "title": "Test Note", "content": "Test Content" })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let note = created.json();
    let id = note["id"].as_str().expect("id assigned").to_owned();
    assert_eq!(note["title"], "Test Note");
    assert_eq!(note["content"], "Test Content");

    let listed = send(&app, Method::GET, "/notes", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json(), json!([note]));

    let fetched = send(&app, Method::GET, &format!("/notes/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["id"], id.as_str());

    let updated = send(
        &app,
        Method::PUT,
        &format!("/notes/{id}"),
        Some(json!({ "title": "Updated Title" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["title"], "Updated Title");
    assert_eq!(updated.json()["content"], "Test Content");

    let deleted = send(&app, Method::DELETE, &format!("/notes/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json(), json!({ "message": "Deleted" }));

    for _ in 0..2 {
        let gone = send(&app, Method::GET, &format!("/notes/{id}"), None).await;
        assert_eq!(gone.status, StatusCode::NOT_FOUND);
        assert_eq!(gone.json(), json!({ "error": "Not found" }));
    }
}

#[tokio::test]
async fn missing_ids_return_fixed_404_body() {
    let (_, app) = fresh_app();
    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let res = send(&app, method.clone(), "/notes/unknown-id", None).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(res.json(), json!({ "error": "Not found" }));
    }
}

#[tokio::test]
async fn create_without_fields_is_accepted() {
    let (_, app) = fresh_app();

    let res = send(&app, Method::POST, "/notes", None).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let body = res.json();
    assert!(body["id"].is_string());
    assert!(body.get("title").is_none());
    assert!(body.get("content").is_none());

    let res = send(&app, Method::POST, "/notes", Some(json!({ "title": "only title" }))).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.json()["title"], "only title");
    assert!(res.json().get("content").is_none());
}

#[tokio::test]
async fn update_with_empty_string_replaces_and_null_keeps() {
    let (_, app) = fresh_app();
    let id = send(&app, Method::POST, "/notes", Some(json!({ "title": "t", "content": "c" })))
        .await
        .json()["id"]
        .as_str()
        .unwrap()
        .to_owned();

    let res = send(
        &app,
        Method::PUT,
        &format!("/notes/{id}"),
        Some(json!({ "title": "", "content": null })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "id": id, "title": "", "content": "c" }));
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (state, app) = fresh_app();
    let res = send_raw(&app, Method::POST, "/notes", "{not json").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["error"].as_str().unwrap().contains("invalid JSON body"));
    assert!(state.store().is_empty());
}

#[tokio::test]
async fn list_tracks_live_ids() {
    let (_, app) = fresh_app();
    let mut ids = Vec::new();
    for i in 0..5 {
        let res = send(&app, Method::POST, "/notes", Some(json!({ "title": format!("n{i}") }))).await;
        ids.push(res.json()["id"].as_str().unwrap().to_owned());
    }
    send(&app, Method::DELETE, &format!("/notes/{}", ids[0]), None).await;
    send(&app, Method::DELETE, &format!("/notes/{}", ids[3]), None).await;

    let listed: Vec<String> = send(&app, Method::GET, "/notes", None)
        .await
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(listed, vec![ids[1].clone(), ids[2].clone(), ids[4].clone()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_produce_distinct_records() {
    const K: usize = 64;
    let (state, app) = fresh_app();

    let tasks: Vec<_> = (0..K)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let res = send(&app, Method::POST, "/notes", Some(json!({ "title": format!("c{i}") }))).await;
                assert_eq!(res.status, StatusCode::CREATED);
                res.json()["id"].as_str().unwrap().to_owned()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for t in tasks {
        assert!(ids.insert(t.await.unwrap()));
    }
    assert_eq!(ids.len(), K);
    assert_eq!(state.store().len(), K);

    let listed = send(&app, Method::GET, "/notes", None).await.json();
    assert_eq!(listed.as_array().unwrap().len(), K);
    assert_eq!(state.metrics().requests_for("POST", "/notes", 201), K as u64);
}
