//! notekeeper server library entry.
//!
//! This crate wires the note store, the request pipeline, and the metrics
//! registry into an axum application. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod pipeline;
pub mod router;
