//! Shared application state.
//!
//! The note store and the metrics registry are owned here and handed to every
//! handler and to the request pipeline; nothing lives in globals, so each test
//! can build an isolated state.

use std::sync::Arc;

use notekeeper_core::{InMemoryNoteStore, NoteStore};

use crate::config::ServiceConfig;
use crate::obs::RequestMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    store: Arc<dyn NoteStore>,
    metrics: RequestMetrics,
}

impl AppState {
    /// State backed by a fresh in-memory store.
    pub fn new(cfg: ServiceConfig) -> Self {
        Self::with_store(cfg, Arc::new(InMemoryNoteStore::new()))
    }

    pub fn with_store(cfg: ServiceConfig, store: Arc<dyn NoteStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                store,
                metrics: RequestMetrics::new(),
            }),
        }
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &dyn NoteStore {
        self.inner.store.as_ref()
    }

    pub fn metrics(&self) -> &RequestMetrics {
        &self.inner.metrics
    }
}
