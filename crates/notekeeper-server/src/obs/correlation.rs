//! Per-request correlation context.

use std::time::{Duration, Instant, SystemTime};

use uuid::Uuid;

/// Identity and start time of one request. Created when the request enters the
/// pipeline and dropped when it completes; never shared between requests.
#[derive(Debug)]
pub struct CorrelationContext {
    id: String,
    started_at: Instant,
    started_wall: SystemTime,
}

impl CorrelationContext {
    /// Random v4 id, so ids stay unique across restarts and do not reveal volume.
    pub fn begin() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Instant::now(),
            started_wall: SystemTime::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn started_wall(&self) -> SystemTime {
        self.started_wall
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Correlation id as seen by handlers (request extension).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
