//! Request observability: correlation ids, access logging, and the metrics
//! registry rendered by `/metrics`.

pub mod correlation;
pub mod logging;
pub mod metrics;

pub use correlation::{CorrelationContext, CorrelationId};
pub use metrics::{BasicSnapshot, RequestMetrics};
