//! Observability: plan cache counters and the sink abstraction that feeds them.
//!
//! Structured logging goes through `tracing` at the call sites; this module
//! only carries counters.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{KindCounters, PlanCacheReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
