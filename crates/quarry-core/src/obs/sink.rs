//! Metrics sink boundary.
//!
//! Preparer logic MUST NOT touch `obs::metrics` directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

use crate::{
    obs::metrics,
    query::{plan::PlanKind, policy::RebuildReason},
};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    /// A preparer finished construction, with or without a cached plan.
    PreparerBuilt { kind: PlanKind, cached: bool },

    /// A call was served by the cached plan.
    PlanReused { kind: PlanKind },

    /// A call built its own plan.
    PlanRebuilt {
        kind: PlanKind,
        reason: RebuildReason,
    },

    /// A plan was compiled into an executable query.
    Compiled { kind: PlanKind, shared: bool },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-wide sink that bumps the global atomic counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::PreparerBuilt { kind, cached } => {
                let counters = metrics::counters(kind);
                if cached {
                    metrics::bump(&counters.preparers_cached);
                } else {
                    metrics::bump(&counters.preparers_uncached);
                }
            }

            MetricsEvent::PlanReused { kind } => {
                metrics::bump(&metrics::counters(kind).plans_reused);
            }

            MetricsEvent::PlanRebuilt { kind, reason } => {
                let counters = metrics::counters(kind);
                match reason {
                    RebuildReason::Uncached => metrics::bump(&counters.rebuilt_uncached),
                    RebuildReason::NullParameter => {
                        metrics::bump(&counters.rebuilt_null_parameter);
                    }
                }
            }

            MetricsEvent::Compiled { kind, shared } => {
                let counters = metrics::counters(kind);
                if shared {
                    metrics::bump(&counters.compiled_shared);
                } else {
                    metrics::bump(&counters.compiled_local);
                }
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let scoped = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match scoped {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current process-wide plan cache counters.
#[must_use]
pub fn metrics_report() -> metrics::PlanCacheReport {
    metrics::report()
}

/// Reset all process-wide counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a metrics sink installed for the current thread only.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
