use crate::query::plan::PlanKind;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

///
/// PlanCacheReport
/// Snapshot of the process-wide plan cache counters, split by plan variant.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlanCacheReport {
    pub data: KindCounters,
    pub count: KindCounters,
}

impl PlanCacheReport {
    #[must_use]
    pub const fn kind(&self, kind: PlanKind) -> &KindCounters {
        match kind {
            PlanKind::Data => &self.data,
            PlanKind::Count => &self.count,
        }
    }
}

///
/// KindCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct KindCounters {
    // Construction
    pub preparers_cached: u64,
    pub preparers_uncached: u64,

    // Per-call reuse decisions
    pub plans_reused: u64,
    pub rebuilt_uncached: u64,
    pub rebuilt_null_parameter: u64,

    // Compilation
    pub compiled_shared: u64,
    pub compiled_local: u64,
}

impl KindCounters {
    /// Fraction of calls served by a cached plan, if any call was made.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> Option<f64> {
        let calls = self.plans_reused + self.rebuilt_uncached + self.rebuilt_null_parameter;
        (calls > 0).then(|| self.plans_reused as f64 / calls as f64)
    }
}

///
/// LiveCounters
///
/// Lock-free counters for one plan variant. Written from any caller thread
/// and only assembled into a `KindCounters` when a report is taken.
///

pub(crate) struct LiveCounters {
    pub(crate) preparers_cached: AtomicU64,
    pub(crate) preparers_uncached: AtomicU64,
    pub(crate) plans_reused: AtomicU64,
    pub(crate) rebuilt_uncached: AtomicU64,
    pub(crate) rebuilt_null_parameter: AtomicU64,
    pub(crate) compiled_shared: AtomicU64,
    pub(crate) compiled_local: AtomicU64,
}

impl LiveCounters {
    pub(crate) const fn new() -> Self {
        Self {
            preparers_cached: AtomicU64::new(0),
            preparers_uncached: AtomicU64::new(0),
            plans_reused: AtomicU64::new(0),
            rebuilt_uncached: AtomicU64::new(0),
            rebuilt_null_parameter: AtomicU64::new(0),
            compiled_shared: AtomicU64::new(0),
            compiled_local: AtomicU64::new(0),
        }
    }

    fn snapshot(&self) -> KindCounters {
        KindCounters {
            preparers_cached: self.preparers_cached.load(Ordering::Relaxed),
            preparers_uncached: self.preparers_uncached.load(Ordering::Relaxed),
            plans_reused: self.plans_reused.load(Ordering::Relaxed),
            rebuilt_uncached: self.rebuilt_uncached.load(Ordering::Relaxed),
            rebuilt_null_parameter: self.rebuilt_null_parameter.load(Ordering::Relaxed),
            compiled_shared: self.compiled_shared.load(Ordering::Relaxed),
            compiled_local: self.compiled_local.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for counter in [
            &self.preparers_cached,
            &self.preparers_uncached,
            &self.plans_reused,
            &self.rebuilt_uncached,
            &self.rebuilt_null_parameter,
            &self.compiled_shared,
            &self.compiled_local,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

// Counters are best-effort statistics; relaxed ordering is enough.
static DATA: LiveCounters = LiveCounters::new();
static COUNT: LiveCounters = LiveCounters::new();

pub(crate) const fn counters(kind: PlanKind) -> &'static LiveCounters {
    match kind {
        PlanKind::Data => &DATA,
        PlanKind::Count => &COUNT,
    }
}

pub(crate) fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn report() -> PlanCacheReport {
    PlanCacheReport {
        data: DATA.snapshot(),
        count: COUNT.snapshot(),
    }
}

pub(crate) fn reset_all() {
    DATA.reset();
    COUNT.reset();
}
