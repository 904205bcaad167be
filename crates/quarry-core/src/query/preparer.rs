//! Per-variant plan preparation: cached plan ownership, the reuse decision,
//! serialized compilation of the shared plan, binding, and result restriction.

use crate::{
    config::PlanCacheConfig,
    error::InternalError,
    obs::sink::{self, MetricsEvent},
    query::{
        backend::{Backend, ParameterBinder},
        escape::EscapeCharacter,
        method::{QueryMethod, ReturnShape},
        param::ParameterAccessor,
        plan::{BindingPolicy, BuiltPlan, ParameterSource, PlanKind, PlanRequest},
        policy,
        restrict::restrict_max_results,
        sort::Sort,
    },
    value::Value,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

///
/// CachedPlan
///
/// Plan + binder pair built once from symbolic parameters. The plan sits
/// behind its own mutex because compiling from it is not re-entrant on every
/// backend.
///

struct CachedPlan<B: Backend> {
    plan: Arc<Mutex<B::Plan>>,
    binder: B::Binder,
}

///
/// QueryPreparer
///

pub(crate) struct QueryPreparer<B: Backend> {
    kind: PlanKind,
    backend: Arc<B>,
    method: Arc<QueryMethod>,
    intent: Arc<B::Intent>,
    escape: EscapeCharacter,
    cached: Option<CachedPlan<B>>,
}

impl<B: Backend> QueryPreparer<B> {
    /// Build a preparer, eagerly compiling the cached plan when the method's
    /// shape cannot vary between calls.
    pub(crate) fn new(
        kind: PlanKind,
        backend: Arc<B>,
        method: Arc<QueryMethod>,
        intent: Arc<B::Intent>,
        config: &PlanCacheConfig,
    ) -> Result<Self, InternalError> {
        let mut preparer = Self {
            kind,
            backend,
            method,
            intent,
            escape: config.escape,
            cached: None,
        };

        let dynamic = preparer.method.parameters().is_dynamic();
        if config.cache_plans && !dynamic {
            let method = Arc::clone(&preparer.method);
            let (plan, binder) = preparer.build(
                ParameterSource::Symbolic(method.parameters()),
                method.shape(),
                &Sort::unsorted(),
            )?;
            preparer.cached = Some(CachedPlan {
                plan: Arc::new(Mutex::new(plan)),
                binder,
            });
        }

        let cached = preparer.cached.is_some();
        sink::record(MetricsEvent::PreparerBuilt { kind, cached });
        debug!(
            method = %preparer.method.identity(),
            kind = kind.label(),
            cached,
            dynamic,
            "query preparer ready"
        );

        Ok(preparer)
    }

    #[must_use]
    pub(crate) const fn kind(&self) -> PlanKind {
        self.kind
    }

    #[must_use]
    pub(crate) const fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Shared handle to the cached plan, if one exists.
    #[cfg(test)]
    pub(crate) fn cached_plan(&self) -> Option<&Arc<Mutex<B::Plan>>> {
        self.cached.as_ref().map(|cached| &cached.plan)
    }

    /// Produce a bound, ready-to-run query for one call.
    #[instrument(
        name = "quarry::preparer::create_query",
        level = "trace",
        skip(self, values),
        fields(method = %self.method.identity(), kind = self.kind.label())
    )]
    pub(crate) fn create_query(&self, values: &[Value]) -> Result<B::Query, InternalError> {
        let accessor = ParameterAccessor::new(self.method.parameters(), values)?;
        let cached_present = self.cached.is_some();
        let reusable = policy::is_plan_reusable(cached_present, accessor.has_bindable_null());

        let mut query = match self.cached.as_ref().filter(|_| reusable) {
            Some(cached) => {
                sink::record(MetricsEvent::PlanReused { kind: self.kind });
                let query = self.compile_shared(&cached.plan)?;

                self.bind(&cached.binder, query, &accessor)?
            }
            None => {
                let reason = policy::rebuild_reason(cached_present);
                sink::record(MetricsEvent::PlanRebuilt {
                    kind: self.kind,
                    reason,
                });
                debug!(?reason, "building per-call plan");

                let shape = self.shape_for(&accessor);
                let sort = self.sort_for(&accessor);
                let (plan, binder) =
                    self.build(ParameterSource::Concrete(&accessor), &shape, &sort)?;
                let query = self.compile_local(&plan)?;

                self.bind(&binder, query, &accessor)?
            }
        };

        if self.kind.restricts_results() {
            restrict_max_results(&mut query, &*self.intent);
        }

        Ok(query)
    }

    // Build a plan and its binder, checking the binder covers every slot.
    fn build(
        &self,
        source: ParameterSource<'_>,
        shape: &ReturnShape,
        sort: &Sort,
    ) -> Result<(B::Plan, B::Binder), InternalError> {
        let BuiltPlan { plan, slots } = self.backend.build_plan(PlanRequest {
            kind: self.kind,
            intent: &*self.intent,
            shape,
            source,
            sort,
            escape: self.escape,
        })?;
        trace!(?plan, slots = slots.len(), "plan built");

        let binder = self.backend.create_binder(source.parameters(), &slots);
        if binder.arity() != slots.len() {
            return Err(InternalError::executor_invariant(format!(
                "parameter binder for {} covers {} slot(s), plan declares {}",
                self.method.identity(),
                binder.arity(),
                slots.len()
            )));
        }

        Ok((plan, binder))
    }

    // The cached plan is compiled under its own lock; nothing else is held.
    fn compile_shared(&self, plan: &Mutex<B::Plan>) -> Result<B::Query, InternalError> {
        let query = {
            let guard = plan.lock();
            self.backend.compile(&*guard)?
        };
        sink::record(MetricsEvent::Compiled {
            kind: self.kind,
            shared: true,
        });

        Ok(query)
    }

    fn compile_local(&self, plan: &B::Plan) -> Result<B::Query, InternalError> {
        let query = self.backend.compile(plan)?;
        sink::record(MetricsEvent::Compiled {
            kind: self.kind,
            shared: false,
        });

        Ok(query)
    }

    fn bind(
        &self,
        binder: &B::Binder,
        query: B::Query,
        accessor: &ParameterAccessor<'_>,
    ) -> Result<B::Query, InternalError> {
        match self.kind.binding_policy() {
            BindingPolicy::Prepare => binder.bind_and_prepare(query, accessor),
            BindingPolicy::ValuesOnly => binder.bind(query, accessor),
        }
    }

    // Count plans always use the static shape; data plans honour a per-call
    // projection argument.
    fn shape_for(&self, accessor: &ParameterAccessor<'_>) -> ReturnShape {
        if self.kind.honours_dynamic_shape() {
            self.method.shape().with_dynamic_projection(accessor)
        } else {
            self.method.shape().clone()
        }
    }

    fn sort_for(&self, accessor: &ParameterAccessor<'_>) -> Sort {
        if self.kind.honours_dynamic_shape()
            && self.method.parameters().potentially_sorts_dynamically()
        {
            accessor.sort()
        } else {
            Sort::unsorted()
        }
    }
}
