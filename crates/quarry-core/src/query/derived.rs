use crate::{
    config::PlanCacheConfig,
    error::{InternalError, QueryError},
    query::{
        backend::Backend,
        intent::QueryIntent,
        method::{MethodIdentity, QueryMethod},
        plan::PlanKind,
        preparer::QueryPreparer,
    },
    value::Value,
};
use std::sync::Arc;

///
/// DerivedQuery
///
/// Execution binding for one derived repository method.
///
/// Owns the parsed intent and two preparers: the primary one producing the
/// method's own result, and a count preparer for explicit count requests.
/// For count-projection methods both slots hold the same count preparer.
/// Safe to share across threads when the backend is.
///

pub struct DerivedQuery<B: Backend> {
    method: Arc<QueryMethod>,
    intent: Arc<B::Intent>,
    query: Arc<QueryPreparer<B>>,
    count_query: Arc<QueryPreparer<B>>,
}

impl<B: Backend> DerivedQuery<B> {
    /// Parse the method's intent and build both preparers eagerly.
    pub fn new(
        method: QueryMethod,
        backend: Arc<B>,
        config: &PlanCacheConfig,
    ) -> Result<Self, QueryError> {
        let method = Arc::new(method);

        Self::prepare(&method, backend, config).map_err(|source| QueryError::Construction {
            method: method.identity().clone(),
            source,
        })
    }

    fn prepare(
        method: &Arc<QueryMethod>,
        backend: Arc<B>,
        config: &PlanCacheConfig,
    ) -> Result<Self, InternalError> {
        let intent = Arc::new(backend.parse_intent(method)?);

        let count_query = Arc::new(QueryPreparer::new(
            PlanKind::Count,
            Arc::clone(&backend),
            Arc::clone(method),
            Arc::clone(&intent),
            config,
        )?);
        let query = if intent.is_count_projection() {
            Arc::clone(&count_query)
        } else {
            Arc::new(QueryPreparer::new(
                PlanKind::Data,
                backend,
                Arc::clone(method),
                Arc::clone(&intent),
                config,
            )?)
        };

        Ok(Self {
            method: Arc::clone(method),
            intent,
            query,
            count_query,
        })
    }

    /// Create the executable query producing this method's result.
    pub fn create_data_query(&self, values: &[Value]) -> Result<B::Query, QueryError> {
        Ok(self.query.create_query(values)?)
    }

    /// Create the executable count query for the same predicates.
    pub fn create_count_query(&self, values: &[Value]) -> Result<B::Query, QueryError> {
        Ok(self.count_query.create_query(values)?)
    }

    #[must_use]
    pub fn method(&self) -> &MethodIdentity {
        self.method.identity()
    }

    #[must_use]
    pub fn intent(&self) -> &B::Intent {
        &self.intent
    }

    /// Plan variant serving `create_data_query`.
    #[must_use]
    pub fn primary_kind(&self) -> PlanKind {
        self.query.kind()
    }

    /// True when the primary path holds a cached plan.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.query.is_cached()
    }

    /// True when the count path holds a cached plan.
    #[must_use]
    pub fn count_is_cached(&self) -> bool {
        self.count_query.is_cached()
    }

    /// Shared handle to the primary path's cached plan.
    #[cfg(test)]
    pub(crate) fn cached_plan(&self) -> Option<&Arc<parking_lot::Mutex<B::Plan>>> {
        self.query.cached_plan()
    }

    /// Shared handle to the count path's cached plan.
    #[cfg(test)]
    pub(crate) fn cached_count_plan(&self) -> Option<&Arc<parking_lot::Mutex<B::Plan>>> {
        self.count_query.cached_plan()
    }
}
