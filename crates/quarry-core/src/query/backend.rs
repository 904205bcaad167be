//! Collaborator boundary: intent parsing, plan building, binder creation,
//! and session compilation all live behind [`Backend`].

use crate::{
    error::InternalError,
    query::{
        intent::QueryIntent,
        method::QueryMethod,
        param::{ParameterAccessor, Parameters},
        plan::{BuiltPlan, ParameterSlot, PlanRequest},
    },
};
use std::fmt;

///
/// ExecutableQuery
///
/// Compiled, single-use query that still accepts bound values and result
/// windowing.
///

pub trait ExecutableQuery {
    /// Current row cap; `None` means unbounded.
    fn max_results(&self) -> Option<u32>;

    fn set_max_results(&mut self, max_results: u32);

    /// Offset of the first returned row.
    fn first_result(&self) -> u64;

    fn set_first_result(&mut self, first_result: u64);
}

///
/// ParameterBinder
///
/// Injects call values into a compiled query. Holds no values itself, so one
/// binder can serve every call that uses the plan it was built for.
///

pub trait ParameterBinder<Q> {
    /// Number of plan slots this binder fills.
    fn arity(&self) -> usize;

    /// Bind values only; pagination arguments are ignored.
    fn bind(&self, query: Q, accessor: &ParameterAccessor<'_>) -> Result<Q, InternalError>;

    /// Bind values and apply the call's pagination to the result window.
    fn bind_and_prepare(&self, query: Q, accessor: &ParameterAccessor<'_>)
    -> Result<Q, InternalError>;
}

///
/// Backend
///
/// Data-access provider for derived queries.
///
/// `compile` is never invoked concurrently for the same cached plan; callers
/// serialize it per plan instance. Fresh per-call plans are compiled without
/// any locking.
///

pub trait Backend: Send + Sync {
    type Intent: QueryIntent + Send + Sync;
    type Plan: fmt::Debug + Send;
    type Query: ExecutableQuery;
    type Binder: ParameterBinder<Self::Query> + Send + Sync;

    /// Parse the method name into a query intent.
    fn parse_intent(&self, method: &QueryMethod) -> Result<Self::Intent, InternalError>;

    /// Build a plan and its ordered parameter slots.
    ///
    /// Slot order must be deterministic for a given intent, kind, shape,
    /// and sort.
    fn build_plan(
        &self,
        request: PlanRequest<'_, Self::Intent>,
    ) -> Result<BuiltPlan<Self::Plan>, InternalError>;

    /// Create a binder for the given slots.
    fn create_binder(&self, parameters: &Parameters, slots: &[ParameterSlot]) -> Self::Binder;

    /// Compile a plan into an executable query against the live session.
    fn compile(&self, plan: &Self::Plan) -> Result<Self::Query, InternalError>;
}
