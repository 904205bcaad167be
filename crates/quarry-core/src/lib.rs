//! Core runtime for Quarry: compiles derived repository queries into
//! executable queries, caching the compiled plan whenever it is safe to share.
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod obs;
pub mod query;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Types needed to implement a backend and bind repository methods.
///

pub mod prelude {
    pub use crate::{
        config::PlanCacheConfig,
        error::{InternalError, QueryError},
        query::{
            Backend, BuiltPlan, DerivedQuery, EscapeCharacter, ExecutableQuery, MethodIdentity,
            PageRequest, Parameter, ParameterAccessor, ParameterBinder, ParameterSlot, Parameters,
            PlanKind, PlanRequest, QueryIntent, QueryMethod, ReturnShape, SlotKind, Sort,
        },
        value::Value,
    };
}
