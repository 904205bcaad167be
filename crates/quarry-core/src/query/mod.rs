//! Derived query preparation.
//!
//! A [`DerivedQuery`] binds one repository method to a [`Backend`]. Plans for
//! methods whose shape cannot change between calls are built once and shared;
//! everything else is rebuilt per call.

pub mod backend;
pub mod derived;
pub mod escape;
pub mod intent;
pub mod method;
pub mod param;
pub mod plan;
pub(crate) mod policy;
mod preparer;
pub mod restrict;
pub mod sort;

pub use backend::{Backend, ExecutableQuery, ParameterBinder};
pub use derived::DerivedQuery;
pub use escape::EscapeCharacter;
pub use intent::QueryIntent;
pub use method::{MethodIdentity, QueryMethod, ReturnShape};
pub use param::{Parameter, ParameterAccessor, ParameterRole, Parameters, ProjectionType};
pub use plan::{
    BindingPolicy, BuiltPlan, LikeMode, ParameterSlot, ParameterSource, PlanKind, PlanRequest,
    SlotKind,
};
pub use policy::RebuildReason;
pub use sort::{Direction, Order, PageRequest, Sort};
