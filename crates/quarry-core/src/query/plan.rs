//! Plan-building vocabulary shared between the caching layer and backends.

use crate::{
    query::{
        escape::EscapeCharacter,
        method::ReturnShape,
        param::{ParameterAccessor, Parameters},
        sort::Sort,
    },
    value::Value,
};

///
/// PlanKind
///
/// Which of the two plan variants a preparer builds. Selected once at
/// construction and never switched per call.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PlanKind {
    /// Row-returning plan; honours dynamic sort and projection.
    Data,

    /// Scalar count plan; never sorted, limited, or paginated.
    Count,
}

impl PlanKind {
    #[must_use]
    pub const fn binding_policy(self) -> BindingPolicy {
        match self {
            Self::Data => BindingPolicy::Prepare,
            Self::Count => BindingPolicy::ValuesOnly,
        }
    }

    /// True when result-limiting correction applies after binding.
    #[must_use]
    pub const fn restricts_results(self) -> bool {
        matches!(self, Self::Data)
    }

    /// True when per-call sort and projection arguments shape the plan.
    #[must_use]
    pub const fn honours_dynamic_shape(self) -> bool {
        matches!(self, Self::Data)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Count => "count",
        }
    }
}

///
/// BindingPolicy
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BindingPolicy {
    /// Bind values and apply pagination metadata.
    Prepare,

    /// Bind values only.
    ValuesOnly,
}

///
/// LikeMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LikeMode {
    Starting,
    Ending,
    Containing,
}

impl LikeMode {
    /// Wrap an already-escaped value with the wildcards for this mode.
    #[must_use]
    pub fn pattern(self, escaped: &str) -> String {
        match self {
            Self::Starting => format!("{escaped}%"),
            Self::Ending => format!("%{escaped}"),
            Self::Containing => format!("%{escaped}%"),
        }
    }
}

///
/// SlotKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotKind {
    Value,
    Like {
        mode: LikeMode,
        escape: EscapeCharacter,
    },
}

///
/// ParameterSlot
///
/// One placeholder a plan expects to be bound, tied back to the method
/// parameter that supplies its value.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParameterSlot {
    pub index: usize,
    pub name: Option<String>,
    pub kind: SlotKind,
    pub nullable: bool,
}

impl ParameterSlot {
    /// Render a call value for this slot; LIKE slots escape and wrap text.
    #[must_use]
    pub fn prepare_value(&self, value: &Value) -> Value {
        match (self.kind, value) {
            (SlotKind::Like { mode, escape }, Value::Text(text)) => {
                Value::Text(mode.pattern(&escape.escape(text)))
            }
            _ => value.clone(),
        }
    }
}

///
/// BuiltPlan
///
/// Plan plus its slots in binding order.
///

#[derive(Debug)]
pub struct BuiltPlan<P> {
    pub plan: P,
    pub slots: Vec<ParameterSlot>,
}

///
/// ParameterSource
///
/// What the plan builder may know about argument values: only their static
/// metadata (cacheable plan) or the concrete values of one call.
///

#[derive(Clone, Copy, Debug)]
pub enum ParameterSource<'a> {
    Symbolic(&'a Parameters),
    Concrete(&'a ParameterAccessor<'a>),
}

impl<'a> ParameterSource<'a> {
    #[must_use]
    pub const fn parameters(self) -> &'a Parameters {
        match self {
            Self::Symbolic(parameters) => parameters,
            Self::Concrete(accessor) => accessor.parameters(),
        }
    }

    #[must_use]
    pub const fn accessor(self) -> Option<&'a ParameterAccessor<'a>> {
        match self {
            Self::Symbolic(_) => None,
            Self::Concrete(accessor) => Some(accessor),
        }
    }
}

///
/// PlanRequest
///
/// Everything a backend needs to build one plan.
///

#[derive(Debug)]
pub struct PlanRequest<'a, I> {
    pub kind: PlanKind,
    pub intent: &'a I,
    pub shape: &'a ReturnShape,
    pub source: ParameterSource<'a>,
    pub sort: &'a Sort,
    pub escape: EscapeCharacter,
}
