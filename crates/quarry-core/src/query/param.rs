//! Static parameter metadata of a repository method and the per-call accessor
//! that pairs it with runtime argument values.

use crate::{
    error::InternalError,
    query::sort::{PageRequest, Sort},
    value::Value,
};
use derive_more::{Deref, Display};

///
/// ProjectionType
///
/// Name of the result type a caller asks for through a dynamic projection
/// argument.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub struct ProjectionType(String);

impl ProjectionType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

///
/// ParameterRole
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParameterRole {
    /// Value bound into a predicate.
    Bindable,

    /// Caller-supplied dynamic sort.
    Sort,

    /// Pagination request; may also carry a sort.
    Page,

    /// Caller-supplied dynamic projection type.
    Projection,
}

///
/// Parameter
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    pub index: usize,
    pub name: Option<String>,
    pub role: ParameterRole,
}

impl Parameter {
    /// Named bindable parameter.
    #[must_use]
    pub fn bindable(name: impl Into<String>) -> Self {
        Self::with_role(Some(name.into()), ParameterRole::Bindable)
    }

    /// Bindable parameter addressed only by position.
    #[must_use]
    pub const fn positional() -> Self {
        Self::with_role(None, ParameterRole::Bindable)
    }

    #[must_use]
    pub const fn sort() -> Self {
        Self::with_role(None, ParameterRole::Sort)
    }

    #[must_use]
    pub const fn page() -> Self {
        Self::with_role(None, ParameterRole::Page)
    }

    #[must_use]
    pub const fn projection() -> Self {
        Self::with_role(None, ParameterRole::Projection)
    }

    // Index is assigned when the parameter list is assembled.
    const fn with_role(name: Option<String>, role: ParameterRole) -> Self {
        Self {
            index: 0,
            name,
            role,
        }
    }

    #[must_use]
    pub const fn is_bindable(&self) -> bool {
        matches!(self.role, ParameterRole::Bindable)
    }
}

///
/// Parameters
///
/// Ordered, immutable parameter metadata for one repository method.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    /// Assemble parameters in declaration order, assigning positional indexes.
    #[must_use]
    pub fn new(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self(
            parameters
                .into_iter()
                .enumerate()
                .map(|(index, parameter)| Parameter { index, ..parameter })
                .collect(),
        )
    }

    /// Iterate over parameters that participate in predicates.
    pub fn bindable(&self) -> impl Iterator<Item = &Parameter> {
        self.0.iter().filter(|parameter| parameter.is_bindable())
    }

    #[must_use]
    pub fn has_dynamic_projection(&self) -> bool {
        self.has_role(ParameterRole::Projection)
    }

    /// True when a sort or page argument may change the ordering per call.
    #[must_use]
    pub fn potentially_sorts_dynamically(&self) -> bool {
        self.has_role(ParameterRole::Sort) || self.has_role(ParameterRole::Page)
    }

    /// True when the compiled plan shape may differ between calls.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.has_dynamic_projection() || self.potentially_sorts_dynamically()
    }

    fn has_role(&self, role: ParameterRole) -> bool {
        self.0.iter().any(|parameter| parameter.role == role)
    }
}

///
/// ParameterAccessor
///
/// Runtime argument values viewed through the method's static parameters.
/// Lives for one invocation only.
///

#[derive(Clone, Copy, Debug)]
pub struct ParameterAccessor<'a> {
    parameters: &'a Parameters,
    values: &'a [Value],
}

impl<'a> ParameterAccessor<'a> {
    /// Pair values with parameters, rejecting arity or role mismatches.
    pub fn new(parameters: &'a Parameters, values: &'a [Value]) -> Result<Self, InternalError> {
        if parameters.len() != values.len() {
            return Err(InternalError::interface_unsupported(format!(
                "expected {} argument(s), received {}",
                parameters.len(),
                values.len()
            )));
        }

        for (parameter, value) in parameters.iter().zip(values) {
            let accepted = match parameter.role {
                ParameterRole::Bindable => !matches!(
                    value,
                    Value::Sort(_) | Value::Page(_) | Value::Projection(_)
                ),
                ParameterRole::Sort => matches!(value, Value::Sort(_) | Value::Null),
                ParameterRole::Page => matches!(value, Value::Page(_) | Value::Null),
                ParameterRole::Projection => matches!(value, Value::Projection(_) | Value::Null),
            };
            if !accepted {
                return Err(InternalError::interface_unsupported(format!(
                    "argument {} does not match parameter role {:?}",
                    parameter.index, parameter.role
                )));
            }
        }

        Ok(Self { parameters, values })
    }

    #[must_use]
    pub const fn parameters(&self) -> &'a Parameters {
        self.parameters
    }

    #[must_use]
    pub const fn values(&self) -> &'a [Value] {
        self.values
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    /// Iterate bindable parameters with their values.
    pub fn bindable_values(&self) -> impl Iterator<Item = (&'a Parameter, &'a Value)> + use<'a> {
        let values = self.values;
        self.parameters
            .bindable()
            .map(move |parameter| (parameter, &values[parameter.index]))
    }

    /// True when any predicate argument of this call is null.
    #[must_use]
    pub fn has_bindable_null(&self) -> bool {
        self.bindable_values().any(|(_, value)| value.is_null())
    }

    /// Sort requested by this call: an explicit sort argument wins, then the
    /// page's sort, otherwise unsorted.
    #[must_use]
    pub fn sort(&self) -> Sort {
        let explicit = self.values.iter().find_map(|value| match value {
            Value::Sort(sort) => Some(sort),
            _ => None,
        });

        explicit
            .or_else(|| self.page().map(|page| &page.sort))
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn page(&self) -> Option<&'a PageRequest> {
        self.values.iter().find_map(|value| match value {
            Value::Page(page) => Some(page),
            _ => None,
        })
    }

    #[must_use]
    pub fn projection(&self) -> Option<&'a ProjectionType> {
        self.values.iter().find_map(|value| match value {
            Value::Projection(projection) => Some(projection),
            _ => None,
        })
    }
}
