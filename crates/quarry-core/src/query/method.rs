use crate::query::param::{ParameterAccessor, Parameters, ProjectionType};
use derive_more::Display;

///
/// MethodIdentity
///
/// Repository type plus method name, rendered as `Repository.method`.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
#[display("{repository}.{name}")]
pub struct MethodIdentity {
    pub repository: String,
    pub name: String,
}

impl MethodIdentity {
    #[must_use]
    pub fn new(repository: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
        }
    }
}

///
/// ReturnShape
///
/// Result type a plan must produce: the entity itself, or a projection of it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReturnShape {
    pub entity: String,
    pub projection: Option<ProjectionType>,
}

impl ReturnShape {
    #[must_use]
    pub fn entity(path: impl Into<String>) -> Self {
        Self {
            entity: path.into(),
            projection: None,
        }
    }

    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionType) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Apply the projection requested by this call, if any.
    #[must_use]
    pub fn with_dynamic_projection(&self, accessor: &ParameterAccessor<'_>) -> Self {
        match accessor.projection() {
            Some(projection) => self.clone().with_projection(projection.clone()),
            None => self.clone(),
        }
    }

    /// Name of the type rows are materialized into.
    #[must_use]
    pub fn returned_type(&self) -> &str {
        self.projection
            .as_ref()
            .map_or(self.entity.as_str(), ProjectionType::as_str)
    }
}

///
/// QueryMethod
///
/// Static description of one derived repository method.
///

#[derive(Clone, Debug)]
pub struct QueryMethod {
    identity: MethodIdentity,
    parameters: Parameters,
    shape: ReturnShape,
}

impl QueryMethod {
    #[must_use]
    pub const fn new(identity: MethodIdentity, parameters: Parameters, shape: ReturnShape) -> Self {
        Self {
            identity,
            parameters,
            shape,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &MethodIdentity {
        &self.identity
    }

    /// Method name the intent is derived from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Static return shape, before any per-call projection.
    #[must_use]
    pub const fn shape(&self) -> &ReturnShape {
        &self.shape
    }
}
