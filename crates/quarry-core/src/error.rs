use crate::query::method::MethodIdentity;
use std::fmt;
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Boundary error returned by derived query construction and execution.
///

#[derive(Debug, ThisError)]
pub enum QueryError {
    /// Intent parsing or the initial plan build failed while binding a method.
    #[error("failed to create query for method {method}: {source}")]
    Construction {
        method: MethodIdentity,
        #[source]
        source: InternalError,
    },

    #[error("{0}")]
    Execute(#[from] InternalError),
}

impl QueryError {
    /// Return the underlying structured error regardless of phase.
    #[must_use]
    pub const fn internal(&self) -> &InternalError {
        match self {
            Self::Construction { source, .. } => source,
            Self::Execute(err) => err,
        }
    }
}

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Backends report their failures through this type so that the caching
/// layer can surface them verbatim.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct an intent-origin backend failure (method name did not parse).
    pub fn intent(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Backend, ErrorOrigin::Intent, message)
    }

    /// Construct a plan-builder backend failure.
    pub fn plan(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Backend, ErrorOrigin::Plan, message)
    }

    /// Construct a binder backend failure.
    pub fn binder(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Backend, ErrorOrigin::Binder, message)
    }

    /// Construct a session backend failure (plan compilation).
    pub fn session(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Backend, ErrorOrigin::Session, message)
    }

    /// Construct an interface-origin unsupported error (bad caller arguments).
    pub(crate) fn interface_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Interface, message)
    }

    /// Construct an executor-origin invariant violation.
    pub(crate) fn executor_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Executor, message)
    }

    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self.class, ErrorClass::InvariantViolation)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Reported by a backend collaborator and passed through untouched.
    Backend,
    Internal,
    InvariantViolation,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Backend => "backend",
            Self::Internal => "internal",
            Self::InvariantViolation => "invariant_violation",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Intent,
    Plan,
    Binder,
    Session,
    Executor,
    Interface,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Intent => "intent",
            Self::Plan => "plan",
            Self::Binder => "binder",
            Self::Session => "session",
            Self::Executor => "executor",
            Self::Interface => "interface",
        };
        write!(f, "{label}")
    }
}
