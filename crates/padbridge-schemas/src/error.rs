//! Unified error type for the padbridge core.
//!
//! Every fallible core operation returns [`Error`] by value; nothing is
//! swallowed. Each variant corresponds to exactly one failure cause so
//! callers and tests can assert on the kind.

use thiserror::Error;

/// Errors produced by the padbridge core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A numeric value was out of range, or an argument was otherwise
    /// malformed for the operation.
    #[error("invalid argument for {context}: {detail}")]
    InvalidArgument {
        /// What was being validated.
        context: String,
        /// The offending value or condition.
        detail: String,
    },

    /// A referenced object (effect, layout, blueprint, element) does not
    /// exist where the operation requires it to.
    #[error("{0} not found")]
    ObjectNotFound(String),

    /// A bounded container refused an insertion.
    #[error("capacity exceeded: {context} is limited to {limit}")]
    CapacityExceeded {
        /// The container that refused.
        context: String,
        /// Its capacity bound.
        limit: usize,
    },

    /// The operation is not supported by the target object's configuration.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A force-feedback operation required exclusive registration that the
    /// caller does not hold.
    #[error("force feedback device is not exclusively registered")]
    NotExclusiveRegistered,

    /// The mapper builder detected a cycle in template dependencies.
    #[error("circular template dependency while building mapper '{0}'")]
    CycleInDependencies(String),

    /// A state the core believes unreachable was reached. The instance that
    /// produced this error should be considered poisoned by the caller.
    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(String),
}

impl Error {
    /// Creates an [`Error::InvalidArgument`].
    pub fn invalid_argument(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::InvalidArgument {
            context: context.into(),
            detail: detail.into(),
        }
    }

    /// Creates an [`Error::ObjectNotFound`].
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::ObjectNotFound(what.into())
    }

    /// Creates an [`Error::CapacityExceeded`].
    pub fn capacity_exceeded(context: impl Into<String>, limit: usize) -> Self {
        Error::CapacityExceeded {
            context: context.into(),
            limit,
        }
    }

    /// Creates an [`Error::UnsupportedOperation`].
    pub fn unsupported(what: impl Into<String>) -> Self {
        Error::UnsupportedOperation(what.into())
    }

    /// Creates an [`Error::InternalInvariantViolation`].
    pub fn internal(detail: impl Into<String>) -> Self {
        Error::InternalInvariantViolation(detail.into())
    }
}

/// A specialized `Result` for padbridge core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_formats_context_and_detail() {
        let err = Error::invalid_argument("axis deadzone", "12000");
        assert_eq!(
            err.to_string(),
            "invalid argument for axis deadzone: 12000"
        );
    }

    #[test]
    fn capacity_exceeded_reports_limit() {
        let err = Error::capacity_exceeded("effect buffer", 256);
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn error_is_std_error() {
        let err = Error::not_found("effect 42");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn kinds_are_distinguishable() {
        assert_ne!(
            Error::NotExclusiveRegistered,
            Error::unsupported("force feedback")
        );
        assert_eq!(
            Error::CycleInDependencies("a".into()),
            Error::CycleInDependencies("a".into())
        );
    }
}
