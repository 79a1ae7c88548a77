//! Error types for interception and proxy construction.

use std::fmt;

/// Result type for every interpose operation.
pub type Result<T> = std::result::Result<T, InterceptError>;

/// Boxed failure raised by a target operation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The way an advice broke the chain contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// `proceed()` was called more than once by the same advice.
    ProceededTwice,
    /// A downstream failure was answered with `Ok` without calling `recover()`.
    SwallowedFailure,
    /// `proceed()` was called while no advice of the chain was running.
    OutsideAdvice,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ProceededTwice => write!(f, "proceed() called more than once"),
            Violation::SwallowedFailure => {
                write!(f, "downstream failure swallowed without recover()")
            }
            Violation::OutsideAdvice => write!(f, "proceed() called outside a running advice"),
        }
    }
}

/// Errors that can occur while building proxies or running advice chains.
#[derive(Debug, thiserror::Error)]
pub enum InterceptError {
    #[error("Chain protocol violation in advice '{advice}' on {operation}: {violation}")]
    ChainProtocolViolation {
        advice: String,
        operation: String,
        violation: Violation,
    },

    #[error("Cannot proxy {type_name}::{operation}: operation is sealed")]
    UnproxyableOperation { type_name: String, operation: String },

    #[error("Target invocation failed: {0}")]
    TargetInvocation(#[source] BoxError),

    #[error("Access denied to {operation}: {reason}")]
    AccessDenied { operation: String, reason: String },

    #[error("Unknown operation {type_name}::{operation}")]
    UnknownOperation { type_name: String, operation: String },

    #[error("Invalid descriptor for {type_name}: {reason}")]
    InvalidDescriptor { type_name: String, reason: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Proxy factory is frozen; advisors can no longer be added")]
    Frozen,

    #[error("Missing argument at index {index}")]
    MissingArgument { index: usize },

    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl InterceptError {
    /// Wrap a failure raised by the real target operation.
    ///
    /// Accepts any error type as well as plain strings.
    pub fn target(error: impl Into<BoxError>) -> Self {
        Self::TargetInvocation(error.into())
    }

    /// Whether this failure originated in the target rather than in the
    /// interception machinery.
    pub fn is_target_failure(&self) -> bool {
        matches!(self, Self::TargetInvocation(_))
    }

    /// Whether this failure is a broken advice contract.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ChainProtocolViolation { .. })
    }
}
