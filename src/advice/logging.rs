//! Logging advice.

use serde_json::Value;
use tracing::{debug, debug_span, trace, warn};

use super::Advice;
use crate::config::LoggingConfig;
use crate::error::Result;
use crate::invocation::Invocation;

/// Advice that wraps each call in a `tracing` span and logs its outcome.
///
/// Failures are logged at `warn` and re-raised unchanged.
#[derive(Debug, Clone, Default)]
pub struct Logging {
    log_arguments: bool,
}

impl Logging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            log_arguments: config.log_arguments,
        }
    }

    /// Include encoded arguments in the entry event (at `trace`).
    pub fn with_arguments(mut self, enabled: bool) -> Self {
        self.log_arguments = enabled;
        self
    }
}

impl Advice for Logging {
    fn name(&self) -> &str {
        "logging"
    }

    fn execute(&self, invocation: &mut Invocation<'_>) -> Result<Value> {
        let span = debug_span!(
            "invocation",
            target_type = %invocation.type_info(),
            operation = %invocation.operation(),
        );
        let _guard = span.enter();

        if self.log_arguments {
            trace!(arguments = %invocation.arguments().key(), "Invocation started");
        } else {
            trace!(arity = invocation.arguments().len(), "Invocation started");
        }

        let result = invocation.proceed();

        match &result {
            Ok(_) => debug!("Invocation completed"),
            Err(e) => warn!(error = %e, "Invocation failed"),
        }
        result
    }
}
