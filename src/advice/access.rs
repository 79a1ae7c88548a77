//! Access-control advice.
//!
//! Denied calls never reach the target: the advice returns without calling
//! `proceed()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::Advice;
use crate::error::{InterceptError, Result};
use crate::invocation::Invocation;

/// Shared on/off switch consulted by [`AccessControl`].
#[derive(Debug, Clone)]
pub struct AccessFlag {
    allowed: Arc<AtomicBool>,
}

impl AccessFlag {
    pub fn new(allowed: bool) -> Self {
        Self {
            allowed: Arc::new(AtomicBool::new(allowed)),
        }
    }

    pub fn allow(&self) {
        self.allowed.store(true, Ordering::SeqCst);
    }

    pub fn deny(&self) {
        self.allowed.store(false, Ordering::SeqCst);
    }

    pub fn set(&self, allowed: bool) {
        self.allowed.store(allowed, Ordering::SeqCst);
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed.load(Ordering::SeqCst)
    }
}

impl Default for AccessFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

type Policy = dyn Fn(&Invocation<'_>) -> bool + Send + Sync;

enum Gate {
    Flag(AccessFlag),
    Policy(Box<Policy>),
}

/// Advice that lets a call through only while access is granted.
///
/// On denial it returns the configured fallback value, or
/// [`InterceptError::AccessDenied`] when none is set.
pub struct AccessControl {
    gate: Gate,
    fallback: Option<Value>,
    reason: String,
}

impl AccessControl {
    /// Gate calls on a shared flag.
    pub fn new(flag: AccessFlag) -> Self {
        Self {
            gate: Gate::Flag(flag),
            fallback: None,
            reason: "access flag is off".to_string(),
        }
    }

    /// Gate calls on a policy evaluated per invocation.
    pub fn with_policy<F>(policy: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            gate: Gate::Policy(Box::new(policy)),
            fallback: None,
            reason: "policy rejected the call".to_string(),
        }
    }

    /// Return `value` instead of failing when access is denied.
    pub fn deny_with(mut self, value: Value) -> Self {
        self.fallback = Some(value);
        self
    }

    /// Reason reported in [`InterceptError::AccessDenied`].
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    fn permits(&self, invocation: &Invocation<'_>) -> bool {
        match &self.gate {
            Gate::Flag(flag) => flag.is_allowed(),
            Gate::Policy(policy) => policy(invocation),
        }
    }
}

impl Advice for AccessControl {
    fn name(&self) -> &str {
        "access-control"
    }

    fn execute(&self, invocation: &mut Invocation<'_>) -> Result<Value> {
        if self.permits(invocation) {
            return invocation.proceed();
        }

        debug!(
            target_type = %invocation.type_info(),
            operation = %invocation.operation(),
            "Access denied"
        );

        match &self.fallback {
            Some(value) => Ok(value.clone()),
            None => Err(InterceptError::AccessDenied {
                operation: invocation.operation().qualified(invocation.type_info()),
                reason: self.reason.clone(),
            }),
        }
    }
}
