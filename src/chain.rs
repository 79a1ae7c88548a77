//! Advice chains.
//!
//! A chain is the ordered list of advices matched for one operation. It is
//! built once, when the proxy is built, and shared by every call.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::advice::Advice;
use crate::error::Result;
use crate::invocation::{Arguments, Invocation, OperationId, TypeInfo};

/// Immutable, ordered sequence of advices wrapping one operation.
#[derive(Clone)]
pub struct AdviceChain {
    advices: Arc<[Arc<dyn Advice>]>,
}

impl AdviceChain {
    pub fn new(advices: Vec<Arc<dyn Advice>>) -> Self {
        Self {
            advices: advices.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.advices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advices.is_empty()
    }

    /// Advice names, outermost first.
    pub fn names(&self) -> Vec<String> {
        self.advices.iter().map(|a| a.name().to_string()).collect()
    }

    /// Run one call through the chain, ending in `target`.
    ///
    /// With no advices the target is called directly.
    pub fn invoke<F>(
        &self,
        type_info: &TypeInfo,
        operation: &OperationId,
        arguments: Arguments,
        target: F,
    ) -> Result<Value>
    where
        F: Fn(&Arguments) -> Result<Value>,
    {
        self.invoke_for(0, type_info, operation, arguments, target)
    }

    /// Like [`invoke`](Self::invoke), tagging the call with the identity of
    /// the target instance so advices can tell targets of one type apart.
    pub fn invoke_for<F>(
        &self,
        target_id: u64,
        type_info: &TypeInfo,
        operation: &OperationId,
        arguments: Arguments,
        target: F,
    ) -> Result<Value>
    where
        F: Fn(&Arguments) -> Result<Value>,
    {
        if self.advices.is_empty() {
            return target(&arguments);
        }

        let mut invocation =
            Invocation::new(target_id, type_info, operation, arguments, &self.advices, &target);
        invocation.run()
    }
}

impl Default for AdviceChain {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for AdviceChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
