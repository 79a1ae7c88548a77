//! The in-flight representation of one intercepted call.
//!
//! An [`Invocation`] is created per call, walks the advice chain through
//! [`Invocation::proceed`], and is dropped once the call returns. Nothing in
//! it is shared between calls.
//!
//! # Chain protocol
//!
//! Each advice calls `proceed()` at most once. Calling it a second time
//! aborts the whole call with [`InterceptError::ChainProtocolViolation`].
//! An advice that sees `proceed()` fail must either re-raise the failure or
//! call [`Invocation::recover`] before returning its own value.

mod arguments;
mod operation;

pub use arguments::{decode, encode, ArgumentDecoder, Arguments};
pub use operation::{OperationId, Shape, TypeInfo};

use std::sync::Arc;

use serde_json::Value;
use tracing::{trace, warn};

use crate::advice::Advice;
use crate::error::{InterceptError, Result, Violation};

/// Terminal call into the real target.
pub(crate) type TargetCall<'a> = dyn Fn(&Arguments) -> Result<Value> + 'a;

/// Position of an invocation in its advice chain.
///
/// `Pending(n)` with `n` equal to the chain length means the real target is
/// being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// About to enter advice `i`.
    Pending(usize),
    /// Advice `i` is executing.
    Running(usize),
    /// The call returned normally.
    Complete,
    /// The call failed; the failure was propagated to the caller.
    Failed,
}

#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    proceeded: bool,
    downstream_failed: bool,
    recovered: bool,
}

/// One call travelling through an advice chain.
pub struct Invocation<'a> {
    target_id: u64,
    type_info: &'a TypeInfo,
    operation: &'a OperationId,
    arguments: Arguments,
    chain: &'a [Arc<dyn Advice>],
    target: &'a TargetCall<'a>,
    state: ChainState,
    frames: Vec<Frame>,
    violation: Option<(String, Violation)>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        target_id: u64,
        type_info: &'a TypeInfo,
        operation: &'a OperationId,
        arguments: Arguments,
        chain: &'a [Arc<dyn Advice>],
        target: &'a TargetCall<'a>,
    ) -> Self {
        Self {
            target_id,
            type_info,
            operation,
            arguments,
            chain,
            target,
            state: ChainState::Pending(0),
            frames: vec![Frame::default(); chain.len()],
            violation: None,
        }
    }

    /// Run the chain from the first advice to completion.
    pub(crate) fn run(&mut self) -> Result<Value> {
        let result = self.enter(0);
        self.state = match result {
            Ok(_) => ChainState::Complete,
            Err(_) => ChainState::Failed,
        };
        result
    }

    /// Identity of the target instance being called.
    ///
    /// Every built proxy gets its own id; clones of a proxy share it.
    /// Chains invoked without a proxy report `0`.
    pub fn target_id(&self) -> u64 {
        self.target_id
    }

    /// Type of the target being called.
    pub fn type_info(&self) -> &TypeInfo {
        self.type_info
    }

    /// Operation being called.
    pub fn operation(&self) -> &OperationId {
        self.operation
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Mutable access to the arguments handed to the rest of the chain.
    pub fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.arguments
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Number of advices in this chain.
    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the currently running advice has already proceeded.
    pub fn has_proceeded(&self) -> bool {
        match self.state {
            ChainState::Running(index) => self.frames[index].proceeded,
            _ => false,
        }
    }

    /// Invoke the next advice, or the real target at the end of the chain.
    ///
    /// Returns the downstream result unchanged.
    pub fn proceed(&mut self) -> Result<Value> {
        let ChainState::Running(index) = self.state else {
            return Err(self.record_violation("chain".to_string(), Violation::OutsideAdvice));
        };

        if self.frames[index].proceeded {
            let advice = self.chain[index].name().to_string();
            warn!(
                advice = %advice,
                operation = %self.operation,
                "Advice called proceed() more than once"
            );
            return Err(self.record_violation(advice, Violation::ProceededTwice));
        }
        if let Some((advice, violation)) = &self.violation {
            return Err(self.violation_error(advice.clone(), *violation));
        }

        self.frames[index].proceeded = true;
        let result = self.enter(index + 1);
        self.state = ChainState::Running(index);

        if result.is_err() {
            self.frames[index].downstream_failed = true;
        }
        result
    }

    /// Mark a downstream failure as intentionally handled by the running
    /// advice, allowing it to return its own value instead.
    pub fn recover(&mut self) {
        if let ChainState::Running(index) = self.state {
            self.frames[index].recovered = true;
        }
    }

    fn enter(&mut self, index: usize) -> Result<Value> {
        self.state = ChainState::Pending(index);

        let chain = self.chain;
        let Some(advice) = chain.get(index) else {
            trace!(operation = %self.operation, "Invoking target");
            return (self.target)(&self.arguments);
        };

        trace!(
            advice = advice.name(),
            operation = %self.operation,
            position = index,
            "Entering advice"
        );
        self.state = ChainState::Running(index);
        let result = advice.execute(self);

        if let Some((name, violation)) = &self.violation {
            return Err(self.violation_error(name.clone(), *violation));
        }

        let frame = self.frames[index];
        if frame.downstream_failed && !frame.recovered && result.is_ok() {
            let name = advice.name().to_string();
            warn!(
                advice = %name,
                operation = %self.operation,
                "Advice swallowed a downstream failure"
            );
            return Err(self.record_violation(name, Violation::SwallowedFailure));
        }

        result
    }

    fn record_violation(&mut self, advice: String, violation: Violation) -> InterceptError {
        let error = self.violation_error(advice.clone(), violation);
        self.violation.get_or_insert((advice, violation));
        error
    }

    fn violation_error(&self, advice: String, violation: Violation) -> InterceptError {
        InterceptError::ChainProtocolViolation {
            advice,
            operation: self.operation.to_string(),
            violation,
        }
    }
}
