//! Aspect-oriented advice for cross-cutting concerns.
//!
//! An [`Advice`] wraps the rest of an advice chain. It receives the
//! [`Invocation`], may inspect or rewrite its arguments, and either calls
//! [`Invocation::proceed`] once or short-circuits with its own result.
//!
//! # Architecture
//!
//! Advice is applied at proxy construction time, not in implementations:
//!
//! ```ignore
//! let mut factory = ProxyFactory::new();
//! factory.add_advisor(Always, Timing::new())?;
//! factory.add_advisor(NameMatch::new(["save*"])?, Logging::new())?;
//!
//! let repo = factory.build(repo as Arc<dyn Repository>)?;
//! repo.save(user)?; // timed and logged
//! ```
//!
//! # Available Advice
//!
//! - [`Timing`] - Measures call duration, keeps per-operation stats
//! - [`Logging`] - Wraps each call in a tracing span
//! - [`AccessControl`] - Denies calls while an [`AccessFlag`] is off
//! - [`Caching`] - Memoises successful results by arguments

mod access;
mod caching;
mod logging;
mod timing;

pub use access::{AccessControl, AccessFlag};
pub use caching::Caching;
pub use logging::Logging;
pub use timing::{OperationStats, Timing, TimingStats};

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::invocation::Invocation;

/// A cross-cutting behaviour wrapped around a real call.
pub trait Advice: Send + Sync {
    /// Stable advice name, used in logs and protocol errors.
    fn name(&self) -> &str {
        "advice"
    }

    /// Run this advice for one call.
    ///
    /// Call `invocation.proceed()` at most once. Returning without
    /// proceeding suppresses the real call.
    fn execute(&self, invocation: &mut Invocation<'_>) -> Result<Value>;
}

impl<A: Advice + ?Sized> Advice for Arc<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&self, invocation: &mut Invocation<'_>) -> Result<Value> {
        (**self).execute(invocation)
    }
}

impl<A: Advice + ?Sized> Advice for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&self, invocation: &mut Invocation<'_>) -> Result<Value> {
        (**self).execute(invocation)
    }
}

/// Advice backed by a closure. Created with [`from_fn`].
pub struct FnAdvice<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> FnAdvice<F> {
    /// Give the advice a name for logs and errors.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> Advice for FnAdvice<F>
where
    F: Fn(&mut Invocation<'_>) -> Result<Value> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, invocation: &mut Invocation<'_>) -> Result<Value> {
        (self.f)(invocation)
    }
}

/// Build an advice from a closure.
///
/// ```ignore
/// let passthrough = advice::from_fn(|inv| inv.proceed()).named("passthrough");
/// ```
pub fn from_fn<F>(f: F) -> FnAdvice<F>
where
    F: Fn(&mut Invocation<'_>) -> Result<Value> + Send + Sync,
{
    FnAdvice {
        name: Cow::Borrowed("fn"),
        f,
    }
}
