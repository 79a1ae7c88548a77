//! Pointcuts: predicates selecting which operations an advice applies to.
//!
//! A pointcut is evaluated once per (target type, operation) pair when a
//! proxy is built. Matching is pure and never fails; glob and regex patterns
//! are compiled, and rejected if malformed, when the pointcut is constructed.
//!
//! Pointcuts compose through [`PointcutExt`]:
//!
//! ```ignore
//! let writes = NameMatch::new(["save*", "delete*"])?
//!     .and(TypeMatch::new("*Repository")?)
//!     .and(NameMatch::new(["*_unchecked"])?.not());
//! ```

use std::sync::Arc;

use glob::Pattern;
use regex::Regex;

use crate::error::{InterceptError, Result};
use crate::invocation::{OperationId, Shape, TypeInfo};
use crate::utils::pattern::{any_match, compile};

/// Predicate over a target type and one of its operations.
pub trait Pointcut: Send + Sync {
    fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool;
}

impl<P: Pointcut + ?Sized> Pointcut for Arc<P> {
    fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool {
        (**self).matches(target, operation)
    }
}

impl<P: Pointcut + ?Sized> Pointcut for Box<P> {
    fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool {
        (**self).matches(target, operation)
    }
}

/// Matches every operation of every target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Pointcut for Always {
    fn matches(&self, _target: &TypeInfo, _operation: &OperationId) -> bool {
        true
    }
}

/// Matches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl Pointcut for Never {
    fn matches(&self, _target: &TypeInfo, _operation: &OperationId) -> bool {
        false
    }
}

/// Matches operations whose name matches any glob pattern.
#[derive(Debug, Clone)]
pub struct NameMatch {
    patterns: Vec<Pattern>,
}

impl NameMatch {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: compile(patterns)?,
        })
    }
}

impl Pointcut for NameMatch {
    fn matches(&self, _target: &TypeInfo, operation: &OperationId) -> bool {
        any_match(&self.patterns, operation.name())
    }
}

/// Matches every operation of targets whose type name matches a glob
/// pattern.
#[derive(Debug, Clone)]
pub struct TypeMatch {
    pattern: Vec<Pattern>,
}

impl TypeMatch {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: compile([pattern])?,
        })
    }
}

impl Pointcut for TypeMatch {
    fn matches(&self, target: &TypeInfo, _operation: &OperationId) -> bool {
        any_match(&self.pattern, target.name())
    }
}

/// Matches every operation of targets with the given shape.
#[derive(Debug, Clone, Copy)]
pub struct ShapeMatch(pub Shape);

impl Pointcut for ShapeMatch {
    fn matches(&self, target: &TypeInfo, _operation: &OperationId) -> bool {
        target.shape() == self.0
    }
}

/// Matches `Type::operation` against a regular expression.
///
/// The expression must match the whole qualified name.
#[derive(Debug, Clone)]
pub struct RegexMatch {
    regex: Regex,
}

impl RegexMatch {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            InterceptError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self { regex })
    }
}

impl Pointcut for RegexMatch {
    fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool {
        self.regex.is_match(&operation.qualified(target))
    }
}

/// Pointcut backed by a closure. Created with [`from_fn`].
pub struct FnPointcut<F>(F);

impl<F> Pointcut for FnPointcut<F>
where
    F: Fn(&TypeInfo, &OperationId) -> bool + Send + Sync,
{
    fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool {
        (self.0)(target, operation)
    }
}

/// Build a pointcut from a closure.
pub fn from_fn<F>(f: F) -> FnPointcut<F>
where
    F: Fn(&TypeInfo, &OperationId) -> bool + Send + Sync,
{
    FnPointcut(f)
}

/// Both pointcuts match.
#[derive(Debug, Clone)]
pub struct And<A, B>(A, B);

impl<A: Pointcut, B: Pointcut> Pointcut for And<A, B> {
    fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool {
        self.0.matches(target, operation) && self.1.matches(target, operation)
    }
}

/// Either pointcut matches.
#[derive(Debug, Clone)]
pub struct Or<A, B>(A, B);

impl<A: Pointcut, B: Pointcut> Pointcut for Or<A, B> {
    fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool {
        self.0.matches(target, operation) || self.1.matches(target, operation)
    }
}

/// The inner pointcut does not match.
#[derive(Debug, Clone)]
pub struct Not<A>(A);

impl<A: Pointcut> Pointcut for Not<A> {
    fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool {
        !self.0.matches(target, operation)
    }
}

/// Logical combinators available on every pointcut.
pub trait PointcutExt: Pointcut + Sized {
    fn and<B: Pointcut>(self, other: B) -> And<Self, B> {
        And(self, other)
    }

    fn or<B: Pointcut>(self, other: B) -> Or<Self, B> {
        Or(self, other)
    }

    #[allow(clippy::should_implement_trait)]
    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<P: Pointcut> PointcutExt for P {}
