//! Advisor registry - ordered (pointcut, advice) pairs.
//!
//! The registry is consulted once per operation when a proxy is built. The
//! resulting chains are frozen into the proxy; later registrations do not
//! affect proxies that already exist.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::advice::Advice;
use crate::invocation::{OperationId, TypeInfo};
use crate::pointcut::Pointcut;

/// Immutable pairing of a pointcut with the advice it selects for.
#[derive(Clone)]
pub struct Advisor {
    pointcut: Arc<dyn Pointcut>,
    advice: Arc<dyn Advice>,
    order: i32,
    name: Option<Cow<'static, str>>,
}

impl Advisor {
    pub fn new(pointcut: impl Pointcut + 'static, advice: impl Advice + 'static) -> Self {
        Self::from_shared(Arc::new(pointcut), Arc::new(advice))
    }

    pub fn from_shared(pointcut: Arc<dyn Pointcut>, advice: Arc<dyn Advice>) -> Self {
        Self {
            pointcut,
            advice,
            order: 0,
            name: None,
        }
    }

    /// Declare a priority. Lower runs first (outermost); ties keep
    /// registration order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Name used in logs. Defaults to the advice's name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.advice.name())
    }

    pub fn pointcut(&self) -> &Arc<dyn Pointcut> {
        &self.pointcut
    }

    pub fn advice(&self) -> &Arc<dyn Advice> {
        &self.advice
    }

    pub fn matches(&self, target: &TypeInfo, operation: &OperationId) -> bool {
        self.pointcut.matches(target, operation)
    }
}

impl fmt::Debug for Advisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advisor")
            .field("name", &self.name())
            .field("order", &self.order)
            .finish()
    }
}

/// Ordered collection of advisors.
#[derive(Debug, Clone, Default)]
pub struct AdvisorRegistry {
    advisors: Vec<Advisor>,
}

impl AdvisorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an advisor after every advisor registered so far.
    pub fn register(&mut self, advisor: Advisor) {
        debug!(
            advisor = %advisor.name(),
            order = advisor.order(),
            position = self.advisors.len(),
            "Registering advisor"
        );
        self.advisors.push(advisor);
    }

    pub fn len(&self) -> usize {
        self.advisors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }

    pub fn advisors(&self) -> &[Advisor] {
        &self.advisors
    }

    /// Advices whose pointcut matches `(target, operation)`, outermost first.
    ///
    /// Sorted by declared order; advisors with equal order keep their
    /// registration order.
    pub fn matching(&self, target: &TypeInfo, operation: &OperationId) -> Vec<Arc<dyn Advice>> {
        let mut matched: Vec<&Advisor> = self
            .advisors
            .iter()
            .filter(|advisor| advisor.matches(target, operation))
            .collect();
        matched.sort_by_key(|advisor| advisor.order());
        matched
            .into_iter()
            .map(|advisor| Arc::clone(advisor.advice()))
            .collect()
    }

    /// Whether any advisor applies to at least one of `operations`.
    pub fn applies_to<'a, I>(&self, target: &TypeInfo, operations: I) -> bool
    where
        I: IntoIterator<Item = &'a OperationId>,
    {
        operations.into_iter().any(|operation| {
            self.advisors
                .iter()
                .any(|advisor| advisor.matches(target, operation))
        })
    }
}
