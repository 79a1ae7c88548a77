//! Proxy construction.
//!
//! [`ProxyFactory`] collects advisors and builds [`Proxy`] stand-ins for
//! targets. Two strategies exist:
//!
//! - **Contract-based**: the target is a trait object (`Arc<dyn Trait>`)
//!   declared with [`contract!`](crate::contract). The proxy implements the
//!   same trait and routes every trait operation through its advice chain.
//! - **Concrete** (subclass-based): the target is a concrete type declared
//!   with [`concrete!`](crate::concrete). The proxy wraps it and overrides
//!   its overridable operations. Sealed operations cannot be overridden, so
//!   building fails with [`InterceptError::UnproxyableOperation`].
//!
//! The strategy follows the target's descriptor: contract-based when one is
//! available, concrete otherwise.

mod descriptor;
mod introspect;

pub use descriptor::{Operation, Reflect, TypeDescriptor};
pub use introspect::{is_proxy, proxy_strategy, Introspect};

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::advice::Advice;
use crate::chain::AdviceChain;
use crate::config::ProxyConfig;
use crate::error::{InterceptError, Result};
use crate::invocation::{decode, Arguments, OperationId, Shape, TypeInfo};
use crate::pointcut::Pointcut;
use crate::registry::{Advisor, AdvisorRegistry};

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// How a proxy stands in for its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyStrategy {
    /// Implements the target's contract.
    Contract,
    /// Wraps and overrides a concrete type.
    Concrete,
}

impl fmt::Display for ProxyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyStrategy::Contract => write!(f, "contract-based"),
            ProxyStrategy::Concrete => write!(f, "subclass-based"),
        }
    }
}

/// Registers advisors and builds proxies.
///
/// # Example
///
/// ```ignore
/// let mut factory = ProxyFactory::new();
/// factory
///     .add_advisor(Always, Timing::new())?
///     .add_advisor(NameMatch::new(["delete*"])?, AccessControl::new(flag))?;
///
/// let repo: Proxy<dyn Repository> = factory.build(repo)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProxyFactory {
    registry: AdvisorRegistry,
    config: ProxyConfig,
    frozen: bool,
}

impl ProxyFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProxyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn registry(&self) -> &AdvisorRegistry {
        &self.registry
    }

    /// Register a pointcut/advice pair after all previous advisors.
    pub fn add_advisor(
        &mut self,
        pointcut: impl Pointcut + 'static,
        advice: impl Advice + 'static,
    ) -> Result<&mut Self> {
        self.add(Advisor::new(pointcut, advice))
    }

    /// Register a prepared advisor.
    pub fn add(&mut self, advisor: Advisor) -> Result<&mut Self> {
        if self.frozen {
            warn!(advisor = %advisor.name(), "Rejected advisor on frozen factory");
            return Err(InterceptError::Frozen);
        }
        self.registry.register(advisor);
        Ok(self)
    }

    /// Reject further advisor registration.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Build a proxy for `target`.
    ///
    /// Every advisor's pointcut is evaluated here, once per operation; the
    /// matched chains are fixed for the proxy's lifetime.
    pub fn build<T: Reflect + ?Sized>(&self, target: Arc<T>) -> Result<Proxy<T>> {
        let (info, operations) = T::descriptor().into_parts();

        let strategy = match info.shape() {
            Shape::Contract if !self.config.proxy_target_class => ProxyStrategy::Contract,
            _ => ProxyStrategy::Concrete,
        };

        if strategy == ProxyStrategy::Concrete {
            if let Some(sealed) = operations.iter().find(|op| !op.is_overridable()) {
                warn!(
                    target_type = %info,
                    operation = %sealed.id(),
                    "Cannot proxy sealed operation"
                );
                return Err(InterceptError::UnproxyableOperation {
                    type_name: info.name().to_string(),
                    operation: sealed.id().to_string(),
                });
            }
        }

        let mut resolved = HashMap::with_capacity(operations.len());
        for operation in operations {
            let name = operation.id().name().to_string();
            let chain = AdviceChain::new(self.registry.matching(&info, operation.id()));
            trace!(
                target_type = %info,
                operation = %operation.id(),
                advices = ?chain,
                "Resolved advice chain"
            );
            if resolved
                .insert(name.clone(), ResolvedOperation { operation, chain })
                .is_some()
            {
                return Err(InterceptError::InvalidDescriptor {
                    type_name: info.name().to_string(),
                    reason: format!("duplicate operation '{}'", name),
                });
            }
        }

        let advised = resolved.values().filter(|r| !r.chain.is_empty()).count();
        debug!(
            target_type = %info,
            strategy = %strategy,
            operations = resolved.len(),
            advised,
            "Built proxy"
        );

        Ok(Proxy {
            id: NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed),
            target,
            info,
            strategy,
            operations: Arc::new(resolved),
        })
    }
}

struct ResolvedOperation<T: ?Sized> {
    operation: descriptor::Operation<T>,
    chain: AdviceChain,
}

/// A stand-in for a target that routes calls through advice chains.
///
/// Contract proxies (`Proxy<dyn Trait>`) implement the contract trait;
/// concrete proxies implement the operations trait generated by
/// [`concrete!`](crate::concrete). Both also accept dynamic calls through
/// [`invoke`](Self::invoke).
pub struct Proxy<T: ?Sized> {
    id: u64,
    target: Arc<T>,
    info: TypeInfo,
    strategy: ProxyStrategy,
    operations: Arc<HashMap<String, ResolvedOperation<T>>>,
}

impl<T: ?Sized> Proxy<T> {
    /// Call `operation` with encoded arguments.
    ///
    /// Operations without matching advice call the target directly.
    pub fn invoke(&self, operation: &str, arguments: Arguments) -> Result<Value> {
        let resolved =
            self.operations
                .get(operation)
                .ok_or_else(|| InterceptError::UnknownOperation {
                    type_name: self.info.name().to_string(),
                    operation: operation.to_string(),
                })?;

        resolved
            .chain
            .invoke_for(
                self.id,
                &self.info,
                resolved.operation.id(),
                arguments,
                |args| resolved.operation.invoke(&self.target, args),
            )
    }

    /// Call `operation` and decode its result.
    pub fn call<R: DeserializeOwned>(&self, operation: &str, arguments: Arguments) -> Result<R> {
        decode(self.invoke(operation, arguments)?)
    }

    /// Identity advices see through [`Invocation::target_id`](crate::Invocation::target_id).
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn strategy(&self) -> ProxyStrategy {
        self.strategy
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.info
    }

    /// The real target. Calls made on it bypass all advice.
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// Identifiers of every proxied operation, sorted by name.
    pub fn operations(&self) -> Vec<&OperationId> {
        let mut ids: Vec<&OperationId> = self
            .operations
            .values()
            .map(|resolved| resolved.operation.id())
            .collect();
        ids.sort_by(|a, b| a.name().cmp(b.name()));
        ids
    }

    /// Names of the advices wrapping `operation`, outermost first.
    pub fn advice_names(&self, operation: &str) -> Option<Vec<String>> {
        self.operations
            .get(operation)
            .map(|resolved| resolved.chain.names())
    }

    /// Whether any advice applies to `operation`.
    pub fn is_advised(&self, operation: &str) -> bool {
        self.operations
            .get(operation)
            .is_some_and(|resolved| !resolved.chain.is_empty())
    }
}

impl<T: ?Sized> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            target: Arc::clone(&self.target),
            info: self.info.clone(),
            strategy: self.strategy,
            operations: Arc::clone(&self.operations),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("type", &self.info)
            .field("strategy", &self.strategy)
            .field("operations", &self.operations.len())
            .finish()
    }
}
