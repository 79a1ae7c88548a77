//! Interpose - method interception and proxy construction
//!
//! Intercepts calls to a target's operations, selects cross-cutting advice
//! with pointcuts, and runs the matched advice chain around the real call.
//! Proxies are built either against a contract trait or, for targets
//! without one, against the concrete type.
//!
//! ```ignore
//! use interpose::prelude::*;
//!
//! contract! {
//!     pub trait Accounts {
//!         fn deposit(&self, account: u64, amount: u64) -> Result<u64>;
//!     }
//! }
//!
//! let mut factory = ProxyFactory::new();
//! factory.add_advisor(Always, Timing::new())?;
//!
//! let accounts: Arc<dyn Accounts> = Arc::new(Ledger::default());
//! let accounts = factory.build(accounts)?;
//! accounts.deposit(7, 100)?;
//! ```

pub mod advice;
pub mod chain;
pub mod config;
pub mod error;
pub mod invocation;
mod macros;
pub mod pointcut;
pub mod proxy;
pub mod registry;
pub mod utils;

pub use advice::Advice;
pub use chain::AdviceChain;
pub use error::{InterceptError, Result, Violation};
pub use invocation::{
    decode, encode, Arguments, ChainState, Invocation, OperationId, Shape, TypeInfo,
};
pub use pointcut::{Pointcut, PointcutExt};
pub use proxy::{
    is_proxy, proxy_strategy, Introspect, Operation, Proxy, ProxyFactory, ProxyStrategy, Reflect,
    TypeDescriptor,
};
pub use registry::{Advisor, AdvisorRegistry};

/// Common imports for declaring targets and building proxies.
pub mod prelude {
    pub use std::sync::Arc;

    pub use crate::advice::{self, AccessControl, AccessFlag, Advice, Caching, Logging, Timing};
    pub use crate::pointcut::{
        self, Always, Never, NameMatch, Pointcut, PointcutExt, RegexMatch, ShapeMatch, TypeMatch,
    };
    pub use crate::{
        args, concrete, contract, is_proxy, proxy_strategy, Advisor, Arguments, Introspect,
        Invocation, InterceptError, OperationId, Proxy, ProxyFactory, ProxyStrategy, Reflect,
        Result, Shape, TypeDescriptor, TypeInfo,
    };
    pub use serde_json::Value;
}
