//! Type descriptors: the operation tables proxies dispatch through.
//!
//! A descriptor lists every operation of a target type together with an
//! invoker that decodes [`Arguments`], calls the real method and encodes the
//! result. The table is resolved once when a proxy is built, so a call never
//! has to look an operation up by reflection.
//!
//! Descriptors are normally generated by [`contract!`](crate::contract) and
//! [`concrete!`](crate::concrete), but can be written by hand:
//!
//! ```ignore
//! impl Reflect for Counter {
//!     fn descriptor() -> TypeDescriptor<Self> {
//!         TypeDescriptor::concrete("Counter")
//!             .operation(OperationId::named("get"), |c: &Counter, _| encode(&c.get()))
//!             .sealed_operation(OperationId::named("reset"), |c: &Counter, _| {
//!                 c.reset();
//!                 encode(&())
//!             })
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::invocation::{Arguments, OperationId, Shape, TypeInfo};

type Invoker<T> = Arc<dyn Fn(&T, &Arguments) -> Result<Value> + Send + Sync>;

/// One callable member of a target type.
pub struct Operation<T: ?Sized> {
    id: OperationId,
    overridable: bool,
    invoker: Invoker<T>,
}

impl<T: ?Sized> Operation<T> {
    pub fn new<F>(id: OperationId, invoker: F) -> Self
    where
        F: Fn(&T, &Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            id,
            overridable: true,
            invoker: Arc::new(invoker),
        }
    }

    /// Mark the operation as non-overridable.
    pub fn sealed(mut self) -> Self {
        self.overridable = false;
        self
    }

    pub fn id(&self) -> &OperationId {
        &self.id
    }

    pub fn is_overridable(&self) -> bool {
        self.overridable
    }

    /// Call the real operation on `target`.
    pub fn invoke(&self, target: &T, arguments: &Arguments) -> Result<Value> {
        (self.invoker)(target, arguments)
    }
}

impl<T: ?Sized> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            overridable: self.overridable,
            invoker: Arc::clone(&self.invoker),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("overridable", &self.overridable)
            .finish()
    }
}

/// Type information plus the operation table of a target type.
pub struct TypeDescriptor<T: ?Sized> {
    info: TypeInfo,
    operations: Vec<Operation<T>>,
}

impl<T: ?Sized> TypeDescriptor<T> {
    pub fn new(info: TypeInfo) -> Self {
        Self {
            info,
            operations: Vec::new(),
        }
    }

    /// Descriptor of a contract (trait object) type.
    pub fn contract(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(TypeInfo::new(name, Shape::Contract))
    }

    /// Descriptor of a concrete type.
    pub fn concrete(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(TypeInfo::new(name, Shape::Concrete))
    }

    /// Add an overridable operation.
    pub fn operation<F>(self, id: OperationId, invoker: F) -> Self
    where
        F: Fn(&T, &Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        self.with(Operation::new(id, invoker))
    }

    /// Add a non-overridable operation.
    pub fn sealed_operation<F>(self, id: OperationId, invoker: F) -> Self
    where
        F: Fn(&T, &Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        self.with(Operation::new(id, invoker).sealed())
    }

    pub fn with(mut self, operation: Operation<T>) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn info(&self) -> &TypeInfo {
        &self.info
    }

    pub fn operations(&self) -> &[Operation<T>] {
        &self.operations
    }

    pub(crate) fn into_parts(self) -> (TypeInfo, Vec<Operation<T>>) {
        (self.info, self.operations)
    }
}

impl<T: ?Sized> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("info", &self.info)
            .field("operations", &self.operations)
            .finish()
    }
}

/// Types that can describe their own operations.
///
/// Implemented for `dyn Trait` by [`contract!`](crate::contract) and for
/// concrete types by [`concrete!`](crate::concrete).
pub trait Reflect: Send + Sync + 'static {
    fn descriptor() -> TypeDescriptor<Self>;
}
