//! Proxy introspection.

use std::sync::Arc;

use super::{Proxy, ProxyStrategy};

/// Ask an object whether it is a generated proxy.
///
/// Implemented by [`Proxy`], by every `dyn Trait` declared with
/// [`contract!`](crate::contract), and by every type declared with
/// [`concrete!`](crate::concrete).
pub trait Introspect {
    /// Strategy used to build this object, or `None` for a plain target.
    fn proxy_strategy(&self) -> Option<ProxyStrategy> {
        None
    }

    fn is_proxy(&self) -> bool {
        self.proxy_strategy().is_some()
    }
}

impl<T: ?Sized> Introspect for Proxy<T> {
    fn proxy_strategy(&self) -> Option<ProxyStrategy> {
        Some(self.strategy())
    }
}

impl<T: Introspect + ?Sized> Introspect for Arc<T> {
    fn proxy_strategy(&self) -> Option<ProxyStrategy> {
        (**self).proxy_strategy()
    }
}

impl<T: Introspect + ?Sized> Introspect for Box<T> {
    fn proxy_strategy(&self) -> Option<ProxyStrategy> {
        (**self).proxy_strategy()
    }
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn proxy_strategy(&self) -> Option<ProxyStrategy> {
        (**self).proxy_strategy()
    }
}

/// Whether `object` is a generated proxy.
pub fn is_proxy<T: Introspect + ?Sized>(object: &T) -> bool {
    object.is_proxy()
}

/// Strategy used to build `object`, `None` when it is not a proxy.
pub fn proxy_strategy<T: Introspect + ?Sized>(object: &T) -> Option<ProxyStrategy> {
    object.proxy_strategy()
}
