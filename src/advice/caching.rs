//! Result-caching advice.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::trace;

use super::Advice;
use crate::error::Result;
use crate::invocation::Invocation;

/// Target id, qualified operation, argument key.
type CacheKey = (u64, String, String);

/// Advice that memoises successful results keyed by target instance,
/// operation and arguments.
///
/// A cache hit returns the stored value without calling `proceed()`.
/// Failures are never cached. Clones share the same cache.
#[derive(Debug, Clone, Default)]
pub struct Caching {
    entries: Arc<RwLock<HashMap<CacheKey, Value>>>,
    max_entries: Option<usize>,
}

impl Caching {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop adding entries once `max` results are cached.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached result of `Type::operation`, for every target.
    pub fn invalidate(&self, qualified_operation: &str) {
        self.entries
            .write()
            .retain(|(_, operation, _), _| operation != qualified_operation);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Advice for Caching {
    fn name(&self) -> &str {
        "caching"
    }

    fn execute(&self, invocation: &mut Invocation<'_>) -> Result<Value> {
        let key = (
            invocation.target_id(),
            invocation.operation().qualified(invocation.type_info()),
            invocation.arguments().key(),
        );

        if let Some(hit) = self.entries.read().get(&key) {
            trace!(target_id = key.0, operation = %key.1, "Cache hit");
            return Ok(hit.clone());
        }

        let value = invocation.proceed()?;

        let mut entries = self.entries.write();
        if self.max_entries.map_or(true, |max| entries.len() < max) {
            entries.insert(key, value.clone());
        }
        Ok(value)
    }
}
