//! Timing advice.
//!
//! Measures how long the rest of the chain takes, keeps per-operation
//! statistics, and emits OpenTelemetry instruments when the `otel` feature
//! is enabled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use super::Advice;
use crate::config::TimingConfig;
use crate::error::Result;
use crate::invocation::Invocation;

/// Accumulated timings of one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationStats {
    pub calls: u64,
    pub failures: u64,
    pub total: Duration,
    pub max: Duration,
}

impl OperationStats {
    /// Mean duration per call, zero when nothing was recorded.
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.calls);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Shared handle to the statistics recorded by a [`Timing`] advice.
///
/// Keyed by `Type::operation`.
#[derive(Debug, Clone, Default)]
pub struct TimingStats {
    inner: Arc<RwLock<HashMap<String, OperationStats>>>,
}

impl TimingStats {
    fn record(&self, key: String, elapsed: Duration, ok: bool) {
        let mut stats = self.inner.write();
        let entry = stats.entry(key).or_default();
        entry.calls += 1;
        if !ok {
            entry.failures += 1;
        }
        entry.total += elapsed;
        entry.max = entry.max.max(elapsed);
    }

    /// Stats for one `Type::operation` key.
    pub fn get(&self, key: &str) -> Option<OperationStats> {
        self.inner.read().get(key).copied()
    }

    /// Copy of all recorded stats.
    pub fn snapshot(&self) -> HashMap<String, OperationStats> {
        self.inner.read().clone()
    }

    /// Calls recorded across all operations.
    pub fn total_calls(&self) -> u64 {
        self.inner.read().values().map(|s| s.calls).sum()
    }

    pub fn reset(&self) {
        self.inner.write().clear();
    }
}

/// Advice that times every call it wraps.
///
/// # Example
///
/// ```ignore
/// let timing = Timing::new().with_slow_threshold(Duration::from_millis(50));
/// let stats = timing.stats();
/// factory.add_advisor(Always, timing)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Timing {
    stats: TimingStats,
    slow_threshold: Option<Duration>,
}

impl Timing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &TimingConfig) -> Self {
        Self {
            stats: TimingStats::default(),
            slow_threshold: config.slow_threshold_ms.map(Duration::from_millis),
        }
    }

    /// Warn about calls slower than `threshold`.
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    pub fn slow_threshold(&self) -> Option<Duration> {
        self.slow_threshold
    }

    /// Handle to the recorded statistics. Shares state with the advice.
    pub fn stats(&self) -> TimingStats {
        self.stats.clone()
    }
}

impl Advice for Timing {
    fn name(&self) -> &str {
        "timing"
    }

    fn execute(&self, invocation: &mut Invocation<'_>) -> Result<Value> {
        let start = Instant::now();

        let result = invocation.proceed();

        let elapsed = start.elapsed();
        let key = invocation.operation().qualified(invocation.type_info());

        #[cfg(feature = "otel")]
        {
            use crate::utils::metrics::{self, INVOCATION_DURATION, INVOCATION_TOTAL};
            let outcome = if result.is_ok() { "success" } else { "error" };
            let attrs = [
                metrics::type_attr(invocation.type_info().name()),
                metrics::operation_attr(invocation.operation().name()),
                metrics::outcome_attr(outcome),
            ];
            INVOCATION_DURATION.record(elapsed.as_secs_f64(), &attrs);
            INVOCATION_TOTAL.add(1, &attrs);
        }

        match self.slow_threshold {
            Some(threshold) if elapsed > threshold => warn!(
                operation = %key,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = threshold.as_millis() as u64,
                "Slow invocation"
            ),
            _ => debug!(
                operation = %key,
                elapsed_us = elapsed.as_micros() as u64,
                "Invocation timed"
            ),
        }

        self.stats.record(key, elapsed, result.is_ok());
        result
    }
}
