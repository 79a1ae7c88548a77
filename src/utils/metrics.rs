//! OTel-native metrics instruments.
//!
//! All instruments are lazily initialized and feature-gated behind `otel`.
//! Naming follows OTel semantic conventions (dot-separated).

use std::sync::LazyLock;

use opentelemetry::metrics::{Counter, Histogram, Meter};
use opentelemetry::{global, KeyValue};

static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("interpose"));

/// Duration of intercepted calls, measured by the timing advice.
pub static INVOCATION_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("interpose.invocation.duration")
        .with_description("Intercepted call duration")
        .with_unit("s")
        .build()
});

/// Total intercepted calls.
pub static INVOCATION_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("interpose.invocation.total")
        .with_description("Total intercepted calls")
        .build()
});

/// Create a target type label.
pub fn type_attr(type_name: &str) -> KeyValue {
    KeyValue::new("type", type_name.to_string())
}

/// Create an operation label.
pub fn operation_attr(operation: &str) -> KeyValue {
    KeyValue::new("operation", operation.to_string())
}

/// Create an outcome label.
pub fn outcome_attr(outcome: &str) -> KeyValue {
    KeyValue::new("outcome", outcome.to_string())
}
