//! Built-in advice configuration.

use serde::Deserialize;

/// Timing advice configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Calls slower than this are logged at `warn`. Unset disables the check.
    pub slow_threshold_ms: Option<u64>,
}

/// Logging advice configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Include encoded arguments in entry events.
    pub log_arguments: bool,
}
