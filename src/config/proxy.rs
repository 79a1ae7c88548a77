//! Proxy construction configuration.

use serde::Deserialize;

/// Proxy factory configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Use the concrete (subclass-based) strategy even for contract targets.
    pub proxy_target_class: bool,
}

impl ProxyConfig {
    /// Config that forces the concrete strategy.
    pub fn target_class() -> Self {
        Self {
            proxy_target_class: true,
        }
    }
}
