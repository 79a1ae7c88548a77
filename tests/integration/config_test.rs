//! Configuration-driven factory and advice setup.

use std::time::Duration;

use interpose::config::Config;
use interpose::prelude::*;
use interpose::utils::bootstrap::init_tracing;

use crate::common::{funded_store, AccountStore};

#[test]
fn test_config_drives_factory_and_advice() {
    let config = Config::from_yaml(
        r#"
proxy:
  proxy_target_class: true
timing:
  slow_threshold_ms: 15
logging:
  log_arguments: true
"#,
    )
    .unwrap();

    let timing = Timing::from_config(&config.timing);
    assert_eq!(timing.slow_threshold(), Some(Duration::from_millis(15)));

    let mut factory = ProxyFactory::with_config(config.proxy.clone());
    factory
        .add_advisor(Always, Logging::from_config(&config.logging))
        .unwrap()
        .add_advisor(Always, timing)
        .unwrap();

    let (_, contract) = funded_store();
    let proxy = factory.build(contract).unwrap();
    assert_eq!(proxy.strategy(), ProxyStrategy::Concrete);
    assert_eq!(proxy.balance(1).unwrap(), 100);
    assert_eq!(
        proxy.advice_names("balance").unwrap(),
        ["logging", "timing"]
    );
}

#[test]
fn test_invalid_config_is_an_error() {
    let result = Config::from_yaml("timing:\n  slow_threshold_ms: soon\n");
    assert!(matches!(result, Err(InterceptError::Config(_))));
}

#[test]
fn test_init_tracing_installs_once() {
    let first = init_tracing();
    let second = init_tracing();
    assert!(!second);
    let _ = first;

    let (_, contract) = funded_store();
    let mut factory = ProxyFactory::new();
    factory.add_advisor(Always, Logging::new()).unwrap();
    let proxy = factory.build(contract).unwrap();
    assert_eq!(proxy.balance(2).unwrap(), 50);
}
