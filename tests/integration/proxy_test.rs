//! Proxy construction and dispatch through the public API.

use interpose::prelude::*;

use crate::common::{
    event_log, funded_store, recorder, Account, AccountStore, AuditLog, AuditLogOps, MemoryStore,
    Notifier, NotifierOps,
};

#[test]
fn test_contract_proxy_round_trip() {
    let (store, contract) = funded_store();
    let proxy = ProxyFactory::new().build(contract).unwrap();

    assert_eq!(proxy.transfer(1, 2, 30).unwrap(), 70);
    assert_eq!(proxy.balance(2).unwrap(), 80);
    assert_eq!(proxy.accounts().unwrap().len(), 2);
    assert_eq!(store.calls(), 5);
}

#[test]
fn test_concrete_proxy_round_trip() {
    let proxy = ProxyFactory::new()
        .build(Arc::new(Notifier::default()))
        .unwrap();

    assert_eq!(
        proxy
            .notify("alice".to_string(), "welcome".to_string())
            .unwrap(),
        1
    );
    assert_eq!(NotifierOps::sent(&proxy).unwrap(), 1);
    assert_eq!(proxy.strategy(), ProxyStrategy::Concrete);
}

#[test]
fn test_strategy_introspection() {
    let (_, contract) = funded_store();
    assert!(!is_proxy(&contract));

    let proxy = ProxyFactory::new().build(Arc::clone(&contract)).unwrap();
    assert!(is_proxy(&proxy));
    assert_eq!(proxy_strategy(&proxy), Some(ProxyStrategy::Contract));
    assert_eq!(ProxyStrategy::Contract.to_string(), "contract-based");

    let erased: Arc<dyn AccountStore> = Arc::new(proxy);
    assert!(is_proxy(&erased));

    let notifier = Notifier::default();
    assert_eq!(proxy_strategy(&notifier), None);
}

#[test]
fn test_sealed_operation_rejected_with_and_without_advice() {
    let err = ProxyFactory::new()
        .build(Arc::new(AuditLog::default()))
        .unwrap_err();
    assert!(matches!(
        err,
        InterceptError::UnproxyableOperation { ref type_name, ref operation }
            if type_name == "AuditLog" && operation == "seal()"
    ));

    let mut factory = ProxyFactory::new();
    factory
        .add_advisor(NameMatch::new(["append"]).unwrap(), Timing::new())
        .unwrap();
    assert!(factory.build(Arc::new(AuditLog::default())).is_err());

    let log = AuditLog::default();
    assert_eq!(AuditLogOps::append(&log, "opened".to_string()).unwrap(), 1);
    assert_eq!(log.seal().unwrap(), ["opened"]);
}

#[test]
fn test_pointcuts_select_operations() {
    let log = event_log();
    let mut factory = ProxyFactory::new();
    factory
        .add_advisor(
            RegexMatch::new(r"AccountStore::(open|transfer)").unwrap(),
            recorder(&log, "writes"),
        )
        .unwrap()
        .add_advisor(
            TypeMatch::new("Account*").unwrap().and(NameMatch::new(["balance"]).unwrap()),
            recorder(&log, "reads"),
        )
        .unwrap()
        .add_advisor(ShapeMatch(Shape::Concrete), recorder(&log, "concrete"))
        .unwrap();

    let (_, contract) = funded_store();
    let proxy = factory.build(contract).unwrap();

    proxy.transfer(1, 2, 10).unwrap();
    proxy.balance(1).unwrap();
    proxy.accounts().unwrap();

    assert_eq!(
        *log.lock(),
        [
            "writes:before:transfer",
            "writes:after",
            "reads:before:balance",
            "reads:after"
        ]
    );
    assert!(!proxy.is_advised("accounts"));
}

#[test]
fn test_proxy_of_proxy_nests_chains() {
    let log = event_log();

    let mut inner_factory = ProxyFactory::new();
    inner_factory
        .add_advisor(Always, recorder(&log, "inner"))
        .unwrap();
    let (_, contract) = funded_store();
    let inner: Arc<dyn AccountStore> = Arc::new(inner_factory.build(contract).unwrap());

    let mut outer_factory = ProxyFactory::new();
    outer_factory
        .add_advisor(Always, recorder(&log, "outer"))
        .unwrap();
    let outer = outer_factory.build(inner).unwrap();

    outer.balance(1).unwrap();

    assert_eq!(
        *log.lock(),
        [
            "outer:before:balance",
            "inner:before:balance",
            "inner:after",
            "outer:after"
        ]
    );
}

#[test]
fn test_dynamic_calls_share_the_chain() {
    let log = event_log();
    let mut factory = ProxyFactory::new();
    factory.add_advisor(Always, recorder(&log, "rec")).unwrap();

    let proxy = factory.build(MemoryStore::shared() as Arc<dyn AccountStore>).unwrap();
    proxy
        .invoke("open", args![Account::new(9, "zed", 5)].unwrap())
        .unwrap();
    let balance: i64 = proxy.call("balance", args![9u64].unwrap()).unwrap();

    assert_eq!(balance, 5);
    assert_eq!(log.lock().len(), 4);
}

#[test]
fn test_target_failure_passes_through_advice() {
    let mut factory = ProxyFactory::new();
    factory
        .add_advisor(Always, Logging::new())
        .unwrap()
        .add_advisor(Always, Timing::new())
        .unwrap();
    let (_, contract) = funded_store();
    let proxy = factory.build(contract).unwrap();

    let err = proxy.transfer(2, 1, 500).unwrap_err();
    assert!(err.is_target_failure());
    assert_eq!(err.to_string(), "Target invocation failed: insufficient funds");
}
