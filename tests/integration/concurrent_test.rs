//! Concurrent use of shared proxies.
//!
//! Proxies are immutable after construction; every call gets its own
//! invocation, so threads never observe each other's chain state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;

use interpose::prelude::*;

use crate::common::{Account, AccountStore, MemoryStore, Notifier, NotifierOps};

const THREADS: usize = 8;
const CALLS_PER_THREAD: usize = 50;

#[test]
fn test_concurrent_calls_through_one_proxy() {
    let timing = Timing::new();
    let stats = timing.stats();
    let entered = Arc::new(AtomicUsize::new(0));

    let counter = {
        let entered = Arc::clone(&entered);
        advice::from_fn(move |inv| {
            entered.fetch_add(1, Ordering::SeqCst);
            inv.proceed()
        })
    };

    let mut factory = ProxyFactory::new();
    factory
        .add_advisor(Always, timing)
        .unwrap()
        .add_advisor(NameMatch::new(["notify"]).unwrap(), counter)
        .unwrap();
    let proxy = factory.build(Arc::new(Notifier::default())).unwrap();
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        for t in 0..THREADS {
            let proxy = proxy.clone();
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                for i in 0..CALLS_PER_THREAD {
                    proxy
                        .notify(format!("user-{}", t), format!("message {}", i))
                        .unwrap();
                }
            });
        }
    });

    let total = (THREADS * CALLS_PER_THREAD) as u64;
    assert_eq!(proxy.sent().unwrap() as u64, total);
    assert_eq!(entered.load(Ordering::SeqCst) as u64, total);
    assert_eq!(stats.get("Notifier::notify").unwrap().calls, total);
}

#[test]
fn test_concurrent_violations_stay_isolated() {
    let mut factory = ProxyFactory::new();
    factory
        .add_advisor(
            NameMatch::new(["open"]).unwrap(),
            advice::from_fn(|inv| {
                let first = inv.proceed();
                if inv.arguments().decode::<Account>(0)?.id % 2 == 0 {
                    return inv.proceed();
                }
                first
            })
            .named("even-retries"),
        )
        .unwrap();
    let store = MemoryStore::shared();
    let proxy = factory.build(store.clone() as Arc<dyn AccountStore>).unwrap();

    let results: Vec<(u64, bool)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS as u64)
            .map(|id| {
                let proxy = &proxy;
                scope.spawn(move || {
                    let result = proxy.open(Account::new(id, "owner", 0));
                    (id, result.is_ok())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (id, ok) in results {
        assert_eq!(ok, id % 2 == 1, "account {}", id);
    }
    assert_eq!(store.accounts().unwrap().len(), THREADS);
}
