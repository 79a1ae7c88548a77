//! Shared fixtures for integration tests.
//!
//! Provides a contract-based account store, a concrete notifier and a
//! concrete audit log with a sealed operation.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use interpose::prelude::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub owner: String,
    pub balance: i64,
}

impl Account {
    pub fn new(id: u64, owner: &str, balance: i64) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            balance,
        }
    }
}

contract! {
    /// Account persistence and transfers.
    pub trait AccountStore {
        fn open(&self, account: Account) -> Result<()>;
        fn balance(&self, id: u64) -> Result<i64>;
        fn transfer(&self, from: u64, to: u64, amount: i64) -> Result<i64>;
        fn accounts(&self) -> Result<Vec<Account>>;
    }
}

/// In-memory [`AccountStore`] that counts how often it is reached.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<BTreeMap<u64, Account>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Calls that reached the store itself.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl AccountStore for MemoryStore {
    fn open(&self, account: Account) -> Result<()> {
        self.hit();
        let mut accounts = self.accounts.lock();
        if accounts.contains_key(&account.id) {
            return Err(InterceptError::target(format!(
                "account {} already exists",
                account.id
            )));
        }
        accounts.insert(account.id, account);
        Ok(())
    }

    fn balance(&self, id: u64) -> Result<i64> {
        self.hit();
        self.accounts
            .lock()
            .get(&id)
            .map(|account| account.balance)
            .ok_or_else(|| InterceptError::target(format!("no account {}", id)))
    }

    fn transfer(&self, from: u64, to: u64, amount: i64) -> Result<i64> {
        self.hit();
        let mut accounts = self.accounts.lock();
        if !accounts.contains_key(&to) {
            return Err(InterceptError::target(format!("no account {}", to)));
        }
        let source = accounts
            .get_mut(&from)
            .ok_or_else(|| InterceptError::target(format!("no account {}", from)))?;
        if source.balance < amount {
            return Err(InterceptError::target("insufficient funds"));
        }
        source.balance -= amount;
        let remaining = source.balance;
        if let Some(destination) = accounts.get_mut(&to) {
            destination.balance += amount;
        }
        Ok(remaining)
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        self.hit();
        Ok(self.accounts.lock().values().cloned().collect())
    }
}

/// Store with two funded accounts, as a contract object.
pub fn funded_store() -> (Arc<MemoryStore>, Arc<dyn AccountStore>) {
    let store = MemoryStore::shared();
    store.open(Account::new(1, "alice", 100)).unwrap();
    store.open(Account::new(2, "bob", 50)).unwrap();
    let contract: Arc<dyn AccountStore> = store.clone();
    (store, contract)
}

/// Concrete notification sender without a contract trait.
#[derive(Default)]
pub struct Notifier {
    sent: AtomicU32,
}

impl Notifier {
    pub fn notify(&self, recipient: String, message: String) -> Result<u32> {
        if recipient.is_empty() || message.is_empty() {
            return Err(InterceptError::target("empty notification"));
        }
        Ok(self.sent.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn sent(&self) -> Result<u32> {
        Ok(self.sent.load(Ordering::SeqCst))
    }
}

concrete! {
    pub trait NotifierOps for Notifier {
        fn notify(&self, recipient: String, message: String) -> Result<u32>;
        fn sent(&self) -> Result<u32>;
    }
}

/// Append-only log whose `seal` operation cannot be overridden.
#[derive(Default)]
pub struct AuditLog {
    entries: Mutex<Vec<String>>,
}

impl AuditLog {
    pub fn append(&self, entry: String) -> Result<usize> {
        let mut entries = self.entries.lock();
        entries.push(entry);
        Ok(entries.len())
    }

    pub fn seal(&self) -> Result<Vec<String>> {
        Ok(std::mem::take(&mut *self.entries.lock()))
    }
}

concrete! {
    pub trait AuditLogOps for AuditLog {
        fn append(&self, entry: String) -> Result<usize>;
    }
    sealed {
        fn seal(&self) -> Result<Vec<String>>;
    }
}

/// Shared log of advice activity.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Advice that records `name:before` / `name:after` around each call.
pub fn recorder(log: &EventLog, name: &'static str) -> impl Advice {
    let log = Arc::clone(log);
    advice::from_fn(move |inv| {
        log.lock()
            .push(format!("{}:before:{}", name, inv.operation().name()));
        let result = inv.proceed();
        log.lock().push(format!("{}:after", name));
        result
    })
    .named(name)
}
