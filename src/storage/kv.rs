//! Key-value store abstraction.

use async_trait::async_trait;

use crate::error_handling::StoreError;

/// Key namespace inside the store.
///
/// Settings and the notification ledger share one store but never one key
/// space, so an IP address can't collide with a settings key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Config,
    Ledger,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Config => "config",
            Namespace::Ledger => "ledger",
        }
    }
}

/// An eventually-consistent external key-value store.
///
/// Access is plain read-then-write; there is no compare-and-swap, so two
/// overlapping pipeline runs may both act on the same stale read.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, ns: Namespace, key: &str, value: &str) -> Result<(), StoreError>;
}
