//! In-memory key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::kv::{KvStore, Namespace};
use crate::error_handling::StoreError;

/// Key-value store that lives only as long as the process.
///
/// Used for dry runs and tests; nothing survives a restart, so the
/// once-per-day guarantee only holds within one process.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<(Namespace, String), String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in `ns`.
    pub async fn len(&self, ns: Namespace) -> usize {
        self.entries
            .read()
            .await
            .keys()
            .filter(|(entry_ns, _)| *entry_ns == ns)
            .count()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(&(ns, key.to_string())).cloned())
    }

    async fn put(&self, ns: Namespace, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert((ns, key.to_string()), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryKvStore::new();
        store.put(Namespace::Ledger, "1.2.3.4", "2026-01-01T00:00:00.000Z").await.unwrap();
        store.put(Namespace::Config, "sitename", "x").await.unwrap();

        assert_eq!(store.len(Namespace::Ledger).await, 1);
        assert_eq!(
            store.get(Namespace::Ledger, "1.2.3.4").await.unwrap().as_deref(),
            Some("2026-01-01T00:00:00.000Z")
        );
        assert_eq!(store.get(Namespace::Ledger, "sitename").await.unwrap(), None);
    }
}
