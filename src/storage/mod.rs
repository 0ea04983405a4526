//! Persistent state: site settings and the notification ledger.
//!
//! Both live in one key-value store behind the [`KvStore`] trait, in separate
//! namespaces. Two backends are provided: SQLite for deployments and an
//! in-memory map for tests and dry runs.

mod kv;
mod ledger;
mod memory;
mod settings;
mod sqlite;

// Re-export public API
pub use kv::{KvStore, Namespace};
pub use ledger::{entry_is_from, ledger_timestamp, NotificationLedger};
pub use memory::MemoryKvStore;
pub use settings::{load_site_config, save_site_config};
pub use sqlite::{run_migrations, SqliteKvStore};
