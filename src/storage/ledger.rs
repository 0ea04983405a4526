//! Notification ledger.
//!
//! Maps an IP address to the RFC 3339 timestamp of the last reminder that was
//! successfully delivered for it. Only the `YYYY-MM-DD` prefix is compared;
//! the full timestamp is kept for diagnostics. All dates are UTC.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error_handling::StoreError;

use super::kv::{KvStore, Namespace};

/// Formats `now` the way ledger entries are stored (`2026-10-16T08:30:00.000Z`).
pub fn ledger_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns true when a stored ledger entry falls on `today`.
///
/// Compares the date portion before `T` only.
pub fn entry_is_from(entry: &str, today: NaiveDate) -> bool {
    let date_part = entry.split('T').next().unwrap_or_default();
    date_part == today.format("%Y-%m-%d").to_string()
}

/// Read/write view of the ledger namespace of a store.
pub struct NotificationLedger<'a, S: KvStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KvStore + ?Sized> NotificationLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Timestamp of the last delivered reminder for `ip`, if any.
    pub async fn last_sent(&self, ip: &str) -> Result<Option<String>, StoreError> {
        self.store.get(Namespace::Ledger, ip).await
    }

    /// Whether a reminder for `ip` was already delivered on `today`.
    pub async fn sent_on(&self, ip: &str, today: NaiveDate) -> Result<bool, StoreError> {
        Ok(self
            .last_sent(ip)
            .await?
            .is_some_and(|entry| entry_is_from(&entry, today)))
    }

    /// Records a delivered reminder. Call only after the dispatch succeeded.
    pub async fn record_sent(&self, ip: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.store
            .put(Namespace::Ledger, ip, &ledger_timestamp(now))
            .await
    }
}
