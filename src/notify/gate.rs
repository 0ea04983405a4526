//! Once-per-day reminder gate.
//!
//! Per `(ip, UTC day)` a record moves `NotDue -> Due -> Sent`. The ledger is
//! written only after the messenger confirms delivery, so a failed send
//! leaves the record `Due` and the next run tries again.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::future::{self, join_all, BoxFuture, FutureExt};
use log::{debug, info, warn};
use serde::Serialize;

use super::format::{build_reminder, MessageFormat};
use super::telegram::Messenger;
use crate::enrich::EnrichedRecord;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};
use crate::storage::{KvStore, NotificationLedger};

/// Whether a record is inside the reminder window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    NotDue,
    Due { days_remaining: i64 },
}

impl ReminderState {
    /// Due when `0 < days_remaining <= threshold`.
    pub fn of(record: &EnrichedRecord, threshold: u32) -> Self {
        match record.days_remaining {
            Some(days) if days > 0 && days <= i64::from(threshold) => ReminderState::Due {
                days_remaining: days,
            },
            _ => ReminderState::NotDue,
        }
    }
}

/// What the gate did with one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    NotDue,
    /// Ledger already holds an entry dated today
    AlreadySent,
    Sent,
    /// Dispatch failed; nothing was written
    Failed,
    /// A record with the same IP appeared earlier in the feed
    Duplicate,
    /// Ledger read failed; nothing was sent
    LedgerUnavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct GateDecision {
    pub ip: String,
    pub outcome: GateOutcome,
}

/// Per-record outcomes, in feed order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GateSummary {
    pub decisions: Vec<GateDecision>,
}

impl GateSummary {
    pub fn count(&self, outcome: GateOutcome) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.outcome == outcome)
            .count()
    }

    pub fn sent(&self) -> usize {
        self.count(GateOutcome::Sent)
    }
}

pub struct NotificationGate<'a, S: KvStore + ?Sized> {
    ledger: NotificationLedger<'a, S>,
    messenger: &'a dyn Messenger,
    format: MessageFormat,
    threshold: u32,
    stats: &'a ProcessingStats,
}

impl<'a, S: KvStore + ?Sized> NotificationGate<'a, S> {
    pub fn new(
        store: &'a S,
        messenger: &'a dyn Messenger,
        format: MessageFormat,
        threshold: u32,
        stats: &'a ProcessingStats,
    ) -> Self {
        Self {
            ledger: NotificationLedger::new(store),
            messenger,
            format,
            threshold,
            stats,
        }
    }

    /// Runs every record through the gate concurrently.
    ///
    /// Only the first record for each IP is considered; later ones are
    /// reported as [`GateOutcome::Duplicate`].
    pub async fn process(&self, records: &[EnrichedRecord], now: DateTime<Utc>) -> GateSummary {
        let mut seen = HashSet::new();
        let mut pending: Vec<BoxFuture<'_, GateOutcome>> = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.ip()) {
                pending.push(self.process_one(record, now).boxed());
            } else {
                pending.push(future::ready(GateOutcome::Duplicate).boxed());
            }
        }
        let outcomes = join_all(pending).await;

        let decisions: Vec<GateDecision> = records
            .iter()
            .zip(outcomes)
            .map(|(record, outcome)| GateDecision {
                ip: record.ip().to_string(),
                outcome,
            })
            .collect();
        let summary = GateSummary { decisions };
        info!(
            "Reminders: {} sent, {} already sent today, {} failed",
            summary.sent(),
            summary.count(GateOutcome::AlreadySent),
            summary.count(GateOutcome::Failed)
        );
        summary
    }

    async fn process_one(&self, record: &EnrichedRecord, now: DateTime<Utc>) -> GateOutcome {
        let ReminderState::Due { days_remaining } = ReminderState::of(record, self.threshold)
        else {
            return GateOutcome::NotDue;
        };
        let ip = record.ip();

        match self.ledger.sent_on(ip, now.date_naive()).await {
            Ok(true) => {
                debug!("Reminder for {} already sent today", ip);
                self.stats.increment_info(InfoType::NotificationAlreadySent);
                return GateOutcome::AlreadySent;
            }
            Ok(false) => {}
            Err(e) => {
                self.stats.increment_error(ErrorType::LedgerReadFailed);
                warn!("Skipping reminder for {}: ledger read failed: {}", ip, e);
                return GateOutcome::LedgerUnavailable;
            }
        }

        let text = build_reminder(record, days_remaining, self.format);
        if !self.messenger.send(&text).await {
            self.stats.increment_error(ErrorType::DispatchFailed);
            return GateOutcome::Failed;
        }

        self.stats.increment_info(InfoType::NotificationSent);
        info!("Sent expiry reminder for {} ({} days left)", ip, days_remaining);
        if let Err(e) = self.ledger.record_sent(ip, now).await {
            self.stats.increment_error(ErrorType::LedgerWriteFailed);
            warn!("Reminder for {} sent but ledger write failed: {}", ip, e);
        }
        GateOutcome::Sent
    }
}

/// Counts duplicate IPs for the run statistics.
pub(crate) fn count_duplicates(records: &[EnrichedRecord], stats: &ProcessingStats) {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.ip()) {
            stats.increment_warning(WarningType::DuplicateIp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::merge;
    use crate::feed::VpsRecord;
    use crate::rates::ExchangeRate;
    use crate::storage::{ledger_timestamp, MemoryKvStore, Namespace};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingMessenger {
        calls: AtomicUsize,
        succeed: bool,
    }

    impl CountingMessenger {
        fn new(succeed: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                succeed,
            }
        }
    }

    #[async_trait]
    impl Messenger for CountingMessenger {
        async fn send(&self, _text: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.succeed
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    fn records(entries: &[(&str, i64)]) -> Vec<EnrichedRecord> {
        let today = now().date_naive();
        let feed: Vec<VpsRecord> = entries
            .iter()
            .map(|(ip, offset)| VpsRecord {
                ip: ip.to_string(),
                store: "Acme".into(),
                store_url: "https://acme.example".into(),
                startday: String::new(),
                endday: (today + Duration::days(*offset)).format("%Y-%m-%d").to_string(),
                price: "12.00USD".into(),
            })
            .collect();
        merge(&feed, &HashMap::new(), &ExchangeRate::fallback(now()), today)
    }

    #[test]
    fn test_reminder_window_bounds() {
        let recs = records(&[("a", 0), ("b", 1), ("c", 5), ("d", 6), ("e", -1)]);
        let states: Vec<_> = recs.iter().map(|r| ReminderState::of(r, 5)).collect();
        assert_eq!(
            states,
            [
                ReminderState::NotDue,
                ReminderState::Due { days_remaining: 1 },
                ReminderState::Due { days_remaining: 5 },
                ReminderState::NotDue,
                ReminderState::NotDue,
            ]
        );
    }

    #[tokio::test]
    async fn test_sent_once_per_day() {
        let store = MemoryKvStore::new();
        let messenger = CountingMessenger::new(true);
        let stats = ProcessingStats::new();
        let gate = NotificationGate::new(&store, &messenger, MessageFormat::Plain, 5, &stats);
        let recs = records(&[("1.2.3.4", 3)]);

        let first = gate.process(&recs, now()).await;
        assert_eq!(first.sent(), 1);
        let entry = store.get(Namespace::Ledger, "1.2.3.4").await.unwrap().unwrap();
        assert!(entry.starts_with("2026-10-16T"), "{entry}");

        let second = gate.process(&recs, now()).await;
        assert_eq!(second.sent(), 0);
        assert_eq!(second.count(GateOutcome::AlreadySent), 1);
        assert_eq!(messenger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_yesterdays_entry_sends_again() {
        let store = MemoryKvStore::new();
        store
            .put(
                Namespace::Ledger,
                "1.2.3.4",
                &ledger_timestamp(now() - Duration::days(1)),
            )
            .await
            .unwrap();
        let messenger = CountingMessenger::new(true);
        let stats = ProcessingStats::new();
        let gate = NotificationGate::new(&store, &messenger, MessageFormat::Plain, 5, &stats);

        let summary = gate.process(&records(&[("1.2.3.4", 2)]), now()).await;
        assert_eq!(summary.sent(), 1);
        assert_eq!(messenger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_send_leaves_ledger_untouched() {
        let store = MemoryKvStore::new();
        let messenger = CountingMessenger::new(false);
        let stats = ProcessingStats::new();
        let gate = NotificationGate::new(&store, &messenger, MessageFormat::Plain, 5, &stats);

        let summary = gate.process(&records(&[("1.2.3.4", 2)]), now()).await;
        assert_eq!(summary.count(GateOutcome::Failed), 1);
        assert_eq!(store.get(Namespace::Ledger, "1.2.3.4").await.unwrap(), None);
        assert_eq!(stats.get_error_count(ErrorType::DispatchFailed), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ips_dispatch_once() {
        let store = MemoryKvStore::new();
        let messenger = CountingMessenger::new(true);
        let stats = ProcessingStats::new();
        let gate = NotificationGate::new(&store, &messenger, MessageFormat::Plain, 5, &stats);
        let recs = records(&[("1.2.3.4", 2), ("5.6.7.8", 30), ("1.2.3.4", 3)]);

        let summary = gate.process(&recs, now()).await;
        let outcomes: Vec<_> = summary.decisions.iter().map(|d| d.outcome).collect();
        assert_eq!(
            outcomes,
            [GateOutcome::Sent, GateOutcome::NotDue, GateOutcome::Duplicate]
        );
        assert_eq!(messenger.calls.load(Ordering::SeqCst), 1);

        count_duplicates(&recs, &stats);
        assert_eq!(stats.get_warning_count(WarningType::DuplicateIp), 1);
    }
}
