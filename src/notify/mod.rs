//! Expiry reminders.
//!
//! This module provides:
//! - Per-mode text escaping and the reminder template
//! - The [`Messenger`] seam and its Telegram implementation
//! - The once-per-day [`NotificationGate`]

mod format;
mod gate;
mod telegram;

// Re-export public API
pub use format::{build_reminder, MessageFormat};
pub(crate) use gate::count_duplicates;
pub use gate::{GateDecision, GateOutcome, GateSummary, NotificationGate, ReminderState};
pub use telegram::{Messenger, TelegramMessenger};
