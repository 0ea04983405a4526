//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (fatal pipeline errors, contained provider and
//!   dispatch errors, store and initialization errors)
//! - Provider error categorization
//! - Processing statistics tracking (errors, warnings, info metrics)
//!
//! Only [`PipelineError`] ever aborts a run. Everything else is counted,
//! logged and recovered from by falling back to defaults.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_provider_error, record_provider_error, ProviderKind};
pub use stats::ProcessingStats;
pub use types::{
    DispatchError, ErrorType, InfoType, InitializationError, PipelineError, ProviderError,
    StoreError, WarningType,
};
