//! Processing statistics tracking.
//!
//! Counters for contained failures, data warnings and notable events during a
//! pipeline run. Lookups run concurrently, so every counter is atomic.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};

fn zeroed<T: IntoEnumIterator + Eq + Hash>() -> HashMap<T, AtomicUsize> {
    T::iter().map(|t| (t, AtomicUsize::new(0))).collect()
}

fn load<T: Eq + Hash>(map: &HashMap<T, AtomicUsize>, key: &T) -> usize {
    map.get(key).map(|c| c.load(Ordering::SeqCst)).unwrap_or(0)
}

/// Thread-safe processing statistics tracker.
///
/// Every enum variant is registered at construction, so increments never miss.
/// Share across tasks with `Arc`.
#[derive(Debug)]
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    warnings: HashMap<WarningType, AtomicUsize>,
    info: HashMap<InfoType, AtomicUsize>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        ProcessingStats {
            errors: zeroed(),
            warnings: zeroed(),
            info: zeroed(),
        }
    }

    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_warning(&self, warning: WarningType) {
        if let Some(counter) = self.warnings.get(&warning) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_info(&self, info_type: InfoType) {
        if let Some(counter) = self.info.get(&info_type) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        load(&self.errors, &error)
    }

    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        load(&self.warnings, &warning)
    }

    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        load(&self.info, &info_type)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Get total warning count across all warning types.
    pub fn total_warnings(&self) -> usize {
        WarningType::iter().map(|w| self.get_warning_count(w)).sum()
    }

    /// Logs every non-zero counter at info level.
    pub fn log_summary(&self) {
        if self.total_errors() > 0 {
            log::info!("Contained errors: {}", self.total_errors());
            for error_type in ErrorType::iter() {
                let count = self.get_error_count(error_type);
                if count > 0 {
                    log::info!("   {}: {}", error_type, count);
                }
            }
        }
        if self.total_warnings() > 0 {
            log::info!("Warnings: {}", self.total_warnings());
            for warning_type in WarningType::iter() {
                let count = self.get_warning_count(warning_type);
                if count > 0 {
                    log::info!("   {}: {}", warning_type, count);
                }
            }
        }
        for info_type in InfoType::iter() {
            let count = self.get_info_count(info_type);
            if count > 0 {
                log::info!("{}: {}", info_type, count);
            }
        }
    }
}
