//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use std::time::Duration;

use axum::http::StatusCode;
use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for key-value store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQL execution error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Fatal errors that abort a pipeline run.
///
/// Only feed retrieval (and the settings read preceding it) can fail a run;
/// every provider and dispatch failure is contained further down.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The feed URL is missing or not a valid http(s) URL.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The feed could not be fetched or returned a non-success status.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The feed body is not a non-empty JSON array of VPS entries.
    #[error("Feed format error: {0}")]
    Format(String),

    /// The settings store could not be read.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// User-facing hint for the error category.
    ///
    /// Raw error details stay in the logs; callers rendering a response to an
    /// operator show this text instead.
    pub fn user_hint(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => {
                "No valid feed URL is configured. Save the direct link to your VPS JSON file in the settings."
            }
            PipelineError::Upstream(_) => {
                "The VPS feed could not be downloaded. Check that the feed URL is reachable."
            }
            PipelineError::Format(_) => {
                "The VPS feed is not a valid JSON array. Check the feed URL format and the JSON content."
            }
            PipelineError::Store(_) => "Settings could not be loaded. Please try again later.",
        }
    }

    /// HTTP status used when the error is surfaced through the web interface.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A single IP-info or exchange-rate provider yielded nothing.
///
/// Never fatal: resolvers count and log these, then fall back.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Request(#[from] ReqwestError),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contained no usable data")]
    Empty,
}

/// A notification could not be delivered.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("request failed: {0}")]
    Request(#[from] ReqwestError),

    #[error("Telegram API returned HTTP {0}")]
    Status(u16),

    #[error("Telegram API rejected the message: {0}")]
    Rejected(String),
}

/// Types of errors that can occur during a pipeline run.
///
/// None of these abort a run; they are counted for the end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Geo provider failures
    GeoProviderTimeout,
    GeoProviderStatus,
    GeoProviderRequest,
    GeoProviderMalformed,
    GeoProviderEmpty,
    // Rate provider failures
    RateProviderTimeout,
    RateProviderStatus,
    RateProviderRequest,
    RateProviderMalformed,
    RateProviderEmpty,
    // Notification failures
    DispatchFailed,
    LedgerReadFailed,
    LedgerWriteFailed,
}

/// Types of warnings that can occur during a pipeline run.
///
/// Warnings indicate missing data that doesn't stop a record from being
/// rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    GeoUnresolved,     // No provider resolved any field for an IP
    RateFallbackUsed,  // Every rate provider failed
    PriceUnparsed,     // Price did not match amount+unit
    EndDateUnparsed,   // endday is not a date
    DuplicateIp,       // Same IP listed more than once in the feed
}

/// Types of informational metrics recorded during a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    NotificationSent,
    NotificationAlreadySent, // Ledger already has an entry for today
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::GeoProviderTimeout => "Geo provider timeout",
            ErrorType::GeoProviderStatus => "Geo provider HTTP status error",
            ErrorType::GeoProviderRequest => "Geo provider request error",
            ErrorType::GeoProviderMalformed => "Geo provider malformed response",
            ErrorType::GeoProviderEmpty => "Geo provider empty response",
            ErrorType::RateProviderTimeout => "Rate provider timeout",
            ErrorType::RateProviderStatus => "Rate provider HTTP status error",
            ErrorType::RateProviderRequest => "Rate provider request error",
            ErrorType::RateProviderMalformed => "Rate provider malformed response",
            ErrorType::RateProviderEmpty => "Rate provider empty response",
            ErrorType::DispatchFailed => "Notification dispatch failed",
            ErrorType::LedgerReadFailed => "Notification ledger read failed",
            ErrorType::LedgerWriteFailed => "Notification ledger write failed",
        }
    }
}

impl std::fmt::Display for WarningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::GeoUnresolved => "IP with no geo data",
            WarningType::RateFallbackUsed => "Fallback exchange rate used",
            WarningType::PriceUnparsed => "Unparsable price",
            WarningType::EndDateUnparsed => "Unparsable expiry date",
            WarningType::DuplicateIp => "Duplicate IP in feed",
        }
    }
}

impl std::fmt::Display for InfoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::NotificationSent => "Reminder sent",
            InfoType::NotificationAlreadySent => "Reminder already sent today",
        }
    }
}
