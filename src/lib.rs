//! vps_monitor library: VPS inventory enrichment and expiry reminders
//!
//! This library fetches an operator-maintained JSON feed of VPS instances,
//! enriches each entry with geolocation/ASN data and residual value, and sends
//! at most one Telegram reminder per instance per UTC day as expiry approaches.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vps_monitor::storage::{KvStore, SqliteKvStore};
//! use vps_monitor::initialization::init_client;
//! use vps_monitor::{Config, Pipeline, Trigger};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let store: Arc<dyn KvStore> = Arc::new(SqliteKvStore::open(&config.db_path).await?);
//! let client = init_client(&config)?;
//!
//! let pipeline = Pipeline::new(client, store, config);
//! let report = pipeline.run(Trigger::Scheduled).await?;
//! println!("{} VPS entries, USD->CNY {}", report.records.len(), report.rate.rate_cny);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod cli;
pub mod config;
pub mod enrich;
pub mod error_handling;
pub mod feed;
pub mod geo;
pub mod initialization;
pub mod notify;
pub mod pipeline;
pub mod rates;
pub mod render;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, SiteConfig};
pub use error_handling::PipelineError;
pub use pipeline::{Pipeline, PipelineReport, Trigger};
pub use render::render_dashboard;
