//! End-to-end monitoring run.
//!
//! One run: load settings, fetch the feed, resolve geo data and the exchange
//! rate concurrently, merge, then pass every record through the reminder
//! gate. Only the feed and settings steps can fail a run; everything after
//! them degrades to defaults.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::config::{Config, SiteConfig};
use crate::enrich::{merge, EnrichedRecord};
use crate::error_handling::{PipelineError, ProcessingStats, WarningType};
use crate::feed::fetch_feed;
use crate::geo::{GeoProvider, GeoResolver};
use crate::notify::{count_duplicates, GateSummary, Messenger, NotificationGate, TelegramMessenger};
use crate::rates::{ExchangeRate, RateProvider, RateResolver};
use crate::storage::{load_site_config, KvStore};

/// What started a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// An HTTP request for the dashboard; the result is rendered
    Request,
    /// The periodic timer or the `check` command; the result is only logged
    Scheduled,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Request => f.write_str("request"),
            Trigger::Scheduled => f.write_str("scheduled"),
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub trigger: Trigger,
    pub generated_at: DateTime<Utc>,
    pub site: SiteConfig,
    pub records: Vec<EnrichedRecord>,
    pub rate: ExchangeRate,
    /// `None` when no Telegram credentials are configured
    pub notifications: Option<GateSummary>,
    pub errors: usize,
    pub warnings: usize,
}

/// The monitoring pipeline and its collaborators.
pub struct Pipeline<S: KvStore + ?Sized> {
    client: Arc<reqwest::Client>,
    store: Arc<S>,
    config: Config,
    messenger: Option<Arc<dyn Messenger>>,
    geo_providers: Vec<GeoProvider>,
    rate_providers: Vec<RateProvider>,
}

impl<S: KvStore + ?Sized> Pipeline<S> {
    /// Builds a pipeline with the default providers.
    ///
    /// A Telegram messenger is attached when both credentials are configured.
    pub fn new(client: Arc<reqwest::Client>, store: Arc<S>, config: Config) -> Self {
        let messenger: Option<Arc<dyn Messenger>> = match (
            config.notifications_enabled(),
            &config.telegram_token,
            &config.telegram_chat_id,
        ) {
            (true, Some(token), Some(chat_id)) => Some(Arc::new(TelegramMessenger::new(
                (*client).clone(),
                &config.telegram_api_base,
                token.trim(),
                chat_id.trim(),
                config.message_format,
            ))),
            _ => None,
        };
        Self {
            geo_providers: GeoProvider::defaults(),
            rate_providers: RateProvider::defaults(config.rate_api_key.as_deref()),
            client,
            store,
            config,
            messenger,
        }
    }

    pub fn with_messenger(mut self, messenger: Option<Arc<dyn Messenger>>) -> Self {
        self.messenger = messenger;
        self
    }

    pub fn with_geo_providers(mut self, providers: Vec<GeoProvider>) -> Self {
        self.geo_providers = providers;
        self
    }

    pub fn with_rate_providers(mut self, providers: Vec<RateProvider>) -> Self {
        self.rate_providers = providers;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the pipeline now.
    pub async fn run(&self, trigger: Trigger) -> Result<PipelineReport, PipelineError> {
        self.run_at(Utc::now(), trigger).await
    }

    /// Runs the pipeline as of `now`.
    ///
    /// `now` fixes the UTC day used for day counts and the ledger.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Store` if site settings cannot be read
    /// - `PipelineError::Config`, `Upstream` or `Format` from the feed fetch
    pub async fn run_at(
        &self,
        now: DateTime<Utc>,
        trigger: Trigger,
    ) -> Result<PipelineReport, PipelineError> {
        let stats = Arc::new(ProcessingStats::new());
        info!("Starting {} run", trigger);

        let site = load_site_config(self.store.as_ref()).await?;
        let feed = fetch_feed(&self.client, &site.vpsurl, self.config.feed_timeout()).await?;

        let ips: Vec<String> = feed.iter().map(|vps| vps.ip.clone()).collect();
        let geo = GeoResolver::new(
            Arc::clone(&self.client),
            self.geo_providers.clone(),
            self.config.geo_strategy,
            self.config.geo_timeout(),
            Arc::clone(&stats),
        );
        let rates = RateResolver::new(
            Arc::clone(&self.client),
            self.rate_providers.clone(),
            self.config.rate_timeout(),
            Arc::clone(&stats),
        );
        let (geo_map, rate) = tokio::join!(geo.resolve(&ips), rates.resolve(now));

        let records = merge(&feed, &geo_map, &rate, now.date_naive());
        for record in &records {
            if !record.parsed_price.is_parsed() {
                stats.increment_warning(WarningType::PriceUnparsed);
                warn!("Unparsable price {:?} for {}", record.vps.price, record.ip());
            }
            if record.days_remaining.is_none() {
                stats.increment_warning(WarningType::EndDateUnparsed);
                warn!("Unparsable expiry date {:?} for {}", record.vps.endday, record.ip());
            }
        }
        count_duplicates(&records, &stats);

        let notifications = match &self.messenger {
            Some(messenger) => {
                let gate = NotificationGate::new(
                    self.store.as_ref(),
                    messenger.as_ref(),
                    self.config.message_format,
                    site.days,
                    &stats,
                );
                Some(gate.process(&records, now).await)
            }
            None => {
                info!("TGTOKEN or TGID not set, skipping reminders");
                None
            }
        };

        stats.log_summary();
        info!(
            "Finished {} run: {} records, rate {} CNY/USD",
            trigger,
            records.len(),
            rate.rate_cny
        );

        Ok(PipelineReport {
            trigger,
            generated_at: now,
            site,
            records,
            rate,
            notifications,
            errors: stats.total_errors(),
            warnings: stats.total_warnings(),
        })
    }
}
