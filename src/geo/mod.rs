//! IP geolocation and ASN lookup.
//!
//! Every distinct IP is resolved concurrently against a list of free IP-info
//! providers. Resolution never fails: a field no provider could fill stays at
//! the `"Unknown"` sentinel.

mod providers;
mod types;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use futures::future::{join_all, BoxFuture, FutureExt};
use log::{debug, warn};

use crate::error_handling::{
    record_provider_error, ProcessingStats, ProviderError, ProviderKind, WarningType,
};
use crate::utils::settle::{first_ok, with_deadline};

pub use providers::{GeoProvider, GeoProviderKind};
pub use types::{GeoInfo, PartialGeo};

/// How provider answers are combined for one IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeoStrategy {
    /// Query every provider at once and keep the first usable answer.
    Race,
    /// Query providers in priority order, filling missing fields from later
    /// providers until all three are known.
    Merge,
}

/// Resolves IPs to [`GeoInfo`] records.
pub struct GeoResolver {
    client: Arc<reqwest::Client>,
    providers: Vec<GeoProvider>,
    strategy: GeoStrategy,
    timeout: Duration,
    stats: Arc<ProcessingStats>,
}

impl GeoResolver {
    pub fn new(
        client: Arc<reqwest::Client>,
        providers: Vec<GeoProvider>,
        strategy: GeoStrategy,
        timeout: Duration,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            client,
            providers,
            strategy,
            timeout,
            stats,
        }
    }

    /// Resolves every distinct IP in `ips`.
    ///
    /// Duplicates are looked up once. The returned map has an entry for every
    /// distinct input IP.
    pub async fn resolve(&self, ips: &[String]) -> HashMap<String, GeoInfo> {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = ips
            .iter()
            .map(String::as_str)
            .filter(|ip| seen.insert(*ip))
            .collect();
        debug!(
            "Resolving {} distinct IPs via {} providers ({:?})",
            unique.len(),
            self.providers.len(),
            self.strategy
        );

        let mut lookups: Vec<BoxFuture<'_, GeoInfo>> = Vec::with_capacity(unique.len());
        for ip in unique {
            lookups.push(self.resolve_one(ip).boxed());
        }
        join_all(lookups)
            .await
            .into_iter()
            .map(|info| (info.ip.clone(), info))
            .collect()
    }

    /// Resolves a single IP with the configured strategy.
    pub async fn resolve_one(&self, ip: &str) -> GeoInfo {
        let mut info = GeoInfo::unknown(ip);
        match self.strategy {
            GeoStrategy::Race => {
                if let Ok(partial) = self.race(ip).await {
                    info.fill_from(&partial);
                }
            }
            GeoStrategy::Merge => self.merge(ip, &mut info).await,
        }

        if info.is_unresolved() {
            self.stats.increment_warning(WarningType::GeoUnresolved);
            warn!("No IP-info provider resolved {}", ip);
        }
        info
    }

    async fn race(&self, ip: &str) -> Result<PartialGeo, Vec<ProviderError>> {
        let mut calls = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            calls.push(self.race_call(provider.clone(), ip.to_string()));
        }
        // Each call carries its own deadline; the outer one catches a future
        // that never yields.
        first_ok(calls, self.timeout + Duration::from_millis(50)).await
    }

    /// One provider query for the race, owning everything it touches.
    fn race_call(
        &self,
        provider: GeoProvider,
        ip: String,
    ) -> BoxFuture<'static, Result<PartialGeo, ProviderError>> {
        let client = Arc::clone(&self.client);
        let stats = Arc::clone(&self.stats);
        let timeout = self.timeout;
        async move {
            with_deadline(provider.query(&client, &ip), timeout)
                .await
                .inspect_err(|e| record_provider_error(&stats, ProviderKind::Geo, &provider.name, e))
        }
        .boxed()
    }

    async fn merge(&self, ip: &str, info: &mut GeoInfo) {
        for provider in &self.providers {
            match with_deadline(provider.query(&self.client, ip), self.timeout).await {
                Ok(partial) => info.fill_from(&partial),
                Err(e) => record_provider_error(&self.stats, ProviderKind::Geo, &provider.name, &e),
            }
            if info.is_complete() {
                break;
            }
        }
    }
}
