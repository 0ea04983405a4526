//! Site settings persistence.

use crate::config::{SiteConfig, KEY_DAYS, KEY_SITENAME, KEY_VPSURL};
use crate::error_handling::StoreError;

use super::kv::{KvStore, Namespace};

/// Loads the site settings, applying defaults for missing values.
///
/// The three keys are read concurrently.
pub async fn load_site_config<S: KvStore + ?Sized>(store: &S) -> Result<SiteConfig, StoreError> {
    let (sitename, vpsurl, days) = tokio::try_join!(
        store.get(Namespace::Config, KEY_SITENAME),
        store.get(Namespace::Config, KEY_VPSURL),
        store.get(Namespace::Config, KEY_DAYS),
    )?;
    Ok(SiteConfig::from_raw(
        sitename.as_deref(),
        vpsurl.as_deref(),
        days.as_deref(),
    ))
}

/// Persists the site settings.
pub async fn save_site_config<S: KvStore + ?Sized>(
    store: &S,
    site: &SiteConfig,
) -> Result<(), StoreError> {
    let days = site.days.to_string();
    tokio::try_join!(
        store.put(Namespace::Config, KEY_SITENAME, site.sitename.trim()),
        store.put(Namespace::Config, KEY_VPSURL, site.vpsurl.trim()),
        store.put(Namespace::Config, KEY_DAYS, &days),
    )?;
    log::info!("Saved site settings ({})", site.sitename);
    Ok(())
}
