//! Scraper
//!
//! Holds the loaded vendors by name and prices them on request.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;
use wfm_core::{StatFetcher, Vendor};
use wfm_market::MarketClient;

use crate::batch::{BatchConfig, BatchRun, BatchScheduler};
use crate::config::ScraperConfig;
use crate::vendor_store::{BundledVendorStore, DirectoryVendorStore, VendorStore, VendorStoreError};

/// Vendor registry plus the scheduler used to price them
pub struct Scraper {
    vendors: BTreeMap<String, Vendor>,
    store: Arc<dyn VendorStore>,
    scheduler: BatchScheduler,
}

impl Scraper {
    pub fn new(store: Arc<dyn VendorStore>, scheduler: BatchScheduler) -> Self {
        Self {
            vendors: BTreeMap::new(),
            store,
            scheduler,
        }
    }

    /// Wire up the market client and vendor store described by `config`
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let client = MarketClient::with_config(config.api_base.clone(), config.http_timeout)
            .map_err(|e| ScraperError::HttpClient(e.to_string()))?;
        let fetcher: Arc<dyn StatFetcher> = Arc::new(client);

        let store: Arc<dyn VendorStore> = match &config.vendor_dir {
            Some(dir) => Arc::new(DirectoryVendorStore::new(dir)),
            None => Arc::new(BundledVendorStore),
        };

        let scheduler = BatchScheduler::new(
            fetcher,
            BatchConfig {
                rate_limit: config.rate_limit,
            },
        );

        Ok(Self::new(store, scheduler))
    }

    /// Replace the registry with the store's current vendors
    pub fn load_vendors(&mut self) -> Result<usize, ScraperError> {
        let vendors = self.store.load_all()?;
        self.vendors = vendors.into_iter().map(|v| (v.name.clone(), v)).collect();
        info!("Loaded {} vendors", self.vendors.len());
        Ok(self.vendors.len())
    }

    /// Vendors ordered by name
    pub fn vendors(&self) -> impl Iterator<Item = &Vendor> {
        self.vendors.values()
    }

    pub fn vendor(&self, name: &str) -> Option<&Vendor> {
        self.vendors.get(name)
    }

    /// Start pricing every item of the named vendor
    pub fn update_vendor_stats(&self, vendor_name: &str) -> Result<BatchRun, ScraperError> {
        let vendor = self
            .vendors
            .get(vendor_name)
            .ok_or_else(|| ScraperError::VendorNotFound(vendor_name.to_string()))?;

        Ok(self.scheduler.run(vendor))
    }
}

/// Errors that can occur in the scraper
#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Vendor {0} not found")]
    VendorNotFound(String),

    #[error("Vendor store error: {0}")]
    Store(#[from] VendorStoreError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use wfm_core::{FetchResult, Item, ItemKind, StatisticPoint};

    struct FixedStore;

    impl VendorStore for FixedStore {
        fn load_all(&self) -> Result<Vec<Vendor>, VendorStoreError> {
            Ok(vec![
                Vendor::new("Steel Meridian", vec![Item::new("scattered_justice", ItemKind::Mod, 25000)]),
                Vendor::new("New Loka", vec![Item::new("winds_of_purity", ItemKind::Mod, 25000)]),
            ])
        }
    }

    struct FlatMarket;

    #[async_trait]
    impl StatFetcher for FlatMarket {
        async fn fetch(&self, _item_name: &str) -> FetchResult<Vec<StatisticPoint>> {
            Ok(vec![StatisticPoint::new(4, 30.0), StatisticPoint::new(2, 60.0)])
        }
    }

    fn scraper() -> Scraper {
        let scheduler = BatchScheduler::new(
            Arc::new(FlatMarket),
            BatchConfig {
                rate_limit: Duration::from_millis(5),
            },
        );
        Scraper::new(Arc::new(FixedStore), scheduler)
    }

    #[tokio::test]
    async fn test_load_and_update_vendor() {
        let mut scraper = scraper();
        assert_eq!(scraper.load_vendors().unwrap(), 2);

        let names: Vec<&str> = scraper.vendors().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["New Loka", "Steel Meridian"]);

        let outcomes = scraper.update_vendor_stats("New Loka").unwrap().collect().await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_success());

        let item = &scraper.vendor("New Loka").unwrap().items[0];
        assert_eq!(item.market().weighted_avg_price, 40.0);
        assert_eq!(item.market().avg_volume, 3.0);
        // Other vendors are untouched
        assert!(scraper.vendor("Steel Meridian").unwrap().items[0].market().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_vendor() {
        let mut scraper = scraper();
        scraper.load_vendors().unwrap();

        let err = scraper.update_vendor_stats("Red Veil").unwrap_err();
        assert!(matches!(err, ScraperError::VendorNotFound(ref name) if name == "Red Veil"));
    }

    #[test]
    fn test_from_config_uses_bundled_catalogs() {
        let mut scraper = Scraper::from_config(&ScraperConfig::default()).unwrap();
        assert!(scraper.load_vendors().unwrap() > 0);
        assert!(scraper.vendor("Arbiters of Hexis").is_some());
    }
}
