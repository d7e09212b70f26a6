//! Shared application state
use crate::config::ApiConfig;
use crate::metrics::Metrics;
use flashgen_catalog::{DeviceCatalog, InMemoryCatalog};
use flashgen_composer::{ImageComposer, StoreComposer};
use flashgen_policy::Resolver;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn DeviceCatalog>,
    pub resolver: Arc<Resolver>,
    pub composer: Arc<dyn ImageComposer>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn DeviceCatalog>,
        composer: Arc<dyn ImageComposer>,
    ) -> Result<Self, prometheus::Error> {
        Ok(Self {
            catalog,
            resolver: Arc::new(Resolver::default()),
            composer,
            metrics: Arc::new(Metrics::new()?),
        })
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Load the catalog and set up the store composer
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let catalog = InMemoryCatalog::load(&config.catalog_path)?;
        let composer = StoreComposer::new(&config.store_dir, &config.output_dir);
        Ok(Self::new(Arc::new(catalog), Arc::new(composer))?)
    }
}
