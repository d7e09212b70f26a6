//! Prometheus counters served at `/metrics`
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    resolutions: IntCounterVec,
    downloads: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let resolutions = IntCounterVec::new(
            Opts::new("flashgen_resolutions_total", "Flashing resolutions by outcome"),
            &["outcome"],
        )?;
        let downloads = IntCounterVec::new(
            Opts::new("flashgen_downloads_total", "Full image downloads by result"),
            &["result"],
        )?;

        registry.register(Box::new(resolutions.clone()))?;
        registry.register(Box::new(downloads.clone()))?;

        Ok(Self {
            registry,
            resolutions,
            downloads,
        })
    }

    pub fn record_resolution(&self, outcome: &str) {
        self.resolutions.with_label_values(&[outcome]).inc();
    }

    pub fn record_download(&self, result: &str) {
        self.downloads.with_label_values(&[result]).inc();
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
