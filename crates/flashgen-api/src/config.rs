//! Runtime configuration from the environment
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";
pub const DEFAULT_CATALOG: &str = "catalog/socs.yaml";
pub const DEFAULT_STORE: &str = "store";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub addr: String,
    pub catalog_path: PathBuf,
    pub store_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ApiConfig {
    /// Read FLASHGEN_ADDR, FLASHGEN_CATALOG, FLASHGEN_STORE and FLASHGEN_OUTPUT
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            addr: get("FLASHGEN_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            catalog_path: get("FLASHGEN_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG)),
            store_dir: get("FLASHGEN_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE)),
            output_dir: get("FLASHGEN_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("flashgen")),
        }
    }
}
