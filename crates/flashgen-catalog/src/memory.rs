//! YAML-backed in-memory catalog
//!
//! The catalog file groups SoCs under their vendor:
//!
//! ```yaml
//! vendors:
//!   - name: Hisilicon
//!     socs:
//!       - model: HI3516EV200
//!         family: hi3516ev200
//!         uboot_filename: u-boot-hi3516ev200-universal.bin
//! socs: []   # SoCs without a vendor
//! ```
use crate::listing::{CatalogListing, SocListing, VendorListing};
use crate::DeviceCatalog;
use flashgen_core::{FlashgenError, Result, Soc, Vendor};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Top-level catalog file structure
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub vendors: Vec<VendorEntry>,
    /// SoCs with no owning vendor
    #[serde(default)]
    pub socs: Vec<Soc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorEntry {
    pub name: String,
    #[serde(default)]
    pub socs: Vec<Soc>,
}

/// Immutable catalog; safe to share between any number of readers
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    vendors: BTreeMap<String, Arc<Vendor>>,
    socs: HashMap<String, Arc<Soc>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FlashgenError::Catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            vendors = catalog.vendors.len(),
            socs = catalog.socs.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from YAML content
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)
            .map_err(|e| FlashgenError::Catalog(format!("failed to parse catalog YAML: {}", e)))?;
        Self::from_file(file)
    }

    pub fn from_file(file: CatalogFile) -> Result<Self> {
        let mut catalog = Self::new();

        for entry in file.vendors {
            catalog.add_vendor(Vendor::new(entry.name.clone()))?;
            for soc in entry.socs {
                catalog.add_soc(Soc {
                    vendor: Some(entry.name.clone()),
                    ..soc
                })?;
            }
        }
        for soc in file.socs {
            catalog.add_soc(soc)?;
        }

        Ok(catalog)
    }

    pub fn add_vendor(&mut self, vendor: Vendor) -> Result<()> {
        if self.vendors.contains_key(&vendor.name) {
            return Err(FlashgenError::Catalog(format!(
                "duplicate vendor '{}'",
                vendor.name
            )));
        }
        self.vendors.insert(vendor.name.clone(), Arc::new(vendor));
        Ok(())
    }

    /// Add a SoC; its vendor, if any, must already be present
    pub fn add_soc(&mut self, soc: Soc) -> Result<()> {
        if let Some(vendor) = &soc.vendor {
            if !self.vendors.contains_key(vendor) {
                return Err(FlashgenError::Catalog(format!(
                    "soc '{}' references unknown vendor '{}'",
                    soc.model, vendor
                )));
            }
        }
        if self.socs.contains_key(&soc.model) {
            return Err(FlashgenError::Catalog(format!("duplicate soc '{}'", soc.model)));
        }
        self.socs.insert(soc.model.clone(), Arc::new(soc));
        Ok(())
    }

    pub fn with_vendor(mut self, vendor: Vendor) -> Result<Self> {
        self.add_vendor(vendor)?;
        Ok(self)
    }

    pub fn with_soc(mut self, soc: Soc) -> Result<Self> {
        self.add_soc(soc)?;
        Ok(self)
    }

    // Vendor name, then model; vendorless SoCs last.
    fn sorted(&self, mut socs: Vec<Arc<Soc>>) -> Vec<Arc<Soc>> {
        socs.sort_by(|a, b| {
            let vendor_order = match (&a.vendor, &b.vendor) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            vendor_order.then_with(|| a.model.cmp(&b.model))
        });
        socs
    }
}

impl DeviceCatalog for InMemoryCatalog {
    fn vendor(&self, name: &str) -> Option<Arc<Vendor>> {
        self.vendors.get(name).cloned()
    }

    fn soc(&self, model: &str) -> Option<Arc<Soc>> {
        self.socs.get(model).cloned()
    }

    fn vendors(&self) -> Vec<Arc<Vendor>> {
        self.vendors.values().cloned().collect()
    }

    fn socs_for_vendor(&self, name: &str) -> Vec<Arc<Soc>> {
        let socs = self
            .socs
            .values()
            .filter(|soc| soc.vendor.as_deref() == Some(name))
            .cloned()
            .collect();
        self.sorted(socs)
    }

    fn featured(&self) -> Vec<Arc<Soc>> {
        let socs = self.socs.values().filter(|soc| soc.featured).cloned().collect();
        self.sorted(socs)
    }

    fn full_list(&self) -> Vec<Arc<Soc>> {
        self.sorted(self.socs.values().cloned().collect())
    }

    fn listing(&self) -> CatalogListing {
        CatalogListing {
            vendors: self
                .vendors
                .keys()
                .map(|name| VendorListing {
                    name: name.clone(),
                    socs: self
                        .socs_for_vendor(name)
                        .iter()
                        .map(|soc| SocListing::from(soc.as_ref()))
                        .collect(),
                })
                .collect(),
        }
    }
}
