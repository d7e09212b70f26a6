//! Flashgen Catalog: vendor and SoC records
//!
//! Read-only from the resolution pipeline's point of view. Records are handed
//! out as `Arc`s so a loaded catalog can serve concurrent readers without
//! locking; updates happen by loading a new catalog.
pub mod listing;
pub mod memory;

pub use listing::{CatalogListing, SocListing, VendorListing};
pub use memory::{CatalogFile, InMemoryCatalog, VendorEntry};

use flashgen_core::{FlashgenError, Result, Soc, Vendor};
use std::sync::Arc;

pub trait DeviceCatalog: Send + Sync {
    /// Vendor by exact name
    fn vendor(&self, name: &str) -> Option<Arc<Vendor>>;

    /// SoC by exact (case-sensitive) model
    fn soc(&self, model: &str) -> Option<Arc<Soc>>;

    /// All vendors ordered by name
    fn vendors(&self) -> Vec<Arc<Vendor>>;

    /// SoCs of one vendor ordered by model
    fn socs_for_vendor(&self, name: &str) -> Vec<Arc<Soc>>;

    /// Featured SoCs ordered by vendor name, then model
    fn featured(&self) -> Vec<Arc<Soc>>;

    /// Every SoC ordered by vendor name, then model
    fn full_list(&self) -> Vec<Arc<Soc>>;

    /// Vendors with their SoCs, in the public listing shape
    fn listing(&self) -> CatalogListing;

    fn vendor_of(&self, soc: &Soc) -> Option<Arc<Vendor>> {
        soc.vendor.as_deref().and_then(|name| self.vendor(name))
    }

    /// Like [`DeviceCatalog::soc`], failing with `NotFound`
    fn require_soc(&self, model: &str) -> Result<Arc<Soc>> {
        self.soc(model).ok_or_else(|| FlashgenError::soc_not_found(model))
    }

    /// Like [`DeviceCatalog::vendor`], failing with `NotFound`
    fn require_vendor(&self, name: &str) -> Result<Arc<Vendor>> {
        self.vendor(name).ok_or_else(|| FlashgenError::vendor_not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_soc_not_found() {
        let catalog = InMemoryCatalog::new();
        let err = catalog.require_soc("HI3516EV200").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_vendor_of() {
        let catalog = InMemoryCatalog::new()
            .with_vendor(Vendor::new("Goke"))
            .and_then(|c| c.with_soc(Soc::new("GK7205V300").with_vendor("Goke")))
            .unwrap();

        let soc = catalog.require_soc("GK7205V300").unwrap();
        assert_eq!(catalog.vendor_of(&soc).unwrap().name, "Goke");
    }

    #[test]
    fn test_catalog_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryCatalog>();
        assert_send_sync::<Arc<dyn DeviceCatalog>>();
    }
}
