//! Public read contract of the catalog
//!
//! The JSON shape produced here is consumed by external tools; field names
//! must not change.
use flashgen_core::{Soc, SocStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogListing {
    pub vendors: Vec<VendorListing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorListing {
    pub name: String,
    pub socs: Vec<SocListing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocListing {
    pub family: String,
    pub model: String,
    pub version: String,
    pub uboot: String,
    pub kernel: String,
    pub rootfs: String,
    pub sdk: String,
    pub load_address: String,
    pub status: SocStatus,
}

impl From<&Soc> for SocListing {
    fn from(soc: &Soc) -> Self {
        Self {
            family: soc.family.clone(),
            model: soc.model.clone(),
            version: soc.version.clone(),
            uboot: soc.uboot_filename.clone(),
            kernel: soc.kernel.clone(),
            rootfs: soc.linux_filename.clone(),
            sdk: soc.sdk.clone(),
            load_address: soc.load_address.clone(),
            status: soc.status,
        }
    }
}
