//! Data Model: Vendor, Soc, FlashingRequest, image request/artifact
use crate::flash::{FirmwareEdition, FlashType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Defaults applied by [`FlashingRequest::new`]
pub const DEFAULT_CAMERA_IP: &str = "192.168.1.10";
pub const DEFAULT_SERVER_IP: &str = "192.168.1.254";
pub const DEFAULT_NETWORK_INTERFACE: &str = "eth";
pub const DEFAULT_SD_CARD_SLOT: &str = "nosd";

/// Chip manufacturer grouping SoCs in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    /// Unique vendor name, also used as URL slug (ex: "Hisilicon")
    pub name: String,
}

impl Vendor {
    /// Create a vendor with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Lifecycle tag of a catalog SoC entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocStatus {
    Supported,
    Experimental,
    Deprecated,
    #[serde(other)]
    Unknown,
}

impl Default for SocStatus {
    fn default() -> Self {
        SocStatus::Supported
    }
}

impl fmt::Display for SocStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SocStatus::Supported => write!(f, "supported"),
            SocStatus::Experimental => write!(f, "experimental"),
            SocStatus::Deprecated => write!(f, "deprecated"),
            SocStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One processor model as recorded in the device catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Soc {
    /// Owning vendor name
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub family: String,
    /// External identifier, matched case-sensitively (ex: "HI3516EV200")
    pub model: String,
    #[serde(default)]
    pub version: String,
    /// Bootloader component file
    #[serde(default)]
    pub uboot_filename: String,
    /// Kernel component file
    #[serde(default)]
    pub kernel: String,
    /// Root filesystem component file
    #[serde(default)]
    pub linux_filename: String,
    #[serde(default)]
    pub sdk: String,
    #[serde(default)]
    pub load_address: String,
    #[serde(default)]
    pub status: SocStatus,
    #[serde(default)]
    pub featured: bool,
}

impl Soc {
    /// Create a SoC entry with no vendor, empty component names and `supported` status
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            vendor: None,
            family: String::new(),
            model: model.into(),
            version: String::new(),
            uboot_filename: String::new(),
            kernel: String::new(),
            linux_filename: String::new(),
            sdk: String::new(),
            load_address: String::new(),
            status: SocStatus::default(),
            featured: false,
        }
    }

    /// Set owning vendor
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Set family
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Set bootloader, kernel and rootfs file names
    pub fn with_components(
        mut self,
        uboot: impl Into<String>,
        kernel: impl Into<String>,
        rootfs: impl Into<String>,
    ) -> Self {
        self.uboot_filename = uboot.into();
        self.kernel = kernel.into();
        self.linux_filename = rootfs.into();
        self
    }

    /// Mark as featured
    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// "<vendor> <model>", or the bare model when no vendor is attached
    pub fn full_name(&self) -> String {
        match &self.vendor {
            Some(vendor) => format!("{} {}", vendor, self.model),
            None => self.model.clone(),
        }
    }
}

/// One flashing intent, resolved against exactly one SoC
///
/// Request-scoped; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashingRequest {
    pub camera_ip_address: String,
    pub server_ip_address: String,
    /// Lower-case, colon separated (see the normalizer); may be empty
    pub camera_mac_address: String,
    pub flash_type: FlashType,
    /// Token for the flashing routine, derived from `flash_type`
    pub flash_command: FlashType,
    pub firmware_version: FirmwareEdition,
    pub network_interface: String,
    pub sd_card_slot: String,
    pub soc: Arc<Soc>,
}

impl FlashingRequest {
    /// Request carrying every documented default.
    ///
    /// Both the form pre-fill and the update flow start from here.
    pub fn new(soc: Arc<Soc>) -> Self {
        let flash_type = FlashType::default();
        Self {
            camera_ip_address: DEFAULT_CAMERA_IP.to_string(),
            server_ip_address: DEFAULT_SERVER_IP.to_string(),
            camera_mac_address: String::new(),
            flash_command: flash_type.flash_command(),
            flash_type,
            firmware_version: FirmwareEdition::default(),
            network_interface: DEFAULT_NETWORK_INTERFACE.to_string(),
            sd_card_slot: DEFAULT_SD_CARD_SLOT.to_string(),
            soc,
        }
    }

    /// Set flash type, keeping `flash_command` in sync
    pub fn with_flash_type(mut self, flash_type: FlashType) -> Self {
        self.flash_command = flash_type.flash_command();
        self.flash_type = flash_type;
        self
    }

    /// Set firmware edition
    pub fn with_edition(mut self, edition: FirmwareEdition) -> Self {
        self.firmware_version = edition;
        self
    }
}

/// Tag naming which hardware exception applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quirk {
    None,
    SigmastarNandUnsupported,
    Hi3536Unsupported,
}

impl Quirk {
    /// True when the quirk stops resolution
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Quirk::None)
    }
}

impl fmt::Display for Quirk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Quirk::None => write!(f, "none"),
            Quirk::SigmastarNandUnsupported => write!(f, "sigmastar_nand_unsupported"),
            Quirk::Hi3536Unsupported => write!(f, "hi3536_unsupported"),
        }
    }
}

/// Direct download request handed to the image composer.
///
/// `flash_size`, `flash_type` and `fw_release` are forwarded as the user sent them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwareImageRequest {
    pub soc: Arc<Soc>,
    pub flash_size: String,
    pub flash_type: String,
    pub fw_release: String,
}

impl FirmwareImageRequest {
    /// Create a request from the raw download parameters
    pub fn new(
        soc: Arc<Soc>,
        flash_size: impl Into<String>,
        flash_type: impl Into<String>,
        fw_release: impl Into<String>,
    ) -> Self {
        Self {
            soc,
            flash_size: flash_size.into(),
            flash_type: flash_type.into(),
            fw_release: fw_release.into(),
        }
    }
}

/// A finished, flashable image produced by the composer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwareArtifact {
    /// Per-request file, removed by the caller once served
    pub path: PathBuf,
    /// Canonical image name offered to the user
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub digest: String,
    pub generated_at: DateTime<Utc>,
}

pub const ARTIFACT_CONTENT_TYPE: &str = "application/octet-stream";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let soc = Arc::new(Soc::new("HI3516EV200").with_vendor("Hisilicon"));
        let request = FlashingRequest::new(soc);

        assert_eq!(request.camera_ip_address, "192.168.1.10");
        assert_eq!(request.server_ip_address, "192.168.1.254");
        assert_eq!(request.camera_mac_address, "");
        assert_eq!(request.flash_type, FlashType::Nor8m);
        assert_eq!(request.flash_command, FlashType::Nor8m);
        assert_eq!(request.firmware_version, FirmwareEdition::Lite);
        assert_eq!(request.network_interface, "eth");
        assert_eq!(request.sd_card_slot, "nosd");
    }

    #[test]
    fn test_with_flash_type_keeps_command_in_sync() {
        let request = FlashingRequest::new(Arc::new(Soc::new("T31X")))
            .with_flash_type(FlashType::Nor32m);

        assert_eq!(request.flash_type, FlashType::Nor32m);
        assert_eq!(request.flash_command, FlashType::Nor16m);
    }

    #[test]
    fn test_full_name() {
        assert_eq!(
            Soc::new("GK7205V300").with_vendor("Goke").full_name(),
            "Goke GK7205V300"
        );
        assert_eq!(Soc::new("GK7205V300").full_name(), "GK7205V300");
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let soc: Soc = serde_json::from_str(r#"{"model":"X1","status":"in_progress"}"#).unwrap();
        assert_eq!(soc.status, SocStatus::Unknown);
        assert!(!soc.featured);
    }

    #[test]
    fn test_quirk_serialization() {
        let json = serde_json::to_string(&Quirk::SigmastarNandUnsupported).unwrap();
        assert_eq!(json, "\"sigmastar_nand_unsupported\"");
        assert!(Quirk::Hi3536Unsupported.is_terminal());
        assert!(!Quirk::None.is_terminal());
    }
}
