//! Flashgen-IN: raw request fields to FlashingRequest
//!
//! Accepts the loosely typed fields of the flashing form (or the short query
//! parameters of the pre-fill link) and produces a complete, canonical
//! [`FlashingRequest`]. Normalization is pure and never fails.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use flashgen_core::{FlashType, Soc};
//! use flashgen_in::{normalize, RawFlashingFields};
//!
//! let soc = Arc::new(Soc::new("T31X").with_vendor("Ingenic"));
//! let raw = RawFlashingFields {
//!     camera_mac_address: Some("00-1A-2B-3C-4D-5E".to_string()),
//!     flash_type: Some("nor32m".to_string()),
//!     ..Default::default()
//! };
//!
//! let request = normalize(&raw, soc);
//! assert_eq!(request.camera_mac_address, "00:1a:2b:3c:4d:5e");
//! assert_eq!(request.flash_type, FlashType::Nor32m);
//! assert_eq!(request.flash_command, FlashType::Nor16m);
//! assert_eq!(request.camera_ip_address, "192.168.1.10");
//! ```

pub mod normalizer;

use flashgen_core::{FirmwareEdition, FlashType, FlashingRequest, Soc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Raw, unvalidated flashing fields
///
/// Long names come from the form body, the short aliases from query links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFlashingFields {
    #[serde(default, alias = "cip")]
    pub camera_ip_address: Option<String>,
    #[serde(default, alias = "sip")]
    pub server_ip_address: Option<String>,
    #[serde(default, alias = "mac")]
    pub camera_mac_address: Option<String>,
    #[serde(default, alias = "rom")]
    pub flash_type: Option<String>,
    #[serde(default, alias = "ver")]
    pub firmware_version: Option<String>,
    #[serde(default, alias = "net")]
    pub network_interface: Option<String>,
    #[serde(default, alias = "sd")]
    pub sd_card_slot: Option<String>,
}

/// Build a FlashingRequest for `soc` from raw fields
///
/// Starts from [`FlashingRequest::new`] so every absent field carries its
/// documented default. `flash_command` is derived from the final flash type;
/// `flash_type` itself is stored as given.
pub fn normalize(raw: &RawFlashingFields, soc: Arc<Soc>) -> FlashingRequest {
    let mut request = FlashingRequest::new(soc);

    request.camera_ip_address =
        normalizer::or_default(raw.camera_ip_address.as_deref(), &request.camera_ip_address);
    request.server_ip_address =
        normalizer::or_default(raw.server_ip_address.as_deref(), &request.server_ip_address);
    request.camera_mac_address = normalizer::normalize_mac(raw.camera_mac_address.as_deref());

    if let Some(flash_type) = raw.flash_type.as_deref() {
        request = request.with_flash_type(FlashType::from(flash_type));
    }
    if let Some(edition) = raw.firmware_version.as_deref() {
        request = request.with_edition(FirmwareEdition::from(edition));
    }

    request.network_interface =
        normalizer::or_default(raw.network_interface.as_deref(), &request.network_interface);
    request.sd_card_slot = normalizer::or_default(raw.sd_card_slot.as_deref(), &request.sd_card_slot);

    request
}
