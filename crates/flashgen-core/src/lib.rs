//! Flashgen Core: device model, flashing request and unified errors
//!
//! Shared vocabulary of the resolution pipeline: catalog records (`Vendor`,
//! `Soc`), the request-scoped `FlashingRequest`, the image composer's
//! request/artifact pair, artifact naming and `FlashgenError`.

pub mod data_model;
pub mod error;
pub mod flash;
pub mod naming;

pub use data_model::{
    FirmwareArtifact, FirmwareImageRequest, FlashingRequest, Quirk, Soc, SocStatus, Vendor,
    ARTIFACT_CONTENT_TYPE,
};
pub use error::{FlashgenError, Result};
pub use flash::{FirmwareEdition, FlashType};
pub use naming::{backup_filename, image_filename};

/// Engine version reported by the API
pub const FLASHGEN_VERSION: &str = env!("CARGO_PKG_VERSION");
