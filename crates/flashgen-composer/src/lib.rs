//! Flashgen Composer: full flash image assembly
//!
//! The composer turns a [`FirmwareImageRequest`] into a flashable file on
//! disk. The HTTP layer only depends on the [`ImageComposer`] trait, so the
//! store-backed implementation can be swapped for a remote build service.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use flashgen_composer::{ImageComposer, StoreComposer};
//! use flashgen_core::{FirmwareImageRequest, Soc};
//!
//! let soc = Arc::new(
//!     Soc::new("T31X")
//!         .with_vendor("Ingenic")
//!         .with_components("u-boot-t31x-universal.bin", "uImage.t31x", "rootfs.squashfs.t31x"),
//! );
//! let composer = StoreComposer::new("store", "/tmp/flashgen");
//! let artifact = composer
//!     .generate(&FirmwareImageRequest::new(soc, "8", "nor8m", "lite"))
//!     .unwrap();
//!
//! println!("{} ({} bytes, {})", artifact.filename, artifact.size, artifact.digest);
//! ```

pub mod layout;
pub mod store;

pub use layout::{nor_chip_size, parse_flash_size, FlashLayout, Partition, KIB, MIB};
pub use store::{Component, StoreComposer};

use flashgen_core::{FirmwareArtifact, FirmwareImageRequest, Result};

/// Produces a complete flash image for a direct download request
pub trait ImageComposer: Send + Sync {
    /// Build the image and return where it was written.
    ///
    /// The file at `artifact.path` belongs to the caller, which removes it
    /// once served. Fails with `MissingComponent` when a referenced binary is absent and
    /// `InvalidImageRequest` when the size, type or release cannot be satisfied.
    fn generate(&self, request: &FirmwareImageRequest) -> Result<FirmwareArtifact>;
}
