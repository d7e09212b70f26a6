//! NOR flash partition layouts
//!
//! ```text
//! 0x000000  boot         256 KiB
//! 0x040000  env           64 KiB
//! 0x050000  kernel      2048 KiB (3072 KiB ultimate)
//!           rootfs      5120 KiB (10240 KiB ultimate)
//!           rootfs_data  rest of the chip
//! ```
use flashgen_core::{FirmwareEdition, FlashType, FlashgenError, Result};
use serde::Serialize;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;

const BOOT_SIZE: u64 = 256 * KIB;
const ENV_SIZE: u64 = 64 * KIB;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub name: &'static str,
    pub offset: u64,
    pub size: u64,
}

impl Partition {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashLayout {
    pub flash_size: u64,
    pub partitions: Vec<Partition>,
}

impl FlashLayout {
    /// Layout for a NOR chip of `flash_size` bytes holding `edition`
    pub fn nor(flash_size: u64, edition: &FirmwareEdition) -> Result<Self> {
        let (kernel_size, rootfs_size) = match edition {
            FirmwareEdition::Ultimate => (3072 * KIB, 10240 * KIB),
            _ => (2048 * KIB, 5120 * KIB),
        };

        let mut partitions = Vec::with_capacity(5);
        let mut offset = 0;
        for (name, size) in [
            ("boot", BOOT_SIZE),
            ("env", ENV_SIZE),
            ("kernel", kernel_size),
            ("rootfs", rootfs_size),
        ] {
            partitions.push(Partition { name, offset, size });
            offset += size;
        }

        if offset > flash_size {
            return Err(FlashgenError::InvalidImageRequest(format!(
                "{} layout needs {} KiB, flash has {} KiB",
                edition,
                offset / KIB,
                flash_size / KIB
            )));
        }

        partitions.push(Partition {
            name: "rootfs_data",
            offset,
            size: flash_size - offset,
        });

        Ok(Self { flash_size, partitions })
    }

    pub fn partition(&self, name: &str) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.name == name)
    }

    /// `mtdparts` style description (ex: "256k(boot),64k(env),...,-(rootfs_data)")
    pub fn mtdparts(&self) -> String {
        self.partitions
            .iter()
            .map(|p| {
                if p.name == "rootfs_data" {
                    format!("-({})", p.name)
                } else {
                    format!("{}k({})", p.size / KIB, p.name)
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse a user supplied flash size ("8", "16M", "32mb", "8MiB") into bytes
pub fn parse_flash_size(input: &str) -> Result<u64> {
    let lowered = input.trim().to_lowercase();
    let digits = ["mib", "mb", "m"]
        .iter()
        .find_map(|suffix| lowered.strip_suffix(suffix))
        .unwrap_or(&lowered)
        .trim();

    match digits.parse::<u64>() {
        Ok(megabytes) if megabytes > 0 && megabytes <= 1024 => Ok(megabytes * MIB),
        _ => Err(FlashgenError::InvalidImageRequest(format!(
            "unrecognized flash size '{}'",
            input
        ))),
    }
}

/// Chip size implied by a NOR flash type
pub fn nor_chip_size(flash_type: &FlashType) -> Option<u64> {
    match flash_type {
        FlashType::Nor8m => Some(8 * MIB),
        FlashType::Nor16m => Some(16 * MIB),
        FlashType::Nor32m => Some(32 * MIB),
        _ => None,
    }
}
