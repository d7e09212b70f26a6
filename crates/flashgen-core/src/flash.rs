//! Flash memory classes and firmware editions
//!
//! Both are open enumerations: the known tags get their own variant, anything
//! else a user sends is carried verbatim in `Other` so that a request is never
//! rejected just because it names a flash type or edition we have no rule for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical flash memory class/size of the target device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FlashType {
    /// 8MB SPI NOR
    Nor8m,
    /// 16MB SPI NOR
    Nor16m,
    /// 32MB SPI NOR
    Nor32m,
    /// SPI NAND
    Nand,
    /// Any other tag, kept as given
    Other(String),
}

impl FlashType {
    /// Lowercase tag (ex: "nor16m"), or the tag as given for `Other`
    pub fn as_str(&self) -> &str {
        match self {
            FlashType::Nor8m => "nor8m",
            FlashType::Nor16m => "nor16m",
            FlashType::Nor32m => "nor32m",
            FlashType::Nand => "nand",
            FlashType::Other(tag) => tag,
        }
    }

    /// Flash type token handed to the device's flashing routine.
    ///
    /// The firmware flashes 32MB NOR with the 16MB routine.
    pub fn flash_command(&self) -> FlashType {
        match self {
            FlashType::Nor32m => FlashType::Nor16m,
            other => other.clone(),
        }
    }

    /// True for the three SPI NOR sizes
    pub fn is_nor(&self) -> bool {
        matches!(self, FlashType::Nor8m | FlashType::Nor16m | FlashType::Nor32m)
    }
}

impl Default for FlashType {
    fn default() -> Self {
        FlashType::Nor8m
    }
}

impl From<&str> for FlashType {
    fn from(tag: &str) -> Self {
        match tag {
            "nor8m" => FlashType::Nor8m,
            "nor16m" => FlashType::Nor16m,
            "nor32m" => FlashType::Nor32m,
            "nand" => FlashType::Nand,
            other => FlashType::Other(other.to_string()),
        }
    }
}

impl From<String> for FlashType {
    fn from(tag: String) -> Self {
        FlashType::from(tag.as_str())
    }
}

impl From<FlashType> for String {
    fn from(flash_type: FlashType) -> Self {
        match flash_type {
            FlashType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for FlashType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FlashType::from(s))
    }
}

impl fmt::Display for FlashType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Firmware build variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FirmwareEdition {
    /// Minimal build, fits 8MB NOR
    Lite,
    /// Full build, needs 16MB NOR or larger
    Ultimate,
    /// Low latency video build
    Fpv,
    /// Any other tag, kept as given
    Other(String),
}

impl FirmwareEdition {
    /// Lowercase tag (ex: "ultimate"), or the tag as given for `Other`
    pub fn as_str(&self) -> &str {
        match self {
            FirmwareEdition::Lite => "lite",
            FirmwareEdition::Ultimate => "ultimate",
            FirmwareEdition::Fpv => "fpv",
            FirmwareEdition::Other(tag) => tag,
        }
    }
}

impl Default for FirmwareEdition {
    fn default() -> Self {
        FirmwareEdition::Lite
    }
}

impl From<&str> for FirmwareEdition {
    fn from(tag: &str) -> Self {
        match tag {
            "lite" => FirmwareEdition::Lite,
            "ultimate" => FirmwareEdition::Ultimate,
            "fpv" => FirmwareEdition::Fpv,
            other => FirmwareEdition::Other(other.to_string()),
        }
    }
}

impl From<String> for FirmwareEdition {
    fn from(tag: String) -> Self {
        FirmwareEdition::from(tag.as_str())
    }
}

impl From<FirmwareEdition> for String {
    fn from(edition: FirmwareEdition) -> Self {
        match edition {
            FirmwareEdition::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for FirmwareEdition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FirmwareEdition::from(s))
    }
}

impl fmt::Display for FirmwareEdition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_flash_types() {
        assert_eq!(FlashType::from("nor8m"), FlashType::Nor8m);
        assert_eq!(FlashType::from("nand"), FlashType::Nand);
        assert_eq!(FlashType::Nor32m.to_string(), "nor32m");
    }

    #[test]
    fn test_unknown_flash_type_kept_verbatim() {
        let flash_type = FlashType::from("emmc");
        assert_eq!(flash_type, FlashType::Other("emmc".to_string()));
        assert_eq!(flash_type.as_str(), "emmc");
        assert!(!flash_type.is_nor());
    }

    #[test]
    fn test_flash_command() {
        assert_eq!(FlashType::Nor32m.flash_command(), FlashType::Nor16m);
        assert_eq!(FlashType::Nor16m.flash_command(), FlashType::Nor16m);
        assert_eq!(FlashType::Nand.flash_command(), FlashType::Nand);
    }

    #[test]
    fn test_edition_serde_as_plain_string() {
        let json = serde_json::to_string(&FirmwareEdition::Ultimate).unwrap();
        assert_eq!(json, "\"ultimate\"");

        let parsed: FirmwareEdition = serde_json::from_str("\"venc\"").unwrap();
        assert_eq!(parsed, FirmwareEdition::Other("venc".to_string()));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(FlashType::default(), FlashType::Nor8m);
        assert_eq!(FirmwareEdition::default(), FirmwareEdition::Lite);
    }
}
