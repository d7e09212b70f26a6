//! Field normalization for flashing requests.
//!
//! - MAC address: lowercase, `-` separators become `:`
//! - Absent fields: documented defaults
//!
//! Nothing here rejects input. A malformed MAC stays malformed, only its
//! casing and separators change.

/// Normalize a camera MAC address
///
/// `None` yields an empty string.
pub fn normalize_mac(mac: Option<&str>) -> String {
    mac.unwrap_or_default().to_lowercase().replace('-', ":")
}

/// Take the supplied value, or the default when the field was absent.
///
/// Empty strings count as supplied.
pub fn or_default(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}
