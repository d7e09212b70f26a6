//! Resolution outcomes
//!
//! Either a usable configuration (possibly corrected, with a warning) or a
//! terminal quirk that the caller shows as guidance instead of a configuration.

use flashgen_core::{FlashingRequest, Quirk};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration ready to be shown and flashed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    /// The request after corrections
    pub request: FlashingRequest,
    /// Always `none` for a configured outcome
    pub quirk: Quirk,
    /// User-facing warning when a correction was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub backup_filename: String,
    /// Correction rule that changed the request, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_by: Option<String>,
}

impl ResolvedConfiguration {
    pub fn was_corrected(&self) -> bool {
        self.corrected_by.is_some()
    }
}

/// An unsupported hardware/flash combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalQuirk {
    pub quirk: Quirk,
    /// The rule that fired
    pub rule_id: String,
    pub explanation: String,
}

/// The result of resolving one flashing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Configured(ResolvedConfiguration),
    Unsupported(TerminalQuirk),
}

impl Resolution {
    pub fn quirk(&self) -> Quirk {
        match self {
            Resolution::Configured(config) => config.quirk,
            Resolution::Unsupported(terminal) => terminal.quirk,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Resolution::Unsupported(_))
    }

    pub fn configuration(&self) -> Option<&ResolvedConfiguration> {
        match self {
            Resolution::Configured(config) => Some(config),
            Resolution::Unsupported(_) => None,
        }
    }

    pub fn terminal(&self) -> Option<&TerminalQuirk> {
        match self {
            Resolution::Configured(_) => None,
            Resolution::Unsupported(terminal) => Some(terminal),
        }
    }

    pub fn warning(&self) -> Option<&str> {
        self.configuration().and_then(|c| c.warning.as_deref())
    }

    /// Short label used for logs and metrics
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Resolution::Configured(config) if config.was_corrected() => "corrected",
            Resolution::Configured(_) => "configured",
            Resolution::Unsupported(_) => "unsupported",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resolution::Configured(config) => {
                write!(f, "CONFIGURED: {}", config.backup_filename)?;
                if let Some(warning) = &config.warning {
                    write!(f, " (warning: {})", warning)?;
                }
                Ok(())
            }
            Resolution::Unsupported(terminal) => {
                write!(f, "UNSUPPORTED: {} [{}]", terminal.quirk, terminal.rule_id)
            }
        }
    }
}
