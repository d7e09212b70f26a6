//! Flashgen Policy: hardware quirks and the compatibility resolver
//!
//! Decides whether a requested flash configuration is legal for a SoC and
//! applies the documented hardware exceptions.
//!
//! # Architecture
//!
//! ```text
//! RawFlashingFields → normalize → RuleContext → terminal rules → correction rules → Resolution
//!                                                    ↓                 ↓                  ↓
//!                                              TerminalQuirk     edition + warning    backup name
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use flashgen_core::{FirmwareEdition, FlashType, FlashingRequest, Quirk, Soc, Vendor};
//! use flashgen_policy::Resolver;
//!
//! let soc = Arc::new(Soc::new("HI3516EV200").with_vendor("Hisilicon"));
//! let request = FlashingRequest::new(soc)
//!     .with_flash_type(FlashType::Nor8m)
//!     .with_edition(FirmwareEdition::Ultimate);
//!
//! let resolution = Resolver::default().resolve(request, Some(&Vendor::new("Hisilicon")));
//! let config = resolution.configuration().unwrap();
//!
//! assert_eq!(config.quirk, Quirk::None);
//! assert_eq!(config.request.firmware_version, FirmwareEdition::Lite);
//! assert_eq!(config.backup_filename, "backup-hi3516ev200-nor8m.bin");
//! assert!(config.warning.is_some());
//! ```

pub mod guard_chain;
pub mod resolver;
pub mod rule;
pub mod verdict;

pub use guard_chain::{GuardChain, GuardDecision};
pub use resolver::Resolver;
pub use rule::{
    correction_rules, terminal_rules, Correction, CorrectionRule, QuirkRule, RuleCondition,
    RuleContext, DOWNGRADE_WARNING,
};
pub use verdict::{Resolution, ResolvedConfiguration, TerminalQuirk};
