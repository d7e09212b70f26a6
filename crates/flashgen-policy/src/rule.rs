//! Hardware quirk rules
//!
//! A rule fires when every one of its conditions holds. Terminal rules end
//! resolution with an "unsupported" outcome; correction rules adjust the
//! request and attach a warning.

use crate::verdict::TerminalQuirk;
use flashgen_core::{FirmwareEdition, FirmwareImageRequest, FlashType, FlashingRequest, Quirk, Vendor};
use serde::{Deserialize, Serialize};

/// Warning attached when an 8MB NOR request asks for the ultimate edition
pub const DOWNGRADE_WARNING: &str = "8MB Flash ROM can only be flashed with Lite or FPV edition!";

/// A rule that ends resolution with a terminal quirk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuirkRule {
    /// Unique identifier for the rule
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Explanation shown instead of the configuration
    pub description: String,

    /// Tag reported when the rule fires
    pub quirk: Quirk,

    /// All must hold for the rule to fire
    pub conditions: Vec<RuleCondition>,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl QuirkRule {
    /// Create a new enabled rule with no conditions
    pub fn new(id: impl Into<String>, name: impl Into<String>, quirk: Quirk) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            quirk,
            conditions: Vec::new(),
            enabled: true,
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Add a condition
    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Disable the rule
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Evaluate the rule against a context
    pub fn evaluate(&self, context: &RuleContext) -> Option<TerminalQuirk> {
        if !self.enabled || !all_hold(&self.conditions, context) {
            return None;
        }

        Some(TerminalQuirk {
            quirk: self.quirk,
            rule_id: self.id.clone(),
            explanation: self.description.clone(),
        })
    }
}

/// A rule that rewrites part of the request and warns about it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionRule {
    /// Unique identifier for the rule
    pub id: String,
    pub name: String,
    /// All must hold for the rule to fire
    pub conditions: Vec<RuleCondition>,
    pub correction: Correction,
    /// User-facing warning attached to the resolved configuration
    pub warning: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl CorrectionRule {
    /// Create a new enabled rule with no conditions and no warning
    pub fn new(id: impl Into<String>, name: impl Into<String>, correction: Correction) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            conditions: Vec::new(),
            correction,
            warning: String::new(),
            enabled: true,
        }
    }

    /// Add a condition
    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Set the warning shown when the rule fires
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = warning.into();
        self
    }

    /// Disable the rule
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Check whether the rule fires for a context
    pub fn matches(&self, context: &RuleContext) -> bool {
        self.enabled && all_hold(&self.conditions, context)
    }

    /// Apply the correction to the request in place
    pub fn apply(&self, request: &mut FlashingRequest) {
        match &self.correction {
            Correction::SetEdition { edition } => request.firmware_version = edition.clone(),
        }
    }
}

/// What a correction rule changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Correction {
    /// Replace the requested firmware edition
    SetEdition { edition: FirmwareEdition },
}

/// A condition on the request being resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Owning vendor has exactly this name
    VendorIs { name: String },
    /// Requested flash type
    FlashTypeIs { flash_type: FlashType },
    /// SoC model is one of these (exact match)
    SocModelIn { models: Vec<String> },
    /// Requested firmware edition
    EditionIs { edition: FirmwareEdition },
    /// Custom predicate; not serializable
    #[serde(skip)]
    Custom { predicate: fn(&RuleContext) -> bool },
}

impl RuleCondition {
    /// Check the condition against a context
    pub fn holds(&self, context: &RuleContext) -> bool {
        match self {
            RuleCondition::VendorIs { name } => context.vendor.as_deref() == Some(name.as_str()),
            RuleCondition::FlashTypeIs { flash_type } => &context.flash_type == flash_type,
            RuleCondition::SocModelIn { models } => models.iter().any(|m| *m == context.soc_model),
            RuleCondition::EditionIs { edition } => &context.edition == edition,
            RuleCondition::Custom { predicate } => predicate(context),
        }
    }
}

// A rule with no conditions never fires.
fn all_hold(conditions: &[RuleCondition], context: &RuleContext) -> bool {
    !conditions.is_empty() && conditions.iter().all(|c| c.holds(context))
}

/// Context for rule evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleContext {
    /// Owning vendor, when the SoC has one
    pub vendor: Option<String>,
    pub soc_model: String,
    pub flash_type: FlashType,
    pub edition: FirmwareEdition,
}

impl RuleContext {
    /// Context for a SoC with default flash type and edition
    pub fn new(soc_model: impl Into<String>) -> Self {
        Self {
            soc_model: soc_model.into(),
            ..Default::default()
        }
    }

    /// Context for a normalized flashing request
    pub fn from_request(request: &FlashingRequest, vendor: Option<&Vendor>) -> Self {
        Self {
            vendor: vendor.map(|v| v.name.clone()),
            soc_model: request.soc.model.clone(),
            flash_type: request.flash_type.clone(),
            edition: request.firmware_version.clone(),
        }
    }

    /// Context for a direct image download; the release name stands in for the edition
    pub fn from_image_request(request: &FirmwareImageRequest, vendor: Option<&Vendor>) -> Self {
        Self {
            vendor: vendor.map(|v| v.name.clone()),
            soc_model: request.soc.model.clone(),
            flash_type: FlashType::from(request.flash_type.as_str()),
            edition: FirmwareEdition::from(request.fw_release.as_str()),
        }
    }

    /// Set vendor
    pub fn vendor(mut self, name: impl Into<String>) -> Self {
        self.vendor = Some(name.into());
        self
    }

    /// Set flash type
    pub fn flash_type(mut self, flash_type: FlashType) -> Self {
        self.flash_type = flash_type;
        self
    }

    /// Set edition
    pub fn edition(mut self, edition: FirmwareEdition) -> Self {
        self.edition = edition;
        self
    }
}

/// Terminal rules, highest priority first
pub fn terminal_rules() -> Vec<QuirkRule> {
    vec![
        QuirkRule::new("sigmastar_nand", "SigmaStar NAND", Quirk::SigmastarNandUnsupported)
            .with_description("SigmaStar SoCs cannot be flashed with a NAND firmware image")
            .with_condition(RuleCondition::VendorIs { name: "SigmaStar".to_string() })
            .with_condition(RuleCondition::FlashTypeIs { flash_type: FlashType::Nand }),

        QuirkRule::new("hi3536", "HI3536 Family", Quirk::Hi3536Unsupported)
            .with_description("HI3536CV100 and HI3536DV100 are not supported by the full image installer")
            .with_condition(RuleCondition::SocModelIn {
                models: vec!["HI3536CV100".to_string(), "HI3536DV100".to_string()],
            }),
    ]
}

/// Correctable rules, evaluated after every terminal rule
pub fn correction_rules() -> Vec<CorrectionRule> {
    vec![
        CorrectionRule::new(
            "nor8m_ultimate_downgrade",
            "8MB NOR Edition Downgrade",
            Correction::SetEdition { edition: FirmwareEdition::Lite },
        )
        .with_condition(RuleCondition::FlashTypeIs { flash_type: FlashType::Nor8m })
        .with_condition(RuleCondition::EditionIs { edition: FirmwareEdition::Ultimate })
        .with_warning(DOWNGRADE_WARNING),
    ]
}
