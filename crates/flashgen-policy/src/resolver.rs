//! Compatibility resolver
//!
//! Classifies a normalized request against the guard chain and computes the
//! backup filename for usable configurations. Pure: no I/O, no shared state.
use crate::guard_chain::{GuardChain, GuardDecision};
use crate::rule::RuleContext;
use crate::verdict::{Resolution, ResolvedConfiguration};
use flashgen_catalog::DeviceCatalog;
use flashgen_core::{
    backup_filename, FirmwareImageRequest, FlashgenError, FlashingRequest, Quirk, Result, Vendor,
};
use flashgen_in::{normalize, RawFlashingFields};

#[derive(Debug, Clone)]
pub struct Resolver {
    chain: GuardChain,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(GuardChain::standard())
    }
}

impl Resolver {
    pub fn new(chain: GuardChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &GuardChain {
        &self.chain
    }

    /// Resolve a normalized request for the SoC's vendor
    pub fn resolve(&self, mut request: FlashingRequest, vendor: Option<&Vendor>) -> Resolution {
        let context = RuleContext::from_request(&request, vendor);

        let (warning, corrected_by) = match self.chain.evaluate(&context) {
            GuardDecision::Terminal(terminal) => {
                tracing::debug!(
                    soc = %request.soc.model,
                    flash_type = %request.flash_type,
                    quirk = %terminal.quirk,
                    rule = %terminal.rule_id,
                    "resolution stopped on terminal quirk"
                );
                return Resolution::Unsupported(terminal);
            }
            GuardDecision::Correct(rule) => {
                rule.apply(&mut request);
                tracing::debug!(
                    soc = %request.soc.model,
                    rule = %rule.id,
                    edition = %request.firmware_version,
                    "request corrected"
                );
                (Some(rule.warning.clone()), Some(rule.id.clone()))
            }
            GuardDecision::Pass => (None, None),
        };

        let backup_filename = backup_filename(&request.soc.model, request.flash_type.as_str());
        tracing::debug!(soc = %request.soc.model, backup = %backup_filename, "request resolved");

        Resolution::Configured(ResolvedConfiguration {
            request,
            quirk: Quirk::None,
            warning,
            backup_filename,
            corrected_by,
        })
    }

    /// Look up the SoC, normalize the raw fields and resolve.
    ///
    /// Fails with `NotFound` before any rule runs when the SoC is unknown.
    pub fn resolve_soc(
        &self,
        catalog: &dyn DeviceCatalog,
        soc_id: &str,
        raw: &RawFlashingFields,
    ) -> Result<Resolution> {
        let soc = catalog.require_soc(soc_id)?;
        let vendor = catalog.vendor_of(&soc);
        let request = normalize(raw, soc);
        Ok(self.resolve(request, vendor.as_deref()))
    }

    /// Re-check a direct download against the terminal rules.
    ///
    /// Downloads skip the interactive flow, so they never get corrected; a
    /// terminal quirk becomes `UnsupportedCombination`.
    pub fn check_image_request(
        &self,
        request: &FirmwareImageRequest,
        vendor: Option<&Vendor>,
    ) -> Result<()> {
        let context = RuleContext::from_image_request(request, vendor);
        match self.chain.first_terminal(&context) {
            Some(terminal) => {
                tracing::debug!(
                    soc = %request.soc.model,
                    quirk = %terminal.quirk,
                    "image request rejected"
                );
                Err(FlashgenError::UnsupportedCombination(terminal.quirk))
            }
            None => Ok(()),
        }
    }
}
