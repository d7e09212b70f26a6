//! Ordered guard chain
//!
//! Terminal rules are checked top to bottom, then correction rules top to
//! bottom. The first rule that fires decides; nothing after it is evaluated.
use crate::rule::{correction_rules, terminal_rules, CorrectionRule, QuirkRule, RuleContext};
use crate::verdict::TerminalQuirk;

#[derive(Debug, Clone, Default)]
pub struct GuardChain {
    terminal: Vec<QuirkRule>,
    corrections: Vec<CorrectionRule>,
}

/// What the chain decided for one context
#[derive(Debug, Clone)]
pub enum GuardDecision<'a> {
    Terminal(TerminalQuirk),
    Correct(&'a CorrectionRule),
    Pass,
}

impl GuardChain {
    /// Empty chain: every request passes
    pub fn new() -> Self {
        Self::default()
    }

    /// The known hardware exceptions
    pub fn standard() -> Self {
        Self {
            terminal: terminal_rules(),
            corrections: correction_rules(),
        }
    }

    /// Append a terminal rule (lowest priority so far)
    pub fn with_terminal(mut self, rule: QuirkRule) -> Self {
        self.terminal.push(rule);
        self
    }

    /// Append a correction rule (lowest priority so far)
    pub fn with_correction(mut self, rule: CorrectionRule) -> Self {
        self.corrections.push(rule);
        self
    }

    pub fn terminal_rules(&self) -> &[QuirkRule] {
        &self.terminal
    }

    pub fn correction_rules(&self) -> &[CorrectionRule] {
        &self.corrections
    }

    /// First terminal rule that fires, if any
    pub fn first_terminal(&self, context: &RuleContext) -> Option<TerminalQuirk> {
        self.terminal.iter().find_map(|rule| rule.evaluate(context))
    }

    pub fn evaluate(&self, context: &RuleContext) -> GuardDecision<'_> {
        if let Some(terminal) = self.first_terminal(context) {
            return GuardDecision::Terminal(terminal);
        }

        match self.corrections.iter().find(|rule| rule.matches(context)) {
            Some(rule) => GuardDecision::Correct(rule),
            None => GuardDecision::Pass,
        }
    }
}
