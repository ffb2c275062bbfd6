//! Single-field validation.
//!
//! The validator decides; a `FieldSurface` renders. The WASM frontend
//! implements the surface on real inputs (error node, `is-invalid`,
//! `aria-invalid`), tests implement it in memory.

use std::borrow::Cow;

use crate::address::AddressLayout;
use crate::rules::{FieldRule, RuleTable};

/// A form control as seen by the validator.
pub trait FieldSurface {
    fn name(&self) -> String;
    fn id(&self) -> String;
    /// Current value; unchecked checkboxes and radio groups report "".
    fn value(&self) -> String;
    fn show_error(&self, message: &str);
    fn clear_error(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(String),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Apply one rule to one value.
///
/// Whitespace-only counts as empty; the pattern sees the value as submitted.
pub fn check(rule: &FieldRule, value: &str) -> Verdict {
    if value.trim().is_empty() {
        return if rule.required {
            Verdict::Invalid(rule.message.clone())
        } else {
            Verdict::Valid
        };
    }
    match &rule.pattern {
        Some(pattern) if !pattern.is_match(value) => {
            Verdict::Invalid(rule.mismatch_message().to_owned())
        }
        _ => Verdict::Valid,
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    rules: RuleTable,
    layout: Option<AddressLayout>,
}

impl Validator {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules, layout: None }
    }

    /// Address fields follow the active country layout from now on.
    pub fn set_layout(&mut self, layout: AddressLayout) {
        self.layout = Some(layout);
    }

    /// The rule that currently governs a field, if any.
    ///
    /// Address inputs take required-ness and postal patterns from the active
    /// layout; hidden address inputs are never validated.
    pub fn effective_rule(&self, name: &str, id: &str) -> Option<Cow<'_, FieldRule>> {
        let base = self.rules.lookup(name, id);
        let address_id = [id, name]
            .into_iter()
            .find(|key| AddressLayout::is_address_field(key));

        let (Some(address_id), Some(layout)) = (address_id, self.layout.as_ref()) else {
            return base.map(Cow::Borrowed);
        };
        if layout.is_hidden(address_id) {
            return None;
        }
        let spec = layout.spec(address_id)?;

        let mut rule = match base {
            Some(rule) => rule.clone(),
            None => FieldRule::required(address_id, &format!("{} is required.", spec.label)),
        };
        rule.required = spec.required;
        if let Some(pattern) = layout.pattern(address_id) {
            rule.pattern = Some(pattern.clone());
            rule.pattern_message = spec.error.map(str::to_owned);
        }
        Some(Cow::Owned(rule))
    }

    pub fn verdict(&self, field: &impl FieldSurface) -> Verdict {
        match self.effective_rule(&field.name(), &field.id()) {
            Some(rule) => check(&rule, &field.value()),
            None => Verdict::Valid,
        }
    }

    /// Validate and render. Returns whether the field is valid.
    pub fn validate_field(&self, field: &impl FieldSurface) -> bool {
        match self.verdict(field) {
            Verdict::Valid => {
                field.clear_error();
                true
            }
            Verdict::Invalid(message) => {
                field.show_error(&message);
                false
            }
        }
    }
}
