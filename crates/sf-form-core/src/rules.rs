//! Static validation rules keyed by field name (or id).

use regex::Regex;
use std::collections::HashMap;

use crate::error::FormResult;

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub id: String,
    pub required: bool,
    pub pattern: Option<Regex>,
    pub message: String,
    /// Message used when the pattern fails; falls back to `message`.
    pub pattern_message: Option<String>,
}

impl FieldRule {
    pub fn required(id: &str, message: &str) -> Self {
        Self {
            id: id.to_owned(),
            required: true,
            pattern: None,
            message: message.to_owned(),
            pattern_message: None,
        }
    }

    pub fn with_pattern(mut self, pattern: &str) -> FormResult<Self> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn mismatch_message(&self) -> &str {
        self.pattern_message.as_deref().unwrap_or(&self.message)
    }
}

pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
pub const PHONE_PATTERN: &str = r"^\+?[\d\s()-]{7,20}$";

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, FieldRule>,
}

impl RuleTable {
    /// The rule set used by the subscription page.
    pub fn standard() -> FormResult<Self> {
        let mut table = Self::default();
        table.insert(FieldRule::required("referral-code", "Referral code is required."));
        table.insert(FieldRule::required("full-name", "Please enter your full name."));
        table.insert(
            FieldRule::required("email", "Please enter a valid email address.")
                .with_pattern(EMAIL_PATTERN)?,
        );
        table.insert(
            FieldRule::required("phone", "Please enter a valid phone number.")
                .with_pattern(PHONE_PATTERN)?,
        );
        table.insert(FieldRule::required("address-line1", "Street address is required."));
        table.insert(FieldRule::required("city", "City is required."));
        table.insert(FieldRule::required("state", "State/Region is required."));
        table.insert(FieldRule::required("postal-code", "Postal code is required."));
        table.insert(FieldRule::required("country-select", "Please select your country."));
        table.insert(FieldRule::required("dob", "Date of birth is required."));
        table.insert(FieldRule::required("gender", "Please select your gender."));
        table.insert(FieldRule::required("branch", "Please select a branch."));
        table.insert(FieldRule::required("group", "Please select a group."));
        table.insert(FieldRule::required("artist", "Please select an artist."));
        table.insert(FieldRule::required("payment-type", "Please select a payment type."));
        table.insert(FieldRule::required("contact-method", "Please select a contact method."));
        table.insert(FieldRule::required(
            "subscription-agreement",
            "You must agree to complete your subscription.",
        ));
        Ok(table)
    }

    pub fn insert(&mut self, rule: FieldRule) {
        self.rules.insert(rule.id.clone(), rule);
    }

    /// Fields are looked up by `name` first, then by `id`.
    pub fn lookup(&self, name: &str, id: &str) -> Option<&FieldRule> {
        if !name.is_empty() {
            if let Some(rule) = self.rules.get(name) {
                return Some(rule);
            }
        }
        self.rules.get(id)
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&FieldRule> {
        self.rules.get(key)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_every_required_field() -> anyhow::Result<()> {
        let table = RuleTable::standard()?;
        assert_eq!(table.len(), 17);
        assert!(table.get("subscription-agreement").is_some());
        assert!(table.get("address-line2").is_none());
        Ok(())
    }

    #[test]
    fn email_and_phone_patterns() -> anyhow::Result<()> {
        let table = RuleTable::standard()?;
        let email = table.get("email").and_then(|r| r.pattern.as_ref()).unwrap();
        assert!(email.is_match("army@hybe.co.kr"));
        assert!(!email.is_match("army@hybe"));
        assert!(!email.is_match("army hybe@x.kr"));

        let phone = table.get("phone").and_then(|r| r.pattern.as_ref()).unwrap();
        assert!(phone.is_match("+234 803 123 4567"));
        assert!(phone.is_match("(555) 123-4567"));
        assert!(!phone.is_match("12345"));
        assert!(!phone.is_match("call me maybe"));
        Ok(())
    }

    #[test]
    fn lookup_prefers_name_over_id() -> anyhow::Result<()> {
        let table = RuleTable::standard()?;
        let rule = table.lookup("contact-method", "contact-email").unwrap();
        assert_eq!(rule.id, "contact-method");
        let rule = table.lookup("", "city").unwrap();
        assert_eq!(rule.id, "city");
        assert!(table.lookup("newsletter", "newsletter").is_none());
        Ok(())
    }
}
