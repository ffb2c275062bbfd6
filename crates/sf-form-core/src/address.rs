//! Per-country address layouts.
//!
//! One table drives visibility, order, labels, placeholders, required-ness and
//! postal-code patterns of the five address inputs. Countries without an
//! explicit format use the generic one, optionally with a localised hint for
//! the state/province input.

use regex::Regex;
use std::collections::HashMap;

use crate::error::FormResult;

pub const ADDRESS_FIELD_IDS: [&str; 5] =
    ["address-line1", "address-line2", "city", "state", "postal-code"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub required: bool,
    /// Pattern checked by the validator.
    pub pattern: Option<&'static str>,
    /// Same constraint in HTML `pattern` attribute syntax.
    pub html_pattern: Option<&'static str>,
    pub error: Option<&'static str>,
}

const fn field(
    id: &'static str,
    label: &'static str,
    placeholder: &'static str,
    required: bool,
) -> AddressFieldSpec {
    AddressFieldSpec {
        id,
        label,
        placeholder,
        required,
        pattern: None,
        html_pattern: None,
        error: None,
    }
}

const fn postal(
    label: &'static str,
    placeholder: &'static str,
    pattern: &'static str,
    html_pattern: &'static str,
    error: &'static str,
) -> AddressFieldSpec {
    AddressFieldSpec {
        id: "postal-code",
        label,
        placeholder,
        required: true,
        pattern: Some(pattern),
        html_pattern: Some(html_pattern),
        error: Some(error),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AddressFormat {
    pub fields: &'static [AddressFieldSpec],
    pub order: &'static [&'static str],
}

const WESTERN_ORDER: &[&str] = &["address-line1", "address-line2", "city", "state", "postal-code"];

pub const US_FORMAT: AddressFormat = AddressFormat {
    fields: &[
        field("address-line1", "Street Address", "123 Main St", true),
        field("address-line2", "Apt/Suite (optional)", "Apt, suite, etc.", false),
        field("city", "City", "City", true),
        field("state", "State", "State", true),
        postal("ZIP Code", "12345", r"^\d{5}(-\d{4})?$", r"\d{5}(-\d{4})?", "Invalid ZIP code"),
    ],
    order: WESTERN_ORDER,
};

pub const GB_FORMAT: AddressFormat = AddressFormat {
    fields: &[
        field("address-line1", "Street Address", "221B Baker St", true),
        field("address-line2", "Apartment (optional)", "Flat, suite, etc.", false),
        field("city", "Town/City", "London", true),
        field("state", "County", "County", false),
        postal(
            "Postcode",
            "SW1A 1AA",
            r"(?i)^[A-Z]{1,2}\d[A-Z\d]? ?\d[A-Z]{2}$",
            r"[A-Za-z]{1,2}\d[A-Za-z\d]? ?\d[A-Za-z]{2}",
            "Invalid UK postcode",
        ),
    ],
    order: WESTERN_ORDER,
};

pub const JP_FORMAT: AddressFormat = AddressFormat {
    fields: &[
        postal("Postal Code", "100-0001", r"^\d{3}-\d{4}$", r"\d{3}-\d{4}", "Invalid postal code"),
        field("address-line1", "Prefecture", "Tokyo", true),
        field("address-line2", "City/Ward", "Chiyoda-ku", true),
        field("city", "Town/Block", "Kanda", true),
        field("state", "Building/Apartment (optional)", "Building, room, etc.", false),
    ],
    order: &["postal-code", "address-line1", "address-line2", "city", "state"],
};

pub const GENERIC_FORMAT: AddressFormat = AddressFormat {
    fields: &[
        field("address-line1", "Address Line 1", "Address Line 1", true),
        field("address-line2", "Address Line 2 (optional)", "Address Line 2", false),
        field("city", "City/Town", "City/Town", true),
        field("state", "State/Province/Region", "State/Province/Region", false),
        postal("Postal Code", "Postal Code", r"^.{2,10}$", r".{2,10}", "Invalid postal code"),
    ],
    order: WESTERN_ORDER,
};

/// Explicit format for a country code, `None` when the generic one applies.
pub fn format_for(country: &str) -> Option<&'static AddressFormat> {
    match country.to_uppercase().as_str() {
        "US" => Some(&US_FORMAT),
        "GB" => Some(&GB_FORMAT),
        "JP" => Some(&JP_FORMAT),
        _ => None,
    }
}

/// Localised state/province hint for countries on the generic format.
pub fn state_hint(country: &str) -> Option<&'static str> {
    match country.to_uppercase().as_str() {
        "CA" => Some("Province (e.g., ON)"),
        "KR" => Some("시/도 (e.g., 서울특별시)"),
        "CN" => Some("省/直辖市 (e.g., 北京市)"),
        "NG" => Some("State (e.g., Lagos)"),
        _ => None,
    }
}

/// Resolved layout for one country: what to show, in which order, and how.
#[derive(Debug, Clone)]
pub struct AddressLayout {
    pub country: Option<String>,
    pub visible: Vec<AddressFieldSpec>,
    pub hidden: Vec<&'static str>,
    patterns: HashMap<&'static str, Regex>,
}

impl AddressLayout {
    pub fn for_country(country: Option<&str>) -> FormResult<Self> {
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase);
        let explicit = country.as_deref().and_then(format_for);
        let format = explicit.unwrap_or(&GENERIC_FORMAT);
        let hint = match explicit {
            Some(_) => None,
            None => country.as_deref().and_then(state_hint),
        };

        let mut visible = Vec::with_capacity(format.order.len());
        for id in format.order {
            if let Some(spec) = format.fields.iter().find(|f| f.id == *id) {
                let mut spec = *spec;
                if let (Some(hint), "state") = (hint, spec.id) {
                    spec.placeholder = hint;
                }
                visible.push(spec);
            }
        }

        let hidden = ADDRESS_FIELD_IDS
            .iter()
            .copied()
            .filter(|id| !format.order.contains(id))
            .collect();

        let mut patterns = HashMap::new();
        for spec in &visible {
            if let Some(pattern) = spec.pattern {
                patterns.insert(spec.id, Regex::new(pattern)?);
            }
        }

        Ok(Self {
            country,
            visible,
            hidden,
            patterns,
        })
    }

    pub fn is_address_field(id: &str) -> bool {
        ADDRESS_FIELD_IDS.contains(&id)
    }

    pub fn spec(&self, id: &str) -> Option<&AddressFieldSpec> {
        self.visible.iter().find(|spec| spec.id == id)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(&id)
    }

    pub fn pattern(&self, id: &str) -> Option<&Regex> {
        self.patterns.get(id)
    }

    pub fn order(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.visible.iter().map(|spec| spec.id)
    }
}

/// What a late geo-IP answer may do to the address layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupLayout {
    /// The country select already holds a choice; its layout stands.
    KeepSelection,
    Apply(Option<String>),
}

/// Geo-IP drives the startup layout only while the country select is empty.
pub fn startup_layout(selected: &str, detected: Option<&str>) -> StartupLayout {
    if !selected.trim().is_empty() {
        return StartupLayout::KeepSelection;
    }
    StartupLayout::Apply(detected.map(str::to_uppercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_geo_answer_never_overrides_a_chosen_country() {
        assert_eq!(startup_layout("GB", Some("US")), StartupLayout::KeepSelection);
        assert_eq!(startup_layout("JP", None), StartupLayout::KeepSelection);
        assert_eq!(
            startup_layout("", Some("us")),
            StartupLayout::Apply(Some("US".to_owned()))
        );
        assert_eq!(startup_layout("  ", None), StartupLayout::Apply(None));
    }

    #[test]
    fn every_supported_country_shows_exactly_its_order() -> anyhow::Result<()> {
        for (code, format) in [("US", &US_FORMAT), ("GB", &GB_FORMAT), ("JP", &JP_FORMAT)] {
            let layout = AddressLayout::for_country(Some(code))?;
            let shown: Vec<&str> = layout.order().collect();
            assert_eq!(shown, format.order, "{code}");
            for id in ADDRESS_FIELD_IDS {
                assert_eq!(
                    layout.is_hidden(id),
                    !format.order.contains(&id),
                    "{code} {id}"
                );
            }
        }
        Ok(())
    }

    #[test]
    fn unknown_or_missing_country_uses_generic_format() -> anyhow::Result<()> {
        for country in [None, Some(""), Some("FR"), Some("zz")] {
            let layout = AddressLayout::for_country(country)?;
            let state = layout.spec("state").unwrap();
            assert_eq!(state.label, "State/Province/Region");
            assert!(!state.required);
        }
        Ok(())
    }

    #[test]
    fn japan_puts_postal_code_first_and_requires_ward() -> anyhow::Result<()> {
        let layout = AddressLayout::for_country(Some("jp"))?;
        assert_eq!(layout.order().next(), Some("postal-code"));
        assert!(layout.spec("address-line2").unwrap().required);
        assert!(layout.pattern("postal-code").unwrap().is_match("100-0001"));
        assert!(!layout.pattern("postal-code").unwrap().is_match("1000001"));
        Ok(())
    }

    #[test]
    fn uk_postcode_is_case_insensitive() -> anyhow::Result<()> {
        let layout = AddressLayout::for_country(Some("GB"))?;
        let re = layout.pattern("postal-code").unwrap();
        assert!(re.is_match("SW1A 1AA"));
        assert!(re.is_match("sw1a1aa"));
        assert!(!re.is_match("12345"));
        Ok(())
    }

    #[test]
    fn generic_countries_get_state_hint() -> anyhow::Result<()> {
        let layout = AddressLayout::for_country(Some("NG"))?;
        assert_eq!(layout.spec("state").unwrap().placeholder, "State (e.g., Lagos)");
        let layout = AddressLayout::for_country(Some("US"))?;
        assert_eq!(layout.spec("state").unwrap().placeholder, "State");
        Ok(())
    }
}
