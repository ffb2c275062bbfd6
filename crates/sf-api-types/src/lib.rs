use serde::{Deserialize, Serialize};

/// Two-letter ISO country code, always upper-case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CountryCode(pub String);

impl CountryCode {
    /// Normalises a raw provider value. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
}

impl Country {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// Normalised geo-IP answer shared by every provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeoLocation {
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal: Option<String>,
}

impl GeoLocation {
    pub fn country(&self) -> Option<CountryCode> {
        self.country_code.as_deref().and_then(CountryCode::parse)
    }
}

/// Persisted shape of the `geoData` local-storage entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoCacheEntry {
    pub data: GeoLocation,
    /// Epoch milliseconds after which the entry is stale.
    pub expires: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormEntry {
    pub name: String,
    pub value: String,
}

/// Snapshot of the named, enabled form controls in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormPayload {
    pub entries: Vec<FormEntry>,
}

impl FormPayload {
    pub fn push(&mut self, name: &str, value: &str) {
        self.entries.push(FormEntry {
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAnalytics {
    pub timestamp: String,
    pub fields_filled: u32,
    pub validation_errors: u32,
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsBeacon {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: SubmissionAnalytics,
}

impl AnalyticsBeacon {
    pub fn form_submission(data: SubmissionAnalytics) -> Self {
        Self {
            kind: "form_submission".to_owned(),
            data,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
