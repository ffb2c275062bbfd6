//! Form configuration.
//!
//! Defaults match the production page. A deployment can override any subset
//! through a JSON object; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    pub submit_endpoint: String,
    pub analytics_endpoint: String,
    pub checkout_installment_url: String,
    pub checkout_full_url: String,
    pub success_page: String,
    pub card_success_page: String,
    pub phone_module_url: String,

    pub payment_countdown_secs: u32,
    pub redirect_countdown_secs: u32,
    pub redirect_delay_ms: u32,
    pub modal_transition_ms: u32,
    pub spinner_timeout_ms: u32,

    pub toast_ms: u32,
    pub success_toast_ms: u32,

    pub geo_cache_key: String,
    pub geo_cache_ttl_ms: u64,
    pub geo_detect_attempts: u32,
    pub manual_country_warning_ms: u32,

    pub debug: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            submit_endpoint: "/.netlify/functions/submit-form".to_owned(),
            analytics_endpoint: "/analytics".to_owned(),
            checkout_installment_url: "https://checkout.stripe.com/pay/cs_test_installment"
                .to_owned(),
            checkout_full_url: "https://checkout.stripe.com/pay/cs_test_full".to_owned(),
            success_page: "success.html".to_owned(),
            card_success_page: "stripe-success.html".to_owned(),
            phone_module_url: "https://cdn.jsdelivr.net/npm/libphonenumber-js@1.10.11/+esm"
                .to_owned(),

            payment_countdown_secs: 5,
            redirect_countdown_secs: 5,
            redirect_delay_ms: 2_000,
            modal_transition_ms: 50,
            spinner_timeout_ms: 15_000,

            toast_ms: 4_000,
            success_toast_ms: 3_000,

            geo_cache_key: "geoData".to_owned(),
            geo_cache_ttl_ms: 3_600_000,
            geo_detect_attempts: 2,
            manual_country_warning_ms: 500,

            debug: false,
        }
    }
}

impl FormConfig {
    /// Where the card-payment countdown sends the user.
    pub fn checkout_url(&self, installment: bool) -> &str {
        if installment {
            &self.checkout_installment_url
        } else {
            &self.checkout_full_url
        }
    }

    /// Landing page after a successful network submission.
    pub fn success_url(&self, paid_by_card: bool) -> &str {
        if paid_by_card {
            &self.card_success_page
        } else {
            &self.success_page
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() -> anyhow::Result<()> {
        let cfg: FormConfig =
            serde_json::from_str(r#"{"submitEndpoint":"/api/subscribe","debug":true}"#)?;
        assert_eq!(cfg.submit_endpoint, "/api/subscribe");
        assert!(cfg.debug);
        assert_eq!(cfg.analytics_endpoint, "/analytics");
        assert_eq!(cfg.geo_cache_ttl_ms, 3_600_000);
        Ok(())
    }

    #[test]
    fn redirect_targets_follow_payment_choice() {
        let cfg = FormConfig::default();
        assert!(cfg.checkout_url(true).ends_with("cs_test_installment"));
        assert!(cfg.checkout_url(false).ends_with("cs_test_full"));
        assert_eq!(cfg.success_url(true), "stripe-success.html");
        assert_eq!(cfg.success_url(false), "success.html");
    }
}
