//! Page-level configuration.
//!
//! `window.SUBSCRIPTION_FORM_CONFIG` may hold a partial `FormConfig` object;
//! missing keys keep their defaults. Diagnostics are switched on by
//! `window.DEBUG_FORM_AUDIT` or when served from `localhost`.

use sf_form_core::FormConfig;
use wasm_bindgen::JsValue;

const CONFIG_GLOBAL: &str = "SUBSCRIPTION_FORM_CONFIG";
const DEBUG_GLOBAL: &str = "DEBUG_FORM_AUDIT";

fn global(name: &str) -> JsValue {
    js_sys::Reflect::get(&gloo_utils::window(), &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

/// Returns the effective config and, if the override was rejected, why.
pub fn load() -> (FormConfig, Option<String>) {
    let raw = global(CONFIG_GLOBAL);
    let (mut config, problem) = if raw.is_undefined() || raw.is_null() {
        (FormConfig::default(), None)
    } else {
        match serde_wasm_bindgen::from_value::<FormConfig>(raw) {
            Ok(config) => (config, None),
            Err(err) => (FormConfig::default(), Some(err.to_string())),
        }
    };
    config.debug |= debug_requested();
    (config, problem)
}

fn debug_requested() -> bool {
    let flag = global(DEBUG_GLOBAL).is_truthy();
    let host = gloo_utils::window().location().hostname().unwrap_or_default();
    flag || host == "localhost"
}
