//! Bridges to the page's third-party scripts: Bootstrap modals and
//! tooltips, AOS, and the on-demand phone formatting module.

use sf_form_core::{FormError, FormResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Element;

#[wasm_bindgen(inline_js = "
export function sf_modal_new(el, locked) {
    const opts = locked ? { backdrop: 'static', keyboard: false } : {};
    return new bootstrap.Modal(el, opts);
}

export function sf_modal_show(modal) { modal.show(); }

export function sf_modal_hide(modal) { modal.hide(); }

export function sf_tooltip_new(el) { return new bootstrap.Tooltip(el); }

export function sf_aos_init() {
    if (typeof AOS === 'undefined') return false;
    AOS.init({ duration: 800, once: true });
    return true;
}

export async function sf_load_as_you_type(url) {
    const mod = await import(url);
    if (typeof mod.AsYouType !== 'function') throw new Error('AsYouType missing from module');
    return mod.AsYouType;
}

export function sf_as_you_type(ctor, country, value) {
    return new ctor(country).input(value);
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn sf_modal_new(el: &Element, locked: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn sf_modal_show(modal: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn sf_modal_hide(modal: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn sf_tooltip_new(el: &Element) -> Result<JsValue, JsValue>;

    fn sf_aos_init() -> bool;

    #[wasm_bindgen(catch)]
    fn sf_load_as_you_type(url: &str) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch)]
    fn sf_as_you_type(ctor: &JsValue, country: &str, value: &str) -> Result<String, JsValue>;
}

/// Best-effort text of a thrown JS value.
pub fn js_error_text(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Handle to a `bootstrap.Modal` instance.
#[derive(Clone)]
pub struct BsModal(JsValue);

impl BsModal {
    pub fn new(id: &str, el: &Element, locked: bool) -> FormResult<Self> {
        sf_modal_new(el, locked)
            .map(BsModal)
            .map_err(|e| FormError::Widget(format!("modal \"{id}\": {}", js_error_text(&e))))
    }

    pub fn show(&self) {
        if let Err(err) = sf_modal_show(&self.0) {
            tracing::warn!(error = %js_error_text(&err), "modal show failed");
        }
    }

    pub fn hide(&self) {
        if let Err(err) = sf_modal_hide(&self.0) {
            tracing::warn!(error = %js_error_text(&err), "modal hide failed");
        }
    }
}

/// Tooltips for every `[data-bs-toggle="tooltip"]`. Returns how many were created.
pub fn init_tooltips() -> usize {
    crate::dom::query_all("[data-bs-toggle=\"tooltip\"]")
        .iter()
        .filter(|el| match sf_tooltip_new(el) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %js_error_text(&err), "tooltip init failed");
                false
            }
        })
        .count()
}

pub fn init_aos() -> bool {
    sf_aos_init()
}

/// The `AsYouType` class of the phone formatting module.
#[derive(Clone)]
pub struct AsYouType(JsValue);

impl AsYouType {
    pub async fn load(url: &str) -> FormResult<Self> {
        let widget = |e: JsValue| FormError::Widget(format!("phone formatter: {}", js_error_text(&e)));
        let promise = sf_load_as_you_type(url).map_err(widget)?;
        let ctor = JsFuture::from(promise).await.map_err(widget)?;
        Ok(AsYouType(ctor))
    }

    pub fn format(&self, country: &str, value: &str) -> FormResult<String> {
        sf_as_you_type(&self.0, country, value)
            .map_err(|e| FormError::Widget(format!("phone formatter: {}", js_error_text(&e))))
    }
}
