//! DOM element bindings and small helpers.
//!
//! `Elements` resolves the fixed element ids once at startup. Only the form
//! and its submit button are mandatory; everything else degrades to `None`
//! and the feature that needs it reports the gap when it runs.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlButtonElement,
    HtmlElement, HtmlFormElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    match document().query_selector_all(selector) {
        Ok(nl) => collect(&nl),
        Err(_) => Vec::new(),
    }
}

pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    match parent.query_selector_all(selector) {
        Ok(nl) => collect(&nl),
        Err(_) => Vec::new(),
    }
}

fn collect(nl: &web_sys::NodeList) -> Vec<Element> {
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(el) = nl.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            v.push(el);
        }
    }
    v
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document().create_element(tag)
}

pub fn create_option(value: &str, text: &str) -> Result<HtmlOptionElement, JsValue> {
    let opt: HtmlOptionElement = create_element("option")?.dyn_into()?;
    opt.set_value(value);
    opt.set_text_content(Some(text));
    Ok(opt)
}

/// Replace every option with a disabled, selected placeholder.
pub fn reset_select(sel: &HtmlSelectElement, placeholder: &str) -> Result<(), JsValue> {
    sel.set_inner_html("");
    let opt = create_option("", placeholder)?;
    opt.set_disabled(true);
    opt.set_selected(true);
    sel.append_child(&opt)?;
    Ok(())
}

pub fn append_options<'a>(
    sel: &HtmlSelectElement,
    items: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<(), JsValue> {
    for (value, text) in items {
        let opt = create_option(value, text)?;
        sel.append_child(&opt)?;
    }
    Ok(())
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

pub fn set_display(el: &Element, value: &str) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_property("display", value);
    }
}

pub fn show_element(el: &Element) {
    remove_class(el, "d-none");
    set_display(el, "");
}

pub fn hide_element(el: &Element) {
    add_class(el, "d-none");
    set_display(el, "none");
}

pub fn set_required(el: &Element, required: bool) {
    if required {
        let _ = el.set_attribute("required", "");
    } else {
        let _ = el.remove_attribute("required");
    }
}

/// Checked radio in a named group.
pub fn checked_radio(name: &str) -> Option<HtmlInputElement> {
    by_selector_typed(&format!("input[name=\"{name}\"]:checked"))
}

pub fn by_selector_typed<T: JsCast>(selector: &str) -> Option<T> {
    query(selector).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn navigate(url: &str) {
    if let Err(err) = gloo_utils::window().location().set_href(url) {
        tracing::warn!(url, ?err, "navigation failed");
    }
}

/// Attach a listener for the page lifetime.
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        tracing::warn!(event, ?err, "could not attach listener");
    }
    cb.forget();
}

/// Attach a listener that the browser drops after its first call.
pub fn listen_once(target: &EventTarget, event: &str, handler: impl FnOnce(Event) + 'static) {
    let cb = Closure::once(handler);
    let opts = AddEventListenerOptions::new();
    opts.set_once(true);
    if let Err(err) = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        cb.as_ref().unchecked_ref(),
        &opts,
    ) {
        tracing::warn!(event, ?err, "could not attach listener");
    }
    cb.forget();
}

// ── Form controls ──

/// Any `input`, `select` or `textarea`.
#[derive(Clone)]
pub enum Control {
    Input(HtmlInputElement),
    Select(HtmlSelectElement),
    TextArea(HtmlTextAreaElement),
}

impl Control {
    pub fn from_element(el: Element) -> Option<Self> {
        let el = match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Some(Control::Input(input)),
            Err(el) => el,
        };
        let el = match el.dyn_into::<HtmlSelectElement>() {
            Ok(select) => return Some(Control::Select(select)),
            Err(el) => el,
        };
        el.dyn_into::<HtmlTextAreaElement>().ok().map(Control::TextArea)
    }

    pub fn by_id(id: &str) -> Option<Self> {
        by_id(id).and_then(Self::from_element)
    }

    pub fn element(&self) -> &HtmlElement {
        match self {
            Control::Input(el) => el,
            Control::Select(el) => el,
            Control::TextArea(el) => el,
        }
    }

    pub fn id(&self) -> String {
        self.element().id()
    }

    pub fn name(&self) -> String {
        match self {
            Control::Input(el) => el.name(),
            Control::Select(el) => el.name(),
            Control::TextArea(el) => el.name(),
        }
    }

    /// Raw `.value`, regardless of checked state.
    pub fn raw_value(&self) -> String {
        match self {
            Control::Input(el) => el.value(),
            Control::Select(el) => el.value(),
            Control::TextArea(el) => el.value(),
        }
    }

    pub fn set_value(&self, value: &str) {
        match self {
            Control::Input(el) => el.set_value(value),
            Control::Select(el) => el.set_value(value),
            Control::TextArea(el) => el.set_value(value),
        }
    }

    /// Value as a form would submit it: radio groups report their checked
    /// member, unchecked checkboxes report "".
    pub fn value(&self) -> String {
        match self {
            Control::Input(el) => match el.type_().as_str() {
                "radio" => checked_radio(&el.name())
                    .map(|r| r.value())
                    .unwrap_or_default(),
                "checkbox" if !el.checked() => String::new(),
                _ => el.value(),
            },
            _ => self.raw_value(),
        }
    }

    /// Whether this control contributes an entry to a submitted payload.
    pub fn is_successful(&self) -> bool {
        match self {
            Control::Input(el) => {
                !el.disabled()
                    && !el.name().is_empty()
                    && match el.type_().as_str() {
                        "radio" | "checkbox" => el.checked(),
                        "submit" | "button" | "reset" | "file" => false,
                        _ => true,
                    }
            }
            Control::Select(el) => !el.disabled() && !el.name().is_empty(),
            Control::TextArea(el) => !el.disabled() && !el.name().is_empty(),
        }
    }

    pub fn check_validity(&self) -> bool {
        match self {
            Control::Input(el) => el.check_validity(),
            Control::Select(el) => el.check_validity(),
            Control::TextArea(el) => el.check_validity(),
        }
    }

    pub fn required(&self) -> bool {
        match self {
            Control::Input(el) => el.required(),
            Control::Select(el) => el.required(),
            Control::TextArea(el) => el.required(),
        }
    }
}

pub fn form_controls(form: &HtmlFormElement) -> Vec<Control> {
    query_all_within(form, "input, select, textarea")
        .into_iter()
        .filter_map(Control::from_element)
        .collect()
}

// ── Elements struct ──

/// Element references used across the form. Clone-friendly (all inner types
/// are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub form: HtmlFormElement,
    pub submit_btn: HtmlButtonElement,
    pub btn_text: Option<Element>,
    pub spinner: Option<Element>,

    pub progress_bar: Option<HtmlElement>,

    pub phone: Option<HtmlInputElement>,
    pub phone_prefix: Option<Element>,

    pub country_select: Option<HtmlSelectElement>,
    pub country_input: Option<HtmlInputElement>,
    pub address_fields: Option<Element>,

    pub branch: Option<HtmlSelectElement>,
    pub group: Option<HtmlSelectElement>,
    pub artist: Option<HtmlSelectElement>,

    pub payment_type: Option<HtmlSelectElement>,
    pub installment_options: Option<Element>,
    pub installment_plan: Option<Element>,
    pub installment_terms: Option<HtmlInputElement>,
    pub card_payment: Option<HtmlInputElement>,

    pub permit_id: Option<HtmlInputElement>,
    pub submission_id: Option<HtmlInputElement>,
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the document is parsed.
    pub fn bind() -> Result<Elements, JsValue> {
        let form: HtmlFormElement = get_typed!(HtmlFormElement, "subscription-form");
        let submit_btn: HtmlButtonElement = get_typed!(HtmlButtonElement, "submit-btn");
        let btn_text = submit_btn.query_selector(".btn-text").ok().flatten();
        let spinner = submit_btn.query_selector(".spinner-border").ok().flatten();

        Ok(Elements {
            form,
            submit_btn,
            btn_text,
            spinner,

            progress_bar: by_selector_typed(".progress-bar"),

            phone: by_id_typed("phone"),
            phone_prefix: by_id("phone-prefix"),

            country_select: by_id_typed("country-select"),
            country_input: by_id_typed("country"),
            address_fields: by_id("address-fields"),

            branch: by_id_typed("branch"),
            group: by_id_typed("group"),
            artist: by_id_typed("artist"),

            payment_type: by_id_typed("payment-type"),
            installment_options: by_id("installment-options"),
            installment_plan: by_id("installment-plan"),
            installment_terms: by_id_typed("installment-terms"),
            card_payment: by_id_typed("card-payment"),

            permit_id: by_id_typed("permit-id"),
            submission_id: by_id_typed("submission-id"),
        })
    }
}

/// Styles for modal transitions, screen-reader-only text and the shake.
pub fn inject_styles() -> Result<(), JsValue> {
    let style = create_element("style")?;
    style.set_text_content(Some(
        ".modal-transition-in { opacity: 0; transform: translateY(-20px); \
           transition: opacity 0.3s ease, transform 0.3s ease; }\n\
         .sr-only { position: absolute; width: 1px; height: 1px; padding: 0; margin: -1px; \
           overflow: hidden; clip: rect(0, 0, 0, 0); white-space: nowrap; border: 0; }\n\
         .shake { animation: shake 0.5s; }\n\
         @keyframes shake { 0% { transform: translateX(0); } 25% { transform: translateX(-5px); } \
           50% { transform: translateX(5px); } 75% { transform: translateX(-5px); } \
           100% { transform: translateX(0); } }",
    ));
    if let Some(head) = document().head() {
        head.append_child(&style)?;
    }
    Ok(())
}
