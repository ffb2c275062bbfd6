//! Inline field validation on real controls.

use sf_form_core::FormError;
use sf_form_core::validator::{FieldSurface, Verdict};
use web_sys::{Element, HtmlElement};

use crate::dom::{self, Control};
use crate::state::AppContext;

/// A control plus its `.invalid-feedback` sibling.
pub struct DomField<'a>(pub &'a Control);

impl DomField<'_> {
    fn feedback(&self, create: bool) -> Option<Element> {
        let parent = self.0.element().parent_element()?;
        if let Ok(Some(existing)) = parent.query_selector(".invalid-feedback") {
            return Some(existing);
        }
        if !create {
            return None;
        }
        let node = dom::create_element("div").ok()?;
        node.set_class_name("invalid-feedback");
        let _ = node.set_attribute("role", "alert");
        let _ = node.set_attribute("aria-live", "assertive");
        parent.append_child(&node).ok()?;
        Some(node)
    }
}

impl FieldSurface for DomField<'_> {
    fn name(&self) -> String {
        self.0.name()
    }

    fn id(&self) -> String {
        self.0.id()
    }

    fn value(&self) -> String {
        self.0.value()
    }

    fn show_error(&self, message: &str) {
        if let Some(feedback) = self.feedback(true) {
            feedback.set_text_content(Some(message));
        }
        let el = self.0.element();
        dom::add_class(el, "is-invalid");
        let _ = el.set_attribute("aria-invalid", "true");
    }

    fn clear_error(&self) {
        if let Some(feedback) = self.feedback(false) {
            feedback.set_text_content(Some(""));
        }
        let el = self.0.element();
        dom::remove_class(el, "is-invalid");
        let _ = el.set_attribute("aria-invalid", "false");
    }
}

pub fn validate(app: &AppContext, control: &Control) -> bool {
    app.validator.borrow().validate_field(&DomField(control))
}

/// Validate every control of the form; each one renders its own state.
pub fn validate_all(app: &AppContext) -> Vec<FormError> {
    let validator = app.validator.borrow();
    let mut errors = Vec::new();
    for control in dom::form_controls(&app.els.form) {
        let field = DomField(&control);
        if let Verdict::Invalid(message) = validator.verdict(&field) {
            field.show_error(&message);
            errors.push(FormError::Validation {
                field: field.id(),
                message,
            });
        } else {
            field.clear_error();
        }
    }
    errors
}

/// Restart the shake animation on a field.
pub fn shake(el: &HtmlElement) {
    dom::remove_class(el, "shake");
    // Reading layout forces a reflow so the animation restarts.
    let _ = el.offset_width();
    dom::add_class(el, "shake");
    let target = el.clone();
    dom::listen_once(el, "animationend", move |_| {
        dom::remove_class(&target, "shake");
    });
}

/// `role="alert"` on feedback nodes and `aria-labelledby` from labels.
pub fn enhance_accessibility() {
    for el in dom::query_all(".invalid-feedback") {
        let _ = el.set_attribute("role", "alert");
        let _ = el.set_attribute("aria-live", "assertive");
    }
    for el in dom::query_all("input, select") {
        let id = el.id();
        if id.is_empty() {
            continue;
        }
        let Some(label) = dom::query(&format!("label[for=\"{id}\"]")) else {
            continue;
        };
        if !label.id().is_empty() {
            let _ = el.set_attribute("aria-labelledby", &label.id());
        }
    }
}
