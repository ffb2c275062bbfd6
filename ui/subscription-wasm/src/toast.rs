//! The floating `#globalToast` notification.
//!
//! One toast element for the whole page. Showing a toast replaces the
//! message and restarts the dismissal; the previous timer is dropped, which
//! cancels it.

use gloo_timers::callback::Timeout;
use sf_form_core::toast::{Notifier, Toast};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::dom;

const TOAST_ID: &str = "globalToast";
const FADE_MS: u32 = 350;

pub struct ToastReporter {
    default_ms: u32,
    dismiss: Rc<RefCell<Option<Timeout>>>,
    fade: Rc<RefCell<Option<Timeout>>>,
}

impl ToastReporter {
    pub fn new(default_ms: u32) -> Self {
        Self {
            default_ms,
            dismiss: Rc::default(),
            fade: Rc::default(),
        }
    }

    fn element() -> Result<HtmlElement, JsValue> {
        if let Some(el) = dom::by_id_typed::<HtmlElement>(TOAST_ID) {
            return Ok(el);
        }
        let el: HtmlElement = dom::create_element("div")?.dyn_into()?;
        el.set_id(TOAST_ID);
        el.set_attribute("role", "status")?;
        let style = el.style();
        for (prop, value) in [
            ("position", "fixed"),
            ("bottom", "32px"),
            ("right", "32px"),
            ("z-index", "9999"),
            ("min-width", "240px"),
            ("max-width", "360px"),
            ("border-radius", "8px"),
            ("box-shadow", "0 2px 8px rgba(0,0,0,0.15)"),
            ("padding", "16px 20px"),
            ("font-size", "1rem"),
            ("display", "none"),
            ("transition", "opacity 0.3s"),
        ] {
            style.set_property(prop, value)?;
        }
        dom::document()
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&el)?;
        Ok(el)
    }

    fn render(&self, toast: &Toast) -> Result<(), JsValue> {
        let el = Self::element()?;
        let (background, color, border) = toast.kind.palette();
        let style = el.style();
        style.set_property("background", background)?;
        style.set_property("color", color)?;
        style.set_property("border", &format!("1px solid {border}"))?;

        el.set_inner_html("");
        let icon = dom::create_element("span")?;
        icon.set_attribute("style", "font-weight:bold;")?;
        icon.set_text_content(Some(&format!("{} ", toast.kind.icon())));
        el.append_child(&icon)?;
        el.append_child(&dom::document().create_text_node(&toast.message))?;

        style.set_property("display", "block")?;
        style.set_property("opacity", "1")?;

        self.fade.borrow_mut().take();
        let fade_slot = self.fade.clone();
        let timeout_ms = toast.timeout_ms.unwrap_or(self.default_ms);
        let dismiss = Timeout::new(timeout_ms, move || {
            let _ = el.style().set_property("opacity", "0");
            let el = el.clone();
            let fade = Timeout::new(FADE_MS, move || {
                let _ = el.style().set_property("display", "none");
            });
            *fade_slot.borrow_mut() = Some(fade);
        });
        *self.dismiss.borrow_mut() = Some(dismiss);
        Ok(())
    }
}

impl Notifier for ToastReporter {
    fn notify(&self, toast: Toast) {
        tracing::debug!(kind = ?toast.kind, message = %toast.message, "toast");
        if let Err(err) = self.render(&toast) {
            gloo_console::error!(format!("toast failed: {err:?}"), toast.message);
        }
    }
}
