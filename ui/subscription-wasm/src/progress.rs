//! Progress bar, its live region, and submit gating.

use sf_form_core::progress::{self, ProgressSource};
use sf_form_core::readiness::{self, FieldStatus, ReadinessSource};
use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::dom::{self, Control};
use crate::state::AppContext;

const LIVE_ID: &str = "progress-live";
const DEBUG_ID: &str = "form-debug-msg";

struct DomForm;

fn contact_method_chosen() -> bool {
    dom::checked_radio("contact-method").is_some()
}

impl ProgressSource for DomForm {
    fn is_filled(&self, id: &str) -> Option<bool> {
        let control = Control::by_id(id)?;
        Some(!control.value().is_empty() && control.check_validity())
    }

    fn contact_method_chosen(&self) -> bool {
        contact_method_chosen()
    }
}

impl ReadinessSource for DomForm {
    fn field(&self, id: &str) -> Option<FieldStatus> {
        let control = Control::by_id(id)?;
        Some(FieldStatus {
            required: control.required(),
            empty: control.value().is_empty(),
            valid: control.check_validity(),
        })
    }

    fn contact_method_chosen(&self) -> bool {
        contact_method_chosen()
    }

    fn payment_method_visible(&self) -> bool {
        dom::query_all("input[name=\"payment-method\"]")
            .iter()
            .any(|input| input.closest(".d-none").ok().flatten().is_none())
    }

    fn payment_method_chosen(&self) -> bool {
        dom::checked_radio("payment-method").is_some()
    }

    fn payment_type(&self) -> String {
        Control::by_id("payment-type")
            .map(|c| c.value())
            .unwrap_or_default()
    }
}

/// Create the polite live region next to the progress bar.
pub fn install_live_region(app: &AppContext) -> Result<(), JsValue> {
    let Some(parent) = app.els.progress_bar.as_ref().and_then(|b| b.parent_element()) else {
        return Ok(());
    };
    let live = dom::create_element("div")?;
    live.set_id(LIVE_ID);
    live.set_attribute("aria-live", "polite")?;
    live.set_attribute("aria-atomic", "true")?;
    dom::add_class(&live, "sr-only");
    parent.append_child(&live)?;
    Ok(())
}

pub fn update(app: &AppContext) {
    let estimate = progress::estimate(&DomForm);
    if let Some(bar) = &app.els.progress_bar {
        let _ = bar
            .style()
            .set_property("width", &format!("{}%", estimate.percent()));
        let _ = bar.set_attribute("aria-valuenow", &estimate.percent().to_string());
    }
    if let Some(live) = dom::by_id(LIVE_ID) {
        live.set_text_content(Some(&estimate.live_text()));
    }
}

/// The red line under the submit button that lists what is missing.
pub fn install_debug_line(app: &AppContext) -> Result<(), JsValue> {
    let line = dom::create_element("div")?;
    line.set_id(DEBUG_ID);
    line.set_attribute("style", "color: red; font-size: 0.95em; margin-top: 0.5em;")?;
    let btn: &Element = &app.els.submit_btn;
    if let Some(parent) = btn.parent_node() {
        parent.insert_before(&line, btn.next_sibling().as_ref())?;
    }
    Ok(())
}

/// Enable the submit button only when nothing is missing.
pub fn update_submit_state(app: &AppContext) {
    let missing = readiness::missing_requirements(&DomForm);
    app.els.submit_btn.set_disabled(!missing.is_empty());
    if let Some(line) = dom::by_id(DEBUG_ID) {
        line.set_text_content(Some(&readiness::debug_line(&missing)));
    }
}
