//! Submit handling: DOM side of the submission controller.
//!
//! The controller in `sf_form_core::submission` owns the state machine. This
//! module snapshots the form, performs the network I/O, and runs the
//! countdown and retry modals for the outcome the controller returns.

use anyhow::{Context, Result};
use async_trait::async_trait;
use gloo_timers::callback::Timeout;
use sf_api_types::{FormPayload, SubmissionAnalytics};
use sf_form_core::audit;
use sf_form_core::clock::Clock;
use sf_form_core::submission::{SubmissionTransport, SubmitOutcome, SubmitRequest, SubmitUi};
use sf_form_core::toast::{Notifier, Toast};
use sf_form_core::FormError;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{Element, FormData, HtmlButtonElement};

use crate::dom::{self, Elements};
use crate::modal::{CountdownSpec, ShowOptions};
use crate::progress;
use crate::state::App;
use crate::storage::JsClock;
use crate::toast::ToastReporter;
use crate::validation;

const IDLE_LABEL: &str = "Submit Subscription";
const BUSY_LABEL: &str = "Submitting...";
const REDIRECT_LABEL: &str = "Redirecting, please wait...";

pub const PAYMENT_MODAL: &str = "paymentModal";
pub const REDIRECT_MODAL: &str = "loadingRedirectModal";
pub const RETRY_MODAL: &str = "retryModal";

// ── transport ──

pub struct DomTransport;

fn js_err(err: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{}", crate::widgets::js_error_text(&err))
}

#[async_trait(?Send)]
impl SubmissionTransport for DomTransport {
    async fn post_form(&self, endpoint: &str, payload: &FormPayload) -> Result<()> {
        let data = FormData::new().map_err(js_err)?;
        for entry in &payload.entries {
            data.append_with_str(&entry.name, &entry.value)
                .map_err(js_err)?;
        }

        let response = gloo_net::http::Request::post(endpoint)
            .body(data)
            .context("building submission request")?
            .send()
            .await
            .map_err(|err| FormError::Network(err.to_string()))?;

        if !response.ok() {
            return Err(FormError::Submission(format!(
                "HTTP {} {}",
                response.status(),
                response.status_text()
            ))
            .into());
        }
        Ok(())
    }

    fn send_beacon(&self, endpoint: &str, body: &str) -> bool {
        gloo_utils::window()
            .navigator()
            .send_beacon_with_opt_str(endpoint, Some(body))
            .unwrap_or(false)
    }
}

// ── submit button ──

pub struct DomSubmitUi {
    button: HtmlButtonElement,
    label: Option<Element>,
    spinner: Option<Element>,
    toasts: Rc<ToastReporter>,
}

impl DomSubmitUi {
    pub fn new(els: &Elements, toasts: Rc<ToastReporter>) -> Self {
        Self {
            button: els.submit_btn.clone(),
            label: els.btn_text.clone(),
            spinner: els.spinner.clone(),
            toasts,
        }
    }
}

impl Notifier for DomSubmitUi {
    fn notify(&self, toast: Toast) {
        self.toasts.notify(toast);
    }
}

impl SubmitUi for DomSubmitUi {
    fn set_busy(&self, busy: bool) {
        self.button.set_disabled(busy);
        if let Some(spinner) = &self.spinner {
            dom::toggle_class(spinner, "d-none", !busy);
        }
        if let Some(label) = &self.label {
            label.set_text_content(Some(if busy { BUSY_LABEL } else { IDLE_LABEL }));
        }
    }
}

// ── startup ──

/// Fill the hidden `submission-id` and `permit-id` inputs.
pub fn populate_ids(els: &Elements) {
    if let Some(input) = &els.submission_id {
        input.set_value(&audit::submission_id());
    }
    if let Some(input) = &els.permit_id {
        input.set_value(&audit::permit_id(JsClock.now_ms() as u64));
    }
}

// ── submit flow ──

fn snapshot(app: &App) -> (FormPayload, SubmissionAnalytics) {
    let controls = dom::form_controls(&app.els.form);
    let mut analytics = SubmissionAnalytics {
        timestamp: String::from(js_sys::Date::new_0().to_iso_string()),
        fields_filled: 0,
        validation_errors: 0,
        start_time: JsClock.now_ms(),
        duration: None,
    };
    let mut payload = FormPayload::default();
    for control in &controls {
        if !control.raw_value().is_empty() {
            analytics.fields_filled += 1;
        }
        if !control.check_validity() {
            analytics.validation_errors += 1;
        }
        if control.is_successful() {
            payload.push(&control.name(), &control.raw_value());
        }
    }
    (payload, analytics)
}

pub async fn on_submit(app: App) {
    let (payload, analytics) = snapshot(&app);

    let errors = validation::validate_all(&app);
    for err in &errors {
        tracing::debug!(%err, "field rejected");
    }

    let card_payment = app.els.card_payment.as_ref().is_some_and(|c| c.checked());
    let payment_type = app
        .els
        .payment_type
        .as_ref()
        .map(|s| s.value())
        .unwrap_or_default();
    let payment_method = dom::checked_radio("payment-method").map(|r| r.value());

    let request = SubmitRequest {
        payload,
        all_fields_valid: errors.is_empty(),
        card_payment,
        payment_type,
        payment_method,
        analytics,
    };
    let outcome = app.submission.submit(request).await;
    handle_outcome(&app, outcome);
}

/// Closing the checkout or retry modal by hand must not strand the
/// controller in a pending state.
pub fn install_modal_hooks(app: &App) {
    let checkout = app.clone();
    app.modals.on_hidden(PAYMENT_MODAL, move || {
        if checkout.submission.cancel_pending() {
            progress::update_submit_state(&checkout);
        }
    });
    let retry = app.clone();
    app.modals.on_hidden(RETRY_MODAL, move || {
        handle_outcome(&retry, retry.submission.decline_retry());
    });
}

fn handle_outcome(app: &App, outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Ignored => tracing::debug!("submit outcome ignored"),
        SubmitOutcome::Rejected | SubmitOutcome::Failed => {}
        SubmitOutcome::CardCheckout {
            target,
            countdown_secs,
        } => {
            app.modals.show(
                PAYMENT_MODAL,
                ShowOptions {
                    countdown: Some(redirect_countdown(countdown_secs, "payment-countdown", target)),
                    locked: false,
                },
            );
        }
        SubmitOutcome::Submitted {
            redirect,
            delay_ms,
            countdown_secs,
        } => {
            let app = app.clone();
            Timeout::new(delay_ms, move || show_redirect(&app, redirect, countdown_secs)).forget();
        }
        SubmitOutcome::NeedsRetryDecision { error } => show_retry(app, &error),
    }
}

fn redirect_countdown(seconds: u32, element_id: &str, target: String) -> CountdownSpec {
    CountdownSpec {
        seconds,
        element_id: element_id.to_owned(),
        on_complete: Box::new(move || {
            dom::navigate(&target);
            Ok(())
        }),
    }
}

fn show_redirect(app: &App, target: String, seconds: u32) {
    if dom::by_id(REDIRECT_MODAL).is_none() {
        Timeout::new(seconds * 1_000, move || dom::navigate(&target)).forget();
        return;
    }
    if let Some(label) = dom::by_id("loadingRedirectLabel") {
        label.set_text_content(Some(REDIRECT_LABEL));
    }
    app.modals.show(
        REDIRECT_MODAL,
        ShowOptions {
            countdown: Some(redirect_countdown(seconds, "redirect-countdown", target)),
            locked: true,
        },
    );
}

// ── retry decision ──

/// Create the retry modal when the page does not ship one.
pub fn ensure_retry_modal() -> Result<(), JsValue> {
    if dom::by_id(RETRY_MODAL).is_some() {
        return Ok(());
    }
    let modal = dom::create_element("div")?;
    modal.set_id(RETRY_MODAL);
    modal.set_class_name("modal fade");
    modal.set_attribute("tabindex", "-1")?;
    modal.set_attribute("aria-labelledby", "retryModalLabel")?;
    modal.set_attribute("aria-hidden", "true")?;
    modal.set_attribute("data-bs-backdrop", "static")?;
    modal.set_attribute("data-bs-keyboard", "false")?;
    modal.set_inner_html(
        "<div class=\"modal-dialog modal-dialog-centered\"><div class=\"modal-content\">\
           <div class=\"modal-header\">\
             <h5 class=\"modal-title\" id=\"retryModalLabel\">Submission failed</h5>\
           </div>\
           <div class=\"modal-body\">\
             <p>Submission failed. Would you like to retry?</p>\
             <p class=\"small text-muted\" id=\"retry-error-detail\"></p>\
           </div>\
           <div class=\"modal-footer\">\
             <button type=\"button\" class=\"btn btn-secondary\" id=\"retry-cancel-btn\">Cancel</button>\
             <button type=\"button\" class=\"btn btn-primary\" id=\"retry-submit-btn\">Retry</button>\
           </div>\
         </div></div>",
    );
    dom::document()
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&modal)?;
    Ok(())
}

fn show_retry(app: &App, error: &str) {
    if let Some(detail) = dom::by_id("retry-error-detail") {
        detail.set_text_content(Some(error));
    }
    app.modals.show(RETRY_MODAL, ShowOptions::default());
}

pub async fn on_retry(app: App) {
    app.modals.hide(RETRY_MODAL);
    let outcome = app.submission.retry().await;
    handle_outcome(&app, outcome);
}

pub fn on_decline_retry(app: &App) {
    app.modals.hide(RETRY_MODAL);
    let outcome = app.submission.decline_retry();
    handle_outcome(app, outcome);
}
