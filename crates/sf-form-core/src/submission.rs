//! Submission state machine.
//!
//! States: `Idle → Validating → {PaymentRedirectPending | Submitting}`;
//! `Submitting → {Succeeded | AwaitingRetryDecision}`;
//! `AwaitingRetryDecision → {Submitting | Failed}` on an explicit user choice;
//! `PaymentRedirectPending → Idle` when the checkout countdown is dismissed.
//!
//! The controller never touches the DOM. It reports through `SubmitUi` and
//! hands redirect work back to the caller as a `SubmitOutcome`.

use anyhow::Result;
use async_trait::async_trait;
use sf_api_types::{AnalyticsBeacon, FormPayload, SubmissionAnalytics};
use std::cell::{Cell, RefCell};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::config::FormConfig;
use crate::readiness::INSTALLMENT;
use crate::toast::{Notifier, Toast};

pub const INVALID_FORM_MESSAGE: &str = "Please correct the highlighted errors and try again.";
pub const SUCCESS_MESSAGE: &str = "Subscription submitted! Redirecting...";
pub const FINAL_FAILURE_MESSAGE: &str = "Submission failed. Please try again later.";
pub const ALREADY_PENDING_MESSAGE: &str = "Your subscription is already being processed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPlan {
    Installment,
    Full,
}

impl PaymentPlan {
    pub fn from_payment_type(value: &str) -> Self {
        if value == INSTALLMENT {
            PaymentPlan::Installment
        } else {
            PaymentPlan::Full
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Validating,
    PaymentRedirectPending { target: String },
    Submitting { attempt: u32 },
    AwaitingRetryDecision { error: String },
    Succeeded { redirect: String },
    Failed { error: String },
}

impl SubmissionState {
    /// A new submit is accepted only when nothing is in flight or pending.
    pub fn accepts_submit(&self) -> bool {
        matches!(
            self,
            SubmissionState::Idle | SubmissionState::Failed { .. } | SubmissionState::Succeeded { .. }
        )
    }
}

/// Everything the controller needs from one submit event.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub payload: FormPayload,
    pub all_fields_valid: bool,
    pub card_payment: bool,
    pub payment_type: String,
    /// Checked `payment-method` radio value, if any.
    pub payment_method: Option<String>,
    pub analytics: SubmissionAnalytics,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another submission is in flight.
    Ignored,
    /// Validation failed; nothing was sent.
    Rejected,
    /// Card payment: run the payment countdown, then navigate.
    CardCheckout { target: String, countdown_secs: u32 },
    /// POST succeeded: after `delay_ms`, run the redirect countdown.
    Submitted {
        redirect: String,
        delay_ms: u32,
        countdown_secs: u32,
    },
    /// POST failed: ask the user whether to retry.
    NeedsRetryDecision { error: String },
    /// The user declined to retry.
    Failed,
}

#[async_trait(?Send)]
pub trait SubmissionTransport {
    async fn post_form(&self, endpoint: &str, payload: &FormPayload) -> Result<()>;
    /// Fire-and-forget analytics; returns whether the browser queued it.
    fn send_beacon(&self, endpoint: &str, body: &str) -> bool;
}

/// Submit-button feedback plus toasts.
pub trait SubmitUi: Notifier {
    fn set_busy(&self, busy: bool);
}

pub struct SubmissionController<T, U, C> {
    transport: T,
    ui: U,
    clock: C,
    config: FormConfig,
    state: RefCell<SubmissionState>,
    pending: RefCell<Option<SubmitRequest>>,
    attempts: Cell<u32>,
}

impl<T, U, C> SubmissionController<T, U, C>
where
    T: SubmissionTransport,
    U: SubmitUi,
    C: Clock,
{
    pub fn new(transport: T, ui: U, clock: C, config: FormConfig) -> Self {
        Self {
            transport,
            ui,
            clock,
            config,
            state: RefCell::new(SubmissionState::Idle),
            pending: RefCell::new(None),
            attempts: Cell::new(0),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }


    fn set_state(&self, next: SubmissionState) {
        *self.state.borrow_mut() = next;
    }

    pub async fn submit(&self, request: SubmitRequest) -> SubmitOutcome {
        if !self.state.borrow().accepts_submit() {
            info!(state = ?self.state(), "submit ignored while another one is pending");
            self.ui.notify(Toast::info(ALREADY_PENDING_MESSAGE));
            return SubmitOutcome::Ignored;
        }
        self.set_state(SubmissionState::Validating);

        if !request.all_fields_valid {
            self.ui.error(INVALID_FORM_MESSAGE, None);
            self.set_state(SubmissionState::Idle);
            return SubmitOutcome::Rejected;
        }

        if request.card_payment {
            let plan = PaymentPlan::from_payment_type(&request.payment_type);
            let target = self
                .config
                .checkout_url(plan == PaymentPlan::Installment)
                .to_owned();
            info!(?plan, "card payment selected, skipping network submission");
            self.set_state(SubmissionState::PaymentRedirectPending {
                target: target.clone(),
            });
            return SubmitOutcome::CardCheckout {
                target,
                countdown_secs: self.config.payment_countdown_secs,
            };
        }

        self.send(request, 1).await
    }

    /// User chose to retry after a failure.
    pub async fn retry(&self) -> SubmitOutcome {
        let attempt = match &*self.state.borrow() {
            SubmissionState::AwaitingRetryDecision { .. } => self.attempts.get() + 1,
            _ => return SubmitOutcome::Ignored,
        };
        let Some(request) = self.pending.borrow_mut().take() else {
            self.set_state(SubmissionState::Idle);
            return SubmitOutcome::Ignored;
        };
        self.send(request, attempt).await
    }

    /// The checkout countdown was dismissed before it navigated.
    /// Returns whether a pending checkout was dropped.
    pub fn cancel_pending(&self) -> bool {
        if !matches!(
            *self.state.borrow(),
            SubmissionState::PaymentRedirectPending { .. }
        ) {
            return false;
        }
        info!("card checkout dismissed");
        self.set_state(SubmissionState::Idle);
        true
    }

    /// User declined to retry.
    pub fn decline_retry(&self) -> SubmitOutcome {
        let error = match &*self.state.borrow() {
            SubmissionState::AwaitingRetryDecision { error } => error.clone(),
            _ => return SubmitOutcome::Ignored,
        };
        self.pending.borrow_mut().take();
        self.ui.error(FINAL_FAILURE_MESSAGE, Some(&error));
        self.set_state(SubmissionState::Failed { error });
        SubmitOutcome::Failed
    }

    async fn send(&self, request: SubmitRequest, attempt: u32) -> SubmitOutcome {
        self.attempts.set(attempt);
        self.set_state(SubmissionState::Submitting { attempt });
        self.ui.set_busy(true);

        let result = self
            .transport
            .post_form(&self.config.submit_endpoint, &request.payload)
            .await;
        self.ui.set_busy(false);

        match result {
            Ok(()) => {
                let mut analytics = request.analytics.clone();
                analytics.duration = Some(self.clock.now_ms() - analytics.start_time);
                match AnalyticsBeacon::form_submission(analytics).to_json() {
                    Ok(body) => {
                        if !self
                            .transport
                            .send_beacon(&self.config.analytics_endpoint, &body)
                        {
                            warn!("analytics beacon was not queued");
                        }
                    }
                    Err(err) => warn!(%err, "analytics beacon not serialisable"),
                }

                self.ui
                    .notify(Toast::success(SUCCESS_MESSAGE).with_timeout(self.config.success_toast_ms));

                let paid_by_card = request.payment_method.as_deref() == Some("Card");
                let redirect = self.config.success_url(paid_by_card).to_owned();
                info!(attempt, %redirect, "subscription submitted");
                self.set_state(SubmissionState::Succeeded {
                    redirect: redirect.clone(),
                });
                SubmitOutcome::Submitted {
                    redirect,
                    delay_ms: self.config.redirect_delay_ms,
                    countdown_secs: self.config.redirect_countdown_secs,
                }
            }
            Err(err) => {
                let error = format!("{err:#}");
                warn!(attempt, %error, "subscription submission failed");
                *self.pending.borrow_mut() = Some(request);
                self.set_state(SubmissionState::AwaitingRetryDecision {
                    error: error.clone(),
                });
                SubmitOutcome::NeedsRetryDecision { error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::tests::ManualClock;
    use crate::toast::ToastKind;
    use anyhow::anyhow;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Post(String),
        Beacon(String, String),
        Toast(ToastKind, String),
        Busy(bool),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct FakeTransport {
        log: Log,
        failures_left: Cell<u32>,
    }

    #[async_trait(?Send)]
    impl SubmissionTransport for FakeTransport {
        async fn post_form(&self, endpoint: &str, _payload: &FormPayload) -> Result<()> {
            self.log.borrow_mut().push(Event::Post(endpoint.to_owned()));
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(anyhow!("HTTP 502"));
            }
            Ok(())
        }

        fn send_beacon(&self, endpoint: &str, body: &str) -> bool {
            self.log
                .borrow_mut()
                .push(Event::Beacon(endpoint.to_owned(), body.to_owned()));
            true
        }
    }

    struct FakeUi {
        log: Log,
    }

    impl Notifier for FakeUi {
        fn notify(&self, toast: Toast) {
            self.log.borrow_mut().push(Event::Toast(toast.kind, toast.message));
        }
    }

    impl SubmitUi for FakeUi {
        fn set_busy(&self, busy: bool) {
            self.log.borrow_mut().push(Event::Busy(busy));
        }
    }

    fn controller(failures: u32) -> (SubmissionController<FakeTransport, FakeUi, Rc<ManualClock>>, Log, Rc<ManualClock>) {
        let log: Log = Rc::default();
        let clock = Rc::new(ManualClock::default());
        clock.advance(1_000.0);
        let c = SubmissionController::new(
            FakeTransport {
                log: log.clone(),
                failures_left: Cell::new(failures),
            },
            FakeUi { log: log.clone() },
            clock.clone(),
            FormConfig::default(),
        );
        (c, log, clock)
    }

    fn request(card: bool, payment_type: &str, method: Option<&str>) -> SubmitRequest {
        let mut payload = FormPayload::default();
        payload.push("full-name", "Kim Namjoon");
        SubmitRequest {
            payload,
            all_fields_valid: true,
            card_payment: card,
            payment_type: payment_type.to_owned(),
            payment_method: method.map(str::to_owned),
            analytics: SubmissionAnalytics {
                timestamp: "2026-10-19T00:00:00.000Z".to_owned(),
                fields_filled: 16,
                validation_errors: 0,
                start_time: 1_000.0,
                duration: None,
            },
        }
    }

    fn posts(log: &Log) -> usize {
        log.borrow().iter().filter(|e| matches!(e, Event::Post(_))).count()
    }

    #[tokio::test]
    async fn card_payment_skips_network_and_targets_plan() {
        for (payment_type, suffix) in [("Installment", "cs_test_installment"), ("Full Payment", "cs_test_full")] {
            let (c, log, _) = controller(0);
            let outcome = c.submit(request(true, payment_type, Some("Card"))).await;
            match outcome {
                SubmitOutcome::CardCheckout { target, countdown_secs } => {
                    assert!(target.ends_with(suffix));
                    assert_eq!(countdown_secs, 5);
                }
                other => panic!("unexpected {other:?}"),
            }
            assert_eq!(posts(&log), 0);
            assert!(matches!(c.state(), SubmissionState::PaymentRedirectPending { .. }));
        }
    }

    #[tokio::test]
    async fn non_card_posts_once_then_beacons_then_toasts() -> anyhow::Result<()> {
        let (c, log, clock) = controller(0);
        clock.advance(250.0);
        let outcome = c.submit(request(false, "Full Payment", Some("Bank Transfer"))).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Submitted {
                redirect: "success.html".to_owned(),
                delay_ms: 2_000,
                countdown_secs: 5,
            }
        );

        let events = log.borrow().clone();
        let post = events.iter().position(|e| matches!(e, Event::Post(_))).unwrap();
        let beacon = events.iter().position(|e| matches!(e, Event::Beacon(..))).unwrap();
        let toast = events
            .iter()
            .position(|e| matches!(e, Event::Toast(ToastKind::Success, _)))
            .unwrap();
        assert_eq!(posts(&log), 1);
        assert!(post < beacon && beacon < toast);
        assert_eq!(events[post], Event::Post("/.netlify/functions/submit-form".to_owned()));

        let Event::Beacon(endpoint, body) = &events[beacon] else { unreachable!() };
        assert_eq!(endpoint, "/analytics");
        let beacon: AnalyticsBeacon = serde_json::from_str(body)?;
        assert_eq!(beacon.kind, "form_submission");
        assert_eq!(beacon.data.duration, Some(250.0));
        assert_eq!(beacon.data.fields_filled, 16);

        assert_eq!(events.first(), Some(&Event::Busy(true)));
        assert!(events.contains(&Event::Busy(false)));
        Ok(())
    }

    #[tokio::test]
    async fn card_method_without_card_checkout_lands_on_card_success_page() {
        let (c, _, _) = controller(0);
        let outcome = c.submit(request(false, "Full Payment", Some("Card"))).await;
        assert!(matches!(outcome, SubmitOutcome::Submitted { redirect, .. } if redirect == "stripe-success.html"));
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_without_network() {
        let (c, log, _) = controller(0);
        let mut req = request(false, "Full Payment", None);
        req.all_fields_valid = false;
        assert_eq!(c.submit(req).await, SubmitOutcome::Rejected);
        assert_eq!(posts(&log), 0);
        assert_eq!(c.state(), SubmissionState::Idle);
        assert!(log
            .borrow()
            .contains(&Event::Toast(ToastKind::Danger, INVALID_FORM_MESSAGE.to_owned())));
    }

    #[tokio::test]
    async fn failure_waits_for_user_then_retry_resubmits() {
        let (c, log, _) = controller(1);
        let outcome = c.submit(request(false, "Full Payment", None)).await;
        assert!(matches!(outcome, SubmitOutcome::NeedsRetryDecision { .. }));
        assert!(matches!(c.state(), SubmissionState::AwaitingRetryDecision { .. }));

        // A second click while the decision is pending is ignored, visibly.
        assert_eq!(c.submit(request(false, "Full Payment", None)).await, SubmitOutcome::Ignored);
        assert_eq!(posts(&log), 1);
        assert!(log
            .borrow()
            .contains(&Event::Toast(ToastKind::Info, ALREADY_PENDING_MESSAGE.to_owned())));

        let outcome = c.retry().await;
        assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
        assert_eq!(posts(&log), 2);
        assert!(matches!(c.state(), SubmissionState::Succeeded { .. }));

        // The prompt closing after the retry went out is not a decline.
        assert_eq!(c.decline_retry(), SubmitOutcome::Ignored);
        assert!(matches!(c.state(), SubmissionState::Succeeded { .. }));
    }

    #[tokio::test]
    async fn dismissed_checkout_unlocks_the_form() {
        let (c, log, _) = controller(0);
        let outcome = c.submit(request(true, "Full Payment", Some("Card"))).await;
        assert!(matches!(outcome, SubmitOutcome::CardCheckout { .. }));

        assert!(c.cancel_pending());
        assert_eq!(c.state(), SubmissionState::Idle);
        assert!(!c.cancel_pending());

        let outcome = c.submit(request(false, "Full Payment", Some("Bank Transfer"))).await;
        assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
        assert_eq!(posts(&log), 1);
    }

    #[tokio::test]
    async fn cancel_leaves_other_states_alone() {
        let (c, _, _) = controller(1);
        assert!(!c.cancel_pending());
        assert_eq!(c.state(), SubmissionState::Idle);

        c.submit(request(false, "Full Payment", None)).await;
        assert!(!c.cancel_pending());
        assert!(matches!(c.state(), SubmissionState::AwaitingRetryDecision { .. }));
    }

    #[tokio::test]
    async fn declining_retry_fails_with_details() {
        let (c, log, _) = controller(1);
        c.submit(request(false, "Full Payment", None)).await;
        assert_eq!(c.decline_retry(), SubmitOutcome::Failed);
        assert!(matches!(c.state(), SubmissionState::Failed { .. }));
        assert!(log.borrow().contains(&Event::Toast(
            ToastKind::Danger,
            format!("{FINAL_FAILURE_MESSAGE} - HTTP 502")
        )));
        assert_eq!(c.retry().await, SubmitOutcome::Ignored);

        // Failed accepts a fresh submit.
        assert!(matches!(
            c.submit(request(false, "Full Payment", None)).await,
            SubmitOutcome::Submitted { .. }
        ));
    }
}
