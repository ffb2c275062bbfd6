//! Modal manager.
//!
//! One Bootstrap widget per modal id, created on first show and kept for
//! the page lifetime. Each id owns at most one countdown `Interval`; the
//! registry drops the previous one when a new countdown starts and when
//! the modal's `hidden.bs.modal` event fires.

use gloo_timers::callback::{Interval, Timeout};
use sf_form_core::FormError;
use sf_form_core::countdown::{Countdown, Tick, TimerRegistry};
use sf_form_core::toast::Notifier;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsValue;

use crate::dom;
use crate::toast::ToastReporter;
use crate::widgets::{BsModal, js_error_text};

/// Modals that get the slow-processing watchdog.
const WATCHED_MODALS: [&str; 2] = ["validationModal", "paymentModal"];
const SLOW_MESSAGE: &str =
    "This is taking longer than expected. Please check your connection or try again.";

pub type OnComplete = Box<dyn FnOnce() -> Result<(), JsValue>>;
type OnHidden = Rc<dyn Fn()>;

pub struct CountdownSpec {
    pub seconds: u32,
    pub element_id: String,
    pub on_complete: OnComplete,
}

#[derive(Default)]
pub struct ShowOptions {
    pub countdown: Option<CountdownSpec>,
    /// Static backdrop, no keyboard dismissal.
    pub locked: bool,
}

struct Inner {
    toasts: Rc<ToastReporter>,
    transition_ms: u32,
    spinner_timeout_ms: u32,
    modals: RefCell<HashMap<String, BsModal>>,
    countdowns: RefCell<TimerRegistry<Interval>>,
    transitions: RefCell<TimerRegistry<Timeout>>,
    watchdogs: RefCell<TimerRegistry<Timeout>>,
    hidden_hooks: RefCell<HashMap<String, OnHidden>>,
}

#[derive(Clone)]
pub struct ModalManager {
    inner: Rc<Inner>,
}

impl ModalManager {
    pub fn new(toasts: Rc<ToastReporter>, transition_ms: u32, spinner_timeout_ms: u32) -> Self {
        Self {
            inner: Rc::new(Inner {
                toasts,
                transition_ms,
                spinner_timeout_ms,
                modals: RefCell::default(),
                countdowns: RefCell::new(TimerRegistry::new()),
                transitions: RefCell::new(TimerRegistry::new()),
                watchdogs: RefCell::new(TimerRegistry::new()),
                hidden_hooks: RefCell::default(),
            }),
        }
    }

    fn report(&self, err: FormError) {
        tracing::warn!(%err, "modal");
        self.inner.toasts.error(&err.to_string(), None);
    }

    fn initialize(&self, id: &str, locked: bool) -> Option<BsModal> {
        let Some(el) = dom::by_id(id) else {
            self.report(FormError::missing(format!("Modal {id}")));
            return None;
        };
        let modal = match BsModal::new(id, &el, locked) {
            Ok(modal) => modal,
            Err(err) => {
                self.report(err);
                return None;
            }
        };
        self.inner
            .modals
            .borrow_mut()
            .insert(id.to_owned(), modal.clone());

        let this = self.clone();
        let modal_id = id.to_owned();
        dom::listen(&el, "hidden.bs.modal", move |_| {
            this.cleanup(&modal_id);
            this.run_hidden_hook(&modal_id);
        });
        Some(modal)
    }

    pub fn show(&self, id: &str, options: ShowOptions) {
        let existing = self.inner.modals.borrow().get(id).cloned();
        let Some(modal) = existing.or_else(|| self.initialize(id, options.locked)) else {
            return;
        };
        let Some(el) = dom::by_id(id) else {
            return;
        };

        dom::add_class(&el, "modal-transition-in");
        let transition = Timeout::new(self.inner.transition_ms, move || {
            modal.show();
            dom::remove_class(&el, "modal-transition-in");
        });
        self.inner.transitions.borrow_mut().start(id, transition);

        if let Some(countdown) = options.countdown {
            self.start_countdown(id, countdown);
        }

        if WATCHED_MODALS.contains(&id) {
            self.watch(id);
        }
    }

    /// Run `hook` every time modal `id` finishes hiding, after its
    /// countdown has been cleared.
    pub fn on_hidden(&self, id: &str, hook: impl Fn() + 'static) {
        self.inner
            .hidden_hooks
            .borrow_mut()
            .insert(id.to_owned(), Rc::new(hook));
    }

    fn run_hidden_hook(&self, id: &str) {
        let hook = self.inner.hidden_hooks.borrow().get(id).cloned();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub fn hide(&self, id: &str) {
        if let Some(modal) = self.inner.modals.borrow().get(id) {
            modal.hide();
        }
    }

    /// Drop the countdown for `id`, if any.
    pub fn cleanup(&self, id: &str) {
        let mut countdowns = self.inner.countdowns.borrow_mut();
        if countdowns.clear(id) {
            tracing::debug!(modal = id, active = countdowns.active_count(), "countdown cleared");
        }
    }

    fn start_countdown(&self, id: &str, spec: CountdownSpec) {
        let Some(display) = dom::by_id(&spec.element_id) else {
            self.report(FormError::missing(format!(
                "Countdown element \"{}\"",
                spec.element_id
            )));
            return;
        };

        let mut countdown = Countdown::new(spec.seconds);
        render_tick(&display, countdown.remaining());

        let this = self.clone();
        let modal_id = id.to_owned();
        let on_complete = Cell::new(Some(spec.on_complete));
        let interval = Interval::new(1_000, move || match countdown.tick() {
            Tick::Running(left) => render_tick(&display, left),
            Tick::Finished => {
                render_tick(&display, 0);
                this.cleanup(&modal_id);
                this.hide(&modal_id);
                if let Some(done) = on_complete.take() {
                    if let Err(err) = done() {
                        this.inner.toasts.error(
                            &format!("Error in onComplete callback: {}", js_error_text(&err)),
                            None,
                        );
                    }
                }
            }
        });
        self.inner.countdowns.borrow_mut().start(id, interval);
    }

    fn watch(&self, id: &str) {
        let this = self.clone();
        let modal_id = id.to_owned();
        let watchdog = Timeout::new(self.inner.spinner_timeout_ms, move || {
            let still_open = dom::by_id(&modal_id).is_some_and(|el| dom::has_class(&el, "show"));
            if still_open {
                this.inner.toasts.error(SLOW_MESSAGE, None);
                this.hide(&modal_id);
            }
        });
        self.inner.watchdogs.borrow_mut().start(id, watchdog);
    }
}

fn render_tick(display: &web_sys::Element, seconds: u32) {
    display.set_text_content(Some(&seconds.to_string()));
    let _ = display.set_attribute("aria-live", "assertive");
}
