//! Countdown ticking and the one-timer-per-modal registry.
//!
//! The registry owns timer handles. Handles cancel themselves on drop (as
//! `gloo_timers::callback::Interval` does), so replacing or removing an entry
//! is what stops the old timer.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running(u32),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance one second.
    pub fn tick(&mut self) -> Tick {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Tick::Finished
        } else {
            Tick::Running(self.remaining)
        }
    }
}

#[derive(Debug)]
pub struct TimerRegistry<H> {
    timers: HashMap<String, H>,
}

impl<H> Default for TimerRegistry<H> {
    fn default() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }
}

impl<H> TimerRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `handle` for `id`, dropping any timer previously running for it.
    /// Returns whether an earlier timer was cancelled.
    pub fn start(&mut self, id: &str, handle: H) -> bool {
        let previous = self.timers.insert(id.to_owned(), handle);
        if previous.is_some() {
            tracing::debug!(modal = id, "replaced running countdown");
        }
        previous.is_some()
    }

    /// Drop the timer for `id`. Returns whether one was running.
    pub fn clear(&mut self, id: &str) -> bool {
        self.timers.remove(id).is_some()
    }

    #[cfg(test)]
    fn is_active(&self, id: &str) -> bool {
        self.timers.contains_key(id)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeTimer {
        cancelled: Rc<Cell<u32>>,
    }

    impl Drop for FakeTimer {
        fn drop(&mut self) {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }

    #[test]
    fn countdown_reaches_zero_once() {
        let mut c = Countdown::new(3);
        assert_eq!(c.tick(), Tick::Running(2));
        assert_eq!(c.tick(), Tick::Running(1));
        assert_eq!(c.tick(), Tick::Finished);
        assert_eq!(c.tick(), Tick::Finished);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn second_start_for_same_modal_cancels_the_first() {
        let cancelled = Rc::new(Cell::new(0));
        let mut registry = TimerRegistry::new();

        assert!(!registry.start("paymentModal", FakeTimer { cancelled: cancelled.clone() }));
        assert!(registry.start("paymentModal", FakeTimer { cancelled: cancelled.clone() }));

        assert_eq!(registry.active_count(), 1);
        assert_eq!(cancelled.get(), 1);
    }

    #[test]
    fn timers_for_different_modals_coexist_and_clear_independently() {
        let cancelled = Rc::new(Cell::new(0));
        let mut registry = TimerRegistry::new();
        registry.start("paymentModal", FakeTimer { cancelled: cancelled.clone() });
        registry.start("loadingRedirectModal", FakeTimer { cancelled: cancelled.clone() });
        assert_eq!(registry.active_count(), 2);

        assert!(registry.clear("paymentModal"));
        assert!(!registry.clear("paymentModal"));
        assert!(registry.is_active("loadingRedirectModal"));
        assert_eq!(cancelled.get(), 1);
    }
}
