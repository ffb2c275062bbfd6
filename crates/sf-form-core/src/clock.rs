/// Millisecond time source. Browsers provide `Date.now()`; tests provide a
/// manual clock.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::Clock;
    use std::cell::Cell;

    #[derive(Default)]
    pub(crate) struct ManualClock(pub Cell<f64>);

    impl ManualClock {
        pub(crate) fn advance(&self, ms: f64) {
            self.0.set(self.0.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> f64 {
            self.0.get()
        }
    }
}
