//! Cancelable fixed-interval timer driven by elapsed time.

#[derive(Clone, Debug)]
pub struct IntervalTimer {
    period: f64,
    accumulated: f64,
    cancelled: bool,
}

impl IntervalTimer {
    /// `period` must already be validated as positive.
    pub fn new(period: f64) -> Self {
        debug_assert!(period > 0.0, "timer period must be positive");
        Self {
            period,
            accumulated: 0.0,
            cancelled: false,
        }
    }

    /// Add `dt` seconds and return how many periods elapsed, along with the
    /// time that has passed since the most recent firing.
    ///
    /// Zero, negative, and non-finite steps are ignored. The firing count
    /// saturates at `u32::MAX`.
    pub fn advance(&mut self, dt: f64) -> (u32, f64) {
        if self.cancelled || !(dt > 0.0 && dt.is_finite()) {
            return (0, 0.0);
        }
        let total = self.accumulated + dt;
        if total < self.period {
            self.accumulated = total;
            return (0, total);
        }
        let fired = (total / self.period).floor() as u32;
        self.accumulated = (total % self.period).max(0.0);
        (fired.max(1), self.accumulated)
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn cancel(&mut self) {
        if !self.cancelled {
            tracing::debug!(period = self.period, "interval timer cancelled");
        }
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
