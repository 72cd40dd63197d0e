//! Phase scheduler for the two wave layers.
//!
//! Each call to [`PhaseScheduler::tick`] bumps both targets by a fixed
//! increment and moves the visible phases a constant fraction of the way
//! toward them. Increments are per tick, not per second: animation speed
//! follows the host's tick rate.

/// Target increment per tick for the front layer (radians).
pub const FRONT_STEP: f64 = 0.05;
/// Target increment per tick for the back layer (radians).
pub const BACK_STEP: f64 = 0.03;
/// Fraction of the remaining distance covered per tick.
pub const SMOOTHING: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseTarget {
    pub front: f64,
    pub back: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PhaseScheduler {
    front: f64,
    back: f64,
    target: PhaseTarget,
    cancelled: bool,
}

#[inline]
fn smooth(current: f64, target: f64) -> f64 {
    current + (target - current) * SMOOTHING
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick. `_dt` is accepted for symmetry with the other
    /// tick-driven components; the increments ignore it.
    pub fn tick(&mut self, _dt: f64) {
        if self.cancelled {
            return;
        }
        self.target.front += FRONT_STEP;
        self.target.back += BACK_STEP;
        self.front = smooth(self.front, self.target.front);
        self.back = smooth(self.back, self.target.back);
        tracing::trace!(front = self.front, back = self.back, "phase tick");
    }

    /// Stop responding to ticks. Phases freeze at their current values.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn front(&self) -> f64 {
        self.front
    }

    pub fn back(&self) -> f64 {
        self.back
    }

    pub fn target(&self) -> PhaseTarget {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_grow_per_tick() {
        let mut sched = PhaseScheduler::new();
        for _ in 0..100 {
            sched.tick(0.016);
        }
        assert!((sched.target().front - 0.05 * 100.0).abs() < 1e-9);
        assert!((sched.target().back - 0.03 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_increments_ignore_dt() {
        let mut a = PhaseScheduler::new();
        let mut b = PhaseScheduler::new();
        a.tick(0.001);
        b.tick(5.0);
        assert_eq!(a.front(), b.front());
        assert_eq!(a.target(), b.target());
    }

    #[test]
    fn test_first_tick_smoothing() {
        let mut sched = PhaseScheduler::new();
        sched.tick(0.016);
        assert!((sched.front() - 0.005).abs() < 1e-12);
        assert!((sched.back() - 0.003).abs() < 1e-12);
    }

    #[test]
    fn test_phase_converges_on_fixed_target() {
        // Smoothing alone against a fixed target: distance shrinks by 0.9 per tick,
        // so 45 ticks leave under 1% of the gap.
        let target = 1.0;
        let mut phase = 0.0;
        for _ in 0..45 {
            phase = smooth(phase, target);
        }
        assert!((target - phase).abs() < 0.01 * target);
    }

    #[test]
    fn test_phase_lags_moving_target_by_bounded_amount() {
        // With a target moving 0.05 per tick the steady-state lag is 0.05 * 0.9 / 0.1.
        let mut sched = PhaseScheduler::new();
        for _ in 0..200 {
            sched.tick(0.016);
        }
        let lag = sched.target().front - sched.front();
        assert!((lag - 0.45).abs() < 1e-3);
    }

    #[test]
    fn test_front_outpaces_back() {
        let mut sched = PhaseScheduler::new();
        for _ in 0..10 {
            sched.tick(0.016);
        }
        assert!(sched.front() > sched.back());
    }

    #[test]
    fn test_cancel_freezes_phase() {
        let mut sched = PhaseScheduler::new();
        sched.tick(0.016);
        sched.cancel();
        let before = (sched.front(), sched.back(), sched.target());
        sched.tick(0.016);
        assert_eq!(before, (sched.front(), sched.back(), sched.target()));
        assert!(sched.is_cancelled());
    }
}
