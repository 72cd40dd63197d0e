//! Easing curves and time-driven transitions.
//!
//! Transitions are advanced explicitly with elapsed seconds; nothing here
//! reads a clock.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Fast start, slow finish (quadratic).
    EaseOut,
    /// Slow start and finish (cubic).
    EaseInOut,
}

impl Easing {
    /// Map linear time `t` in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// A value animating from `from` to `to` over `duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    duration: f64,
    elapsed: f64,
    easing: Easing,
}

impl Transition {
    /// A zero or negative `duration` completes immediately.
    pub fn new(from: f64, to: f64, duration: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// A transition already resting at `value`.
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, 0.0, Easing::Linear)
    }

    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }

    /// Linear fraction of the duration that has passed.
    pub fn fraction(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn value(&self) -> f64 {
        self.from + (self.to - self.from) * self.easing.apply(self.fraction())
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Restart toward `to`, starting from the current value.
    pub fn retarget(&mut self, to: f64, duration: f64) {
        *self = Self::new(self.value(), to, duration, self.easing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-1.0), 0.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
    }

    #[test]
    fn test_ease_out_front_loaded() {
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
        assert!((Easing::EaseOut.apply(0.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ease_in_out_symmetric() {
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
        let a = Easing::EaseInOut.apply(0.2);
        let b = Easing::EaseInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ease_monotonic() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            let mut last = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f64 / 100.0);
                assert!(v >= last);
                last = v;
            }
        }
    }

    #[test]
    fn test_transition_runs_to_target() {
        let mut t = Transition::new(0.0, 1.0, 2.0, Easing::EaseOut);
        t.advance(1.0);
        assert!((t.value() - 0.75).abs() < 1e-12);
        assert!(!t.is_finished());
        t.advance(5.0);
        assert_eq!(t.value(), 1.0);
        assert_eq!(t.elapsed(), 2.0);
        assert!(t.is_finished());
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let t = Transition::new(0.2, 0.8, 0.0, Easing::EaseInOut);
        assert_eq!(t.value(), 0.8);
        assert!(t.is_finished());
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut t = Transition::new(0.0, 1.0, 1.0, Easing::Linear);
        t.advance(0.5);
        t.retarget(0.0, 1.0);
        assert!((t.value() - 0.5).abs() < 1e-12);
        assert_eq!(t.target(), 0.0);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut t = Transition::new(0.0, 1.0, 1.0, Easing::Linear);
        t.advance(0.4);
        t.advance(-1.0);
        assert!((t.fraction() - 0.4).abs() < 1e-12);
    }
}
