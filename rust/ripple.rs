//! Ripple lifecycle: spawning, easing, and expiry of expanding circles.
//!
//! Ripples live in a FIFO capped at [`MAX_RIPPLES`]. Spawning into a full
//! collection evicts the oldest entry first. Each ripple's progress eases
//! from 0 to 1 over the configured duration and the ripple is dropped at
//! the tick where its age reaches that duration.

use std::collections::VecDeque;

use crate::animation::{Easing, Transition};
use crate::color::Color;
use crate::geometry::{Point, Size};
use crate::timer::IntervalTimer;
use crate::wave::mid_y;

/// Upper bound on concurrently live ripples.
pub const MAX_RIPPLES: usize = 10;

pub type RippleId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct Ripple {
    id: RippleId,
    origin: Point,
    color: Color,
    transition: Transition,
}

impl Ripple {
    fn new(id: RippleId, origin: Point, color: Color, duration: f64) -> Self {
        Self {
            id,
            origin,
            color,
            transition: Transition::new(0.0, 1.0, duration, Easing::EaseOut),
        }
    }

    pub fn id(&self) -> RippleId {
        self.id
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Eased progress in [0, 1].
    pub fn progress(&self) -> f64 {
        self.transition.value()
    }

    /// Seconds since spawn.
    pub fn age(&self) -> f64 {
        self.transition.elapsed()
    }

    /// Rendered opacity: fades linearly with progress.
    pub fn opacity(&self, base_opacity: f64) -> f64 {
        ripple_opacity(base_opacity, self.progress())
    }

    pub fn radius(&self, max_diameter: f64) -> f64 {
        ripple_radius(max_diameter, self.progress())
    }
}

#[inline]
pub fn ripple_opacity(base_opacity: f64, progress: f64) -> f64 {
    base_opacity * (1.0 - progress)
}

#[inline]
pub fn ripple_radius(max_diameter: f64, progress: f64) -> f64 {
    progress * max_diameter / 2.0
}

/// Settings the lifecycle needs; validated by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleSettings {
    pub color: Color,
    pub duration: f64,
    pub interval: f64,
    pub auto_enabled: bool,
}

#[derive(Debug)]
pub struct RippleLifecycle {
    ripples: VecDeque<Ripple>,
    next_id: RippleId,
    settings: RippleSettings,
    auto_timer: IntervalTimer,
    rng: fastrand::Rng,
    cancelled: bool,
}

impl RippleLifecycle {
    pub fn new(settings: RippleSettings, rng: fastrand::Rng) -> Self {
        Self {
            ripples: VecDeque::with_capacity(MAX_RIPPLES),
            next_id: 0,
            auto_timer: IntervalTimer::new(settings.interval),
            settings,
            rng,
            cancelled: false,
        }
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    /// Live ripples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Ripple> {
        self.ripples.iter()
    }

    /// Owned copy of the live ripples for drawing.
    pub fn snapshot(&self) -> Vec<Ripple> {
        self.ripples.iter().cloned().collect()
    }

    /// Spawn a ripple centred on `point`. Returns `None` once cancelled.
    pub fn spawn_at(&mut self, point: Point) -> Option<RippleId> {
        self.spawn_aged(point, 0.0)
    }

    fn spawn_aged(&mut self, point: Point, age: f64) -> Option<RippleId> {
        if self.cancelled {
            return None;
        }
        if self.ripples.len() >= MAX_RIPPLES {
            if let Some(evicted) = self.ripples.pop_front() {
                tracing::debug!(id = evicted.id, "ripple evicted at capacity");
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        let mut ripple = Ripple::new(id, point, self.settings.color, self.settings.duration);
        ripple.transition.advance(age);
        self.ripples.push_back(ripple);

        tracing::debug!(id, x = point.x, y = point.y, live = self.ripples.len(), "ripple spawned");
        Some(id)
    }

    /// Progress every live ripple by `dt` seconds and drop the finished ones.
    pub fn advance(&mut self, dt: f64) {
        if self.cancelled {
            return;
        }
        for ripple in self.ripples.iter_mut() {
            ripple.transition.advance(dt);
        }
        self.ripples.retain(|ripple| {
            let done = ripple.transition.is_finished();
            if done {
                tracing::debug!(id = ripple.id, "ripple expired");
            }
            !done
        });
    }

    /// Pick a uniformly random point in the air region above the fill.
    pub fn random_air_point(&mut self, surface: Size, level: f64) -> Point {
        let air = mid_y(level.clamp(0.0, 1.0), surface.height).max(0.0);
        Point::new(
            self.rng.f64() * surface.width.max(0.0),
            self.rng.f64() * air,
        )
    }

    /// One auto-spawn firing, if auto ripples are enabled.
    pub fn tick_auto_spawn(&mut self, surface: Size, level: f64) -> Option<RippleId> {
        self.auto_spawn_aged(surface, level, 0.0)
    }

    fn auto_spawn_aged(&mut self, surface: Size, level: f64, age: f64) -> Option<RippleId> {
        if !self.settings.auto_enabled || self.cancelled || surface.is_empty() {
            return None;
        }
        let point = self.random_air_point(surface, level);
        self.spawn_aged(point, age)
    }

    /// Feed `dt` seconds into the auto-spawn interval timer and spawn once per
    /// elapsed interval. Ripples spawned late within a tick are aged by the
    /// overshoot so their expiry stays on the interval grid.
    pub fn advance_auto_timer(&mut self, dt: f64, surface: Size, level: f64) -> usize {
        if !self.settings.auto_enabled {
            return 0;
        }
        let (fired, since) = self.auto_timer.advance(dt);
        let period = self.auto_timer.period();
        // Only the newest firings can still be alive or fit in the collection
        let alive = ((self.settings.duration - since) / period).ceil().max(0.0) as u32;
        let newest = fired.min(alive).min(MAX_RIPPLES as u32);
        let mut spawned = 0;
        for k in (0..newest).rev() {
            let age = since + f64::from(k) * period;
            if age >= self.settings.duration {
                continue;
            }
            if self.auto_spawn_aged(surface, level, age).is_some() {
                spawned += 1;
            }
        }
        spawned
    }

    /// Stop the auto-spawn timer and freeze the collection.
    pub fn cancel(&mut self) {
        self.auto_timer.cancel();
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
