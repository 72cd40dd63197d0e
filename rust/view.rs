//! The liquid-wave component.
//!
//! [`LiquidWave`] owns all mutable state: displayed level, wave phases, and
//! the ripple collection. Every mutation goes through `tick`, `tap`, and
//! `teardown`, so a single `&mut` (or a single lock around the component)
//! serializes ticks, spawns, and expiries.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::animation::{Easing, Transition};
use crate::compositor::{compose, Canvas, Frame};
use crate::config::WaveConfig;
use crate::error::{surface_dimension, Result};
use crate::geometry::{Point, Size};
use crate::phase::PhaseScheduler;
use crate::ripple::{Ripple, RippleId, RippleLifecycle};
use crate::wave::WaveState;

/// Externally owned fill level shared between the host and the component.
///
/// Cloning yields another handle to the same value. Writes are stored as
/// given; the component clamps on read.
#[derive(Clone, Debug)]
pub struct SharedLevel(Arc<AtomicU64>);

impl SharedLevel {
    pub fn new(level: f64) -> Self {
        Self(Arc::new(AtomicU64::new(level.to_bits())))
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, level: f64) {
        self.0.store(level.to_bits(), Ordering::Release);
    }
}

impl Default for SharedLevel {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Teardown flag shared with whoever drives the component.
///
/// Setting it freezes the component even while another party holds the
/// lock around it.
#[derive(Clone, Debug, Default)]
pub struct TeardownHandle(Arc<AtomicBool>);

impl TeardownHandle {
    pub fn trigger(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clamp into [0, 1]; NaN reads as empty.
pub fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct LiquidWave {
    config: WaveConfig,
    level: SharedLevel,
    /// Last raw value read from the binding.
    bound: f64,
    displayed: Transition,
    phases: PhaseScheduler,
    ripples: RippleLifecycle,
    size: Size,
    torn_down: TeardownHandle,
}

impl LiquidWave {
    /// Build the component. Fails fast on invalid configuration.
    pub fn new(level: SharedLevel, config: WaveConfig, size: Size) -> Result<Self> {
        Self::with_rng(level, config, size, fastrand::Rng::new())
    }

    /// Same as [`LiquidWave::new`] with a deterministic ripple placement seed.
    pub fn with_seed(level: SharedLevel, config: WaveConfig, size: Size, seed: u64) -> Result<Self> {
        Self::with_rng(level, config, size, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(level: SharedLevel, config: WaveConfig, size: Size, rng: fastrand::Rng) -> Result<Self> {
        config.validate()?;
        validate_surface(size)?;
        let bound = level.get();
        let initial = clamp_level(bound);
        if initial != bound {
            tracing::warn!(level = bound, clamped = initial, "level out of range, clamping");
        }
        Ok(Self {
            ripples: RippleLifecycle::new(config.ripple_settings(), rng),
            displayed: Transition::new(initial, initial, 0.0, Easing::EaseInOut),
            phases: PhaseScheduler::new(),
            bound,
            level,
            config,
            size,
            torn_down: TeardownHandle::default(),
        })
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn level_handle(&self) -> &SharedLevel {
        &self.level
    }

    /// Level currently drawn, which trails the binding while easing.
    pub fn level(&self) -> f64 {
        self.displayed.value()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn phases(&self) -> &PhaseScheduler {
        &self.phases
    }

    pub fn state(&self) -> WaveState {
        WaveState {
            level: self.level(),
            amplitude: self.config.wave_amplitude,
            phase_front: self.phases.front(),
            phase_back: self.phases.back(),
        }
    }

    pub fn ripples(&self) -> impl Iterator<Item = &Ripple> {
        self.ripples.iter()
    }

    pub fn ripple_count(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.is_triggered()
    }

    /// Flag that tears the component down without taking its lock.
    pub fn teardown_handle(&self) -> TeardownHandle {
        self.torn_down.clone()
    }

    /// Pick up a new value from the level binding and ease toward it.
    fn sync_level(&mut self) {
        let raw = self.level.get();
        if raw.to_bits() == self.bound.to_bits() {
            return;
        }
        self.bound = raw;
        let target = clamp_level(raw);
        if target != raw {
            tracing::warn!(level = raw, clamped = target, "level out of range, clamping");
        }
        if target != self.displayed.target() {
            self.displayed.retarget(target, self.config.level_transition);
        }
    }

    /// Wave driver step: level easing, phase tick, ripple progress and expiry.
    pub fn tick_wave(&mut self, dt: f64) {
        if self.is_torn_down() || !accept_dt(dt) {
            return;
        }
        self.sync_level();
        self.displayed.advance(dt);
        self.phases.tick(dt);
        self.ripples.advance(dt);
    }

    /// Ripple driver step: one automatic ripple in the air above the fill.
    pub fn tick_auto_spawn(&mut self) -> Option<RippleId> {
        if self.is_torn_down() {
            return None;
        }
        let level = self.level();
        self.ripples.tick_auto_spawn(self.size, level)
    }

    /// Run both drivers from a single host clock: one wave tick, then
    /// `dt` seconds on the auto-ripple interval timer.
    pub fn tick(&mut self, dt: f64) {
        if self.is_torn_down() || !accept_dt(dt) {
            return;
        }
        self.tick_wave(dt);
        let level = self.level();
        self.ripples.advance_auto_timer(dt, self.size, level);
    }

    /// Pointer tap at `point`. Ignored unless tap ripples are enabled.
    pub fn tap(&mut self, point: Point) -> Option<RippleId> {
        if self.is_torn_down() || !self.config.tap_ripple_enabled {
            return None;
        }
        self.ripples.spawn_at(point)
    }

    /// Host surface resized. Negative or non-finite sizes are rejected; a
    /// zero side renders an empty frame.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        validate_surface(size)?;
        self.size = size;
        Ok(())
    }

    pub fn frame(&self) -> Frame<'_> {
        compose(&self.state(), self.ripples.iter(), &self.config, self.size)
    }

    pub fn render(&self, canvas: &mut Canvas) {
        canvas.render(&self.frame());
    }

    /// Cancel both drivers. Every later mutation is a no-op.
    pub fn teardown(&mut self) {
        if self.phases.is_cancelled() {
            return;
        }
        self.torn_down.trigger();
        self.phases.cancel();
        self.ripples.cancel();
        tracing::info!(ripples = self.ripples.len(), "liquid wave torn down");
    }
}

fn validate_surface(size: Size) -> Result<()> {
    surface_dimension("surface width", size.width)?;
    surface_dimension("surface height", size.height)?;
    Ok(())
}

/// Negative steps are dropped silently; non-finite ones are logged.
fn accept_dt(dt: f64) -> bool {
    if !dt.is_finite() {
        tracing::warn!(dt, "ignoring non-finite tick");
        return false;
    }
    dt >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WaveConfig;
    use crate::error::ConfigError;
    use crate::ripple::MAX_RIPPLES;

    const SURFACE: Size = Size::new(200.0, 100.0);

    fn wave(level: f64, config: WaveConfig) -> LiquidWave {
        LiquidWave::with_seed(SharedLevel::new(level), config, SURFACE, 42).unwrap()
    }

    #[test]
    fn test_initialization() {
        let view = wave(0.5, WaveConfig::default());
        assert_eq!(view.level(), 0.5);
        assert_eq!(view.level_handle().get(), 0.5);
        assert_eq!(view.ripple_count(), 0);
        let state = view.state();
        assert_eq!(state.amplitude, 0.04);
        assert_eq!((state.phase_front, state.phase_back), (0.0, 0.0));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = WaveConfig {
            ripple_interval: 0.0,
            ..WaveConfig::default()
        };
        let err = LiquidWave::new(SharedLevel::new(0.5), config, SURFACE).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveDuration { name: "ripple_interval", .. }));
    }

    #[test]
    fn test_out_of_range_level_clamped() {
        assert_eq!(wave(1.5, WaveConfig::default()).level(), 1.0);
        assert_eq!(wave(-0.5, WaveConfig::default()).level(), 0.0);
        assert_eq!(wave(f64::NAN, WaveConfig::default()).level(), 0.0);
    }

    #[test]
    fn test_level_binding_eases() {
        let mut view = wave(0.2, WaveConfig::default());
        view.level_handle().set(0.8);
        view.tick(0.15);
        let halfway = view.level();
        assert!((halfway - 0.5).abs() < 1e-9);
        view.tick(0.15);
        assert!((view.level() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_level_binding_immediate_without_transition() {
        let config = WaveConfig::builder().level_transition(0.0).build().unwrap();
        let mut view = wave(0.2, config);
        view.level_handle().set(2.0);
        view.tick(0.016);
        assert_eq!(view.level(), 1.0);
    }

    #[test]
    fn test_tick_drives_phases() {
        let mut view = wave(0.5, WaveConfig::default());
        for _ in 0..10 {
            view.tick(0.016);
        }
        assert!((view.phases().target().front - 0.5).abs() < 1e-9);
        assert!(view.state().phase_front > view.state().phase_back);
    }

    #[test]
    fn test_auto_ripple_after_interval() {
        let config = WaveConfig::builder()
            .ripple_interval(3.0)
            .tap_ripple_enabled(false)
            .auto_ripple_enabled(true)
            .build()
            .unwrap();
        let mut view = wave(0.5, config);
        let mut elapsed = 0.0;
        while elapsed < 3.0 {
            view.tick(0.016);
            elapsed += 0.016;
        }
        assert_eq!(view.ripple_count(), 1);
        let ripple = view.ripples().next().unwrap();
        assert!(ripple.progress() > 0.0);
        assert!(ripple.origin().y <= 50.0);
    }

    #[test]
    fn test_no_auto_ripple_when_disabled() {
        let config = WaveConfig::builder().auto_ripple_enabled(false).build().unwrap();
        let mut view = wave(0.5, config);
        for _ in 0..500 {
            view.tick(0.016);
        }
        assert_eq!(view.ripple_count(), 0);
        assert_eq!(view.tick_auto_spawn(), None);
    }

    #[test]
    fn test_tap_respects_toggle() {
        let mut view = wave(0.5, WaveConfig::default());
        assert!(view.tap(Point::new(10.0, 10.0)).is_some());

        let config = WaveConfig::builder().tap_ripple_enabled(false).build().unwrap();
        let mut view = wave(0.5, config);
        assert_eq!(view.tap(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_rapid_taps_keep_last_ten() {
        let mut view = wave(0.5, WaveConfig::default());
        let ids: Vec<_> = (0..12)
            .map(|i| view.tap(Point::new(i as f64, 0.0)).unwrap())
            .collect();
        assert_eq!(view.ripple_count(), MAX_RIPPLES);
        let live: Vec<_> = view.ripples().map(Ripple::id).collect();
        assert_eq!(live, ids[2..]);
    }

    #[test]
    fn test_taps_interleaved_with_expiry() {
        let mut view = wave(0.5, WaveConfig::builder().auto_ripple_enabled(false).build().unwrap());
        for i in 0..40 {
            view.tap(Point::new(i as f64, 0.0));
            view.tick(0.25);
            assert!(view.ripple_count() <= MAX_RIPPLES);
        }
        // Duration 2.0s at 0.25s per tap leaves seven alive after each tick
        assert_eq!(view.ripple_count(), 7);
    }

    #[test]
    fn test_teardown_stops_mutation() {
        let mut view = wave(0.5, WaveConfig::default());
        view.tap(Point::new(5.0, 5.0));
        view.tick(0.016);
        view.teardown();

        let state = view.state();
        let ripples: Vec<_> = view.ripples().cloned().collect();
        view.level_handle().set(0.9);
        for _ in 0..400 {
            view.tick(0.016);
        }
        assert_eq!(view.tap(Point::new(1.0, 1.0)), None);
        assert_eq!(view.tick_auto_spawn(), None);
        assert_eq!(view.state(), state);
        assert_eq!(view.ripples().cloned().collect::<Vec<_>>(), ripples);
        assert!(view.is_torn_down());
    }

    #[test]
    fn test_resize_validates() {
        let mut view = wave(0.5, WaveConfig::default());
        assert!(view.resize(Size::new(-1.0, 10.0)).is_err());
        assert!(view.resize(Size::new(f64::INFINITY, 10.0)).is_err());
        assert_eq!(view.size(), SURFACE);

        view.resize(Size::new(300.0, 150.0)).unwrap();
        assert_eq!(view.size(), Size::new(300.0, 150.0));
        assert_eq!(view.frame().size, Size::new(300.0, 150.0));

        view.resize(Size::new(0.0, 150.0)).unwrap();
        assert!(view.frame().front.outline.is_empty());
    }

    #[test]
    fn test_rejects_invalid_surface() {
        for size in [
            Size::new(-5.0, f64::NAN),
            Size::new(f64::INFINITY, 100.0),
            Size::new(100.0, -1.0),
        ] {
            let err = LiquidWave::new(SharedLevel::new(0.5), WaveConfig::default(), size).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidDimension { .. }));
        }
        assert!(LiquidWave::new(SharedLevel::new(0.5), WaveConfig::default(), Size::new(0.0, 0.0)).is_ok());
    }

    #[test]
    fn test_non_finite_tick_ignored() {
        let mut view = wave(0.5, WaveConfig::default());
        view.tap(Point::new(10.0, 10.0));
        view.tick(0.5);
        let state = view.state();
        let ripples: Vec<_> = view.ripples().cloned().collect();

        view.tick(f64::INFINITY);
        view.tick(f64::NAN);
        view.tick(f64::NEG_INFINITY);
        assert_eq!(view.state(), state);
        assert_eq!(view.ripples().cloned().collect::<Vec<_>>(), ripples);
    }

    #[test]
    fn test_auto_ripples_resume_after_nan_tick() {
        let config = WaveConfig::builder().tap_ripple_enabled(false).build().unwrap();
        let mut view = wave(0.5, config);
        view.tick(f64::NAN);
        for _ in 0..200 {
            view.tick(0.016);
        }
        assert_eq!(view.ripple_count(), 1);
    }

    #[test]
    fn test_huge_tick_expires_and_returns() {
        let mut view = wave(0.5, WaveConfig::default());
        view.tap(Point::new(10.0, 10.0));
        view.tick(1e300);
        // The tap is long expired; only the latest auto firing can survive
        assert!(view.ripple_count() <= 1);
        assert!(view.ripples().all(|r| r.id() != 0));
        assert!((view.level() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_teardown_handle_freezes_without_lock() {
        let mut view = wave(0.5, WaveConfig::default());
        let handle = view.teardown_handle();
        view.tick(0.016);
        handle.trigger();

        let state = view.state();
        view.tick(1.0);
        assert_eq!(view.tap(Point::new(1.0, 1.0)), None);
        assert_eq!(view.state(), state);
        assert!(view.is_torn_down());

        view.teardown();
        assert!(view.phases().is_cancelled());
    }

    #[test]
    fn test_render_into_canvas() {
        let view = wave(0.5, WaveConfig::default());
        let mut canvas = Canvas::new(0, 0);
        view.render(&mut canvas);
        assert_eq!((canvas.width(), canvas.height()), (200, 100));
        assert_eq!(canvas.pixel(1, 100)[3], 0.0);
        assert!(canvas.pixel(99, 100)[3] > 0.9);
    }
}
