//! Periodic drivers on a tokio runtime.
//!
//! Two independent interval tasks share one lock around the component:
//! the wave tick (every `tick_interval`) and the auto-ripple spawn (every
//! `ripple_interval`, only when auto ripples are enabled). Taps from the
//! host take the same lock, so tick, spawn, and expiry never interleave.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::config::WaveConfig;
use crate::error::{period, Result};
use crate::view::{LiquidWave, TeardownHandle};

/// Periods for the two drivers, captured from the configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverTiming {
    pub tick: Duration,
    /// `None` when auto ripples are disabled.
    pub ripple: Option<Duration>,
}

impl DriverTiming {
    /// Fails on periods that are not positive, round to zero nanoseconds,
    /// or overflow `Duration`.
    pub fn from_config(config: &WaveConfig) -> Result<Self> {
        let tick = period("tick_interval", config.tick_interval)?;
        let ripple = if config.auto_ripple_enabled {
            Some(period("ripple_interval", config.ripple_interval)?)
        } else {
            None
        };
        Ok(Self { tick, ripple })
    }
}

#[derive(Debug)]
pub struct Driver {
    view: Arc<Mutex<LiquidWave>>,
    teardown: TeardownHandle,
    wave_task: Option<JoinHandle<()>>,
    ripple_task: Option<JoinHandle<()>>,
}

impl Driver {
    /// Take ownership of `view` and start its drivers on `handle`.
    pub fn spawn(view: LiquidWave, handle: &Handle) -> Result<Self> {
        let timing = DriverTiming::from_config(view.config())?;
        let teardown = view.teardown_handle();
        Ok(Self::start(Arc::new(Mutex::new(view)), teardown, timing, handle))
    }

    /// Start drivers for a component that is already shared. `teardown`
    /// must come from the same component.
    pub fn start(
        view: Arc<Mutex<LiquidWave>>,
        teardown: TeardownHandle,
        timing: DriverTiming,
        handle: &Handle,
    ) -> Self {
        let wave_task = handle.spawn(run_wave(view.clone(), timing.tick));
        let ripple_task = timing
            .ripple
            .map(|every| handle.spawn(run_ripples(view.clone(), every)));

        tracing::info!(
            tick_ms = timing.tick.as_millis() as u64,
            ripple_ms = timing.ripple.map(|p| p.as_millis() as u64),
            "liquid wave drivers started"
        );

        Self {
            view,
            teardown,
            wave_task: Some(wave_task),
            ripple_task,
        }
    }

    /// Shared handle to the component, for taps, resizes, and rendering.
    pub fn view(&self) -> Arc<Mutex<LiquidWave>> {
        self.view.clone()
    }

    pub fn is_running(&self) -> bool {
        self.wave_task.is_some()
    }

    fn abort_tasks(&mut self) {
        for task in [self.wave_task.take(), self.ripple_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }

    /// Cancel both drivers and tear the component down.
    pub async fn teardown(&mut self) {
        self.abort_tasks();
        self.teardown.trigger();
        self.view.lock().await.teardown();
        tracing::info!("liquid wave drivers stopped");
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.abort_tasks();
        // The flag freezes the component even if the host holds the lock
        self.teardown.trigger();
        if let Ok(mut view) = self.view.try_lock() {
            view.teardown();
        }
    }
}

async fn run_wave(view: Arc<Mutex<LiquidWave>>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();
    loop {
        ticker.tick().await;
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        let mut view = view.lock().await;
        if view.is_torn_down() {
            return;
        }
        view.tick_wave(dt);
    }
}

async fn run_ripples(view: Arc<Mutex<LiquidWave>>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately; ripples start one period in
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let mut view = view.lock().await;
        if view.is_torn_down() {
            return;
        }
        view.tick_auto_spawn();
    }
}
