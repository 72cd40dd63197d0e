//! Animated liquid-fill indicator
//!
//! Native core of a liquid-wave widget:
//! - Wave outline generation for the back and front layers
//! - Phase scheduling with exponential smoothing
//! - Ripple lifecycle (tap and timed spawns, easing, FIFO cap, expiry)
//! - Frame composition and rasterization with fills, mask, and decoration
//! - Cancelable periodic drivers on tokio
//! - Optional Python binding (`python` feature)

pub mod animation;
pub mod color;
pub mod compositor;
pub mod config;
pub mod decoration;
pub mod drawing;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod phase;
pub mod ripple;
pub mod timer;
pub mod view;
pub mod wave;

#[cfg(feature = "python")]
mod python;

pub use color::{Color, ColorStop, FillStyle, LinearGradient};
pub use compositor::{compose, Canvas, Frame};
pub use config::{WaveConfig, WaveConfigBuilder};
pub use decoration::{FloatingDecoration, Sprite};
pub use driver::{Driver, DriverTiming};
pub use error::{ConfigError, Result};
pub use geometry::{Point, Rect, Size};
pub use mask::Mask;
pub use phase::PhaseScheduler;
pub use ripple::{Ripple, RippleLifecycle, MAX_RIPPLES};
pub use view::{LiquidWave, SharedLevel, TeardownHandle};
pub use wave::{Outline, WaveState};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Native liquid-wave component for Python hosts.
#[cfg(feature = "python")]
#[pymodule(name = "_liquidwave")]
fn _liquidwave(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyLiquidWave>()?;
    m.add_function(wrap_pyfunction!(python::wave_outline, m)?)?;

    m.add("MAX_RIPPLES", MAX_RIPPLES)?;
    m.add("BACK_AMPLITUDE_FACTOR", compositor::BACK_AMPLITUDE_FACTOR)?;

    Ok(())
}
