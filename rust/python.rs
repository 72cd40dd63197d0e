//! Python host binding.
//!
//! Exposes the component as `LiquidWave`. The host either calls `tick`
//! from its own frame loop or calls `start` to run the drivers on the
//! shared tokio runtime, then renders into a numpy array each frame.

use std::sync::Arc;

use numpy::{PyArray3, PyArrayMethods, PyReadonlyArray2, PyReadonlyArray3, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tokio::sync::Mutex;

use crate::color::{Color, FillStyle, LinearGradient};
use crate::compositor::Canvas;
use crate::config::WaveConfig;
use crate::decoration::{FloatingDecoration, Sprite};
use crate::driver::{Driver, DriverTiming};
use crate::geometry::{Point, Size};
use crate::mask::Mask;
use crate::view::{LiquidWave, SharedLevel, TeardownHandle};
use crate::wave;

type Rgb = (f64, f64, f64);

fn color((r, g, b): Rgb) -> Color {
    Color::rgb(r, g, b)
}

fn fill(solid: Option<Rgb>, gradient: Option<Vec<Rgb>>) -> PyResult<Option<FillStyle>> {
    if let Some(stops) = gradient {
        let colors: Vec<Color> = stops.into_iter().map(color).collect();
        return Ok(Some(LinearGradient::vertical(&colors)?.into()));
    }
    Ok(solid.map(|c| FillStyle::Solid(color(c))))
}

fn mask_from(alpha: PyReadonlyArray2<'_, f64>) -> PyResult<Mask> {
    let arr = alpha.as_array();
    let (h, w) = (arr.shape()[0], arr.shape()[1]);
    Ok(Mask::new(w, h, arr.iter().copied().collect())?)
}

fn sprite_from(rgba: PyReadonlyArray3<'_, f64>) -> PyResult<Sprite> {
    let arr = rgba.as_array();
    let shape = arr.shape();
    if shape[2] != 4 {
        return Err(PyValueError::new_err("sprite must have 4 channels (RGBA)"));
    }
    Ok(Sprite::new(shape[1], shape[0], arr.iter().copied().collect())?)
}

/// Animated liquid-fill indicator.
#[pyclass(name = "LiquidWave")]
pub struct PyLiquidWave {
    view: Arc<Mutex<LiquidWave>>,
    level: SharedLevel,
    teardown: TeardownHandle,
    timing: DriverTiming,
    driver: Option<Driver>,
    canvas: Canvas,
}

#[pymethods]
impl PyLiquidWave {
    /// Create the component.
    ///
    /// Args:
    ///     level: Initial fill fraction (clamped to 0..1)
    ///     width, height: Drawing surface size
    ///     front_color / back_color: Solid RGB fills
    ///     front_gradient / back_gradient: Top-to-bottom RGB stops, override solids
    ///     mask: Optional (h, w) alpha array
    ///     decoration: Optional (h, w, 4) RGBA sprite floating on the surface
    ///     floating_decoration: Place a decoration even without a sprite; the
    ///         host reads its rectangle from `decoration_rect`
    #[new]
    #[pyo3(signature = (
        level=0.5,
        width=100.0,
        height=100.0,
        front_color=None,
        back_color=None,
        front_gradient=None,
        back_gradient=None,
        mask=None,
        decoration=None,
        decoration_size=(50.0, 50.0),
        decoration_amplitude=10.0,
        floating_decoration=false,
        auto_ripple_enabled=true,
        tap_ripple_enabled=true,
        ripple_color=(1.0, 1.0, 1.0),
        ripple_size=100.0,
        ripple_opacity=0.5,
        ripple_duration=2.0,
        ripple_interval=3.0,
        wave_height=0.04,
        wave_speed=0.016,
        level_transition=0.3,
        ripple_stroke_width=2.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        level: f64,
        width: f64,
        height: f64,
        front_color: Option<Rgb>,
        back_color: Option<Rgb>,
        front_gradient: Option<Vec<Rgb>>,
        back_gradient: Option<Vec<Rgb>>,
        mask: Option<PyReadonlyArray2<'_, f64>>,
        decoration: Option<PyReadonlyArray3<'_, f64>>,
        decoration_size: (f64, f64),
        decoration_amplitude: f64,
        floating_decoration: bool,
        auto_ripple_enabled: bool,
        tap_ripple_enabled: bool,
        ripple_color: Rgb,
        ripple_size: f64,
        ripple_opacity: f64,
        ripple_duration: f64,
        ripple_interval: f64,
        wave_height: f64,
        wave_speed: f64,
        level_transition: f64,
        ripple_stroke_width: f64,
    ) -> PyResult<Self> {
        let mut config = WaveConfig {
            auto_ripple_enabled,
            tap_ripple_enabled,
            ripple_color: color(ripple_color),
            ripple_max_diameter: ripple_size,
            ripple_opacity,
            ripple_duration,
            ripple_interval,
            wave_amplitude: wave_height,
            tick_interval: wave_speed,
            level_transition,
            ripple_stroke_width,
            ..WaveConfig::default()
        };
        if let Some(front) = fill(front_color, front_gradient)? {
            config.front_fill = front;
        }
        if let Some(back) = fill(back_color, back_gradient)? {
            config.back_fill = back;
        }
        config.mask = mask.map(mask_from).transpose()?;
        let sprite = decoration.map(sprite_from).transpose()?;
        if sprite.is_some() || floating_decoration {
            config.decoration = Some(FloatingDecoration {
                size: Size::new(decoration_size.0, decoration_size.1),
                amplitude: decoration_amplitude,
                sprite,
            });
        }

        let shared = SharedLevel::new(level);
        // Validates the config before any period is converted
        let view = LiquidWave::new(shared.clone(), config, Size::new(width, height))?;
        let timing = DriverTiming::from_config(view.config())?;
        let teardown = view.teardown_handle();

        Ok(Self {
            view: Arc::new(Mutex::new(view)),
            level: shared,
            teardown,
            timing,
            driver: None,
            canvas: Canvas::default(),
        })
    }

    /// Bound fill level (writes are clamped when read by the component).
    #[getter]
    fn level(&self) -> f64 {
        self.level.get()
    }

    #[setter]
    fn set_level(&self, level: f64) {
        self.level.set(level);
    }

    /// Level currently drawn, trailing `level` while it eases.
    #[getter]
    fn displayed_level(&self) -> f64 {
        self.view.blocking_lock().level()
    }

    /// Decoration bounding box as (x, y, width, height), or None.
    #[getter]
    fn decoration_rect(&self) -> Option<(f64, f64, f64, f64)> {
        let view = self.view.blocking_lock();
        let rect = view.frame().decoration.map(|d| d.rect);
        rect.map(|r| (r.origin.x, r.origin.y, r.size.width, r.size.height))
    }

    #[getter]
    fn ripple_count(&self) -> usize {
        self.view.blocking_lock().ripple_count()
    }

    /// Advance both drivers by `dt` seconds from the host's clock.
    fn tick(&self, dt: f64) {
        self.view.blocking_lock().tick(dt);
    }

    /// Pointer tap. Returns the new ripple id, or None when taps are off.
    fn tap(&self, x: f64, y: f64) -> Option<u64> {
        self.view.blocking_lock().tap(Point::new(x, y))
    }

    fn resize(&self, width: f64, height: f64) -> PyResult<()> {
        Ok(self.view.blocking_lock().resize(Size::new(width, height))?)
    }

    /// Run the wave and auto-ripple drivers on the shared tokio runtime.
    fn start(&mut self) {
        if self.driver.is_some() {
            return;
        }
        let runtime = pyo3_async_runtimes::tokio::get_runtime();
        self.driver = Some(Driver::start(
            self.view.clone(),
            self.teardown.clone(),
            self.timing,
            runtime.handle(),
        ));
    }

    /// Stop both drivers and freeze the component.
    fn teardown(&mut self) {
        match self.driver.take() {
            Some(mut driver) => {
                pyo3_async_runtimes::tokio::get_runtime().block_on(driver.teardown());
            }
            None => self.view.blocking_lock().teardown(),
        }
    }

    /// Draw the current frame into `matrix` of shape (height, width, 4).
    fn render<'py>(&mut self, matrix: &Bound<'py, PyArray3<f64>>) -> PyResult<()> {
        {
            let view = self.view.blocking_lock();
            view.render(&mut self.canvas);
        }

        let shape = matrix.shape();
        let (h, w) = (self.canvas.height(), self.canvas.width());
        if shape[0] != h || shape[1] != w || shape[2] != 4 {
            return Err(PyValueError::new_err(format!(
                "matrix has shape {:?}, expected ({}, {}, 4)",
                shape, h, w
            )));
        }

        let src = self.canvas.as_slice();
        // SAFETY: We have exclusive write access to matrix through PyO3's borrow rules
        unsafe {
            let mut array = matrix.as_array_mut();
            for row in 0..h {
                for col in 0..w {
                    let i = (row * w + col) * 4;
                    for c in 0..4 {
                        array[[row, col, c]] = src[i + c];
                    }
                }
            }
        }
        Ok(())
    }

    /// Draw and flatten against a background into `output` of shape (height, width, 3).
    #[pyo3(signature = (output, background=(0.0, 0.0, 0.0)))]
    fn render_rgb<'py>(&mut self, output: &Bound<'py, PyArray3<u8>>, background: Rgb) -> PyResult<()> {
        {
            let view = self.view.blocking_lock();
            view.render(&mut self.canvas);
        }

        let shape = output.shape();
        let (h, w) = (self.canvas.height(), self.canvas.width());
        if shape[0] != h || shape[1] != w || shape[2] != 3 {
            return Err(PyValueError::new_err(format!(
                "output has shape {:?}, expected ({}, {}, 3)",
                shape, h, w
            )));
        }

        let mut rgb = vec![0u8; h * w * 3];
        self.canvas.to_rgb8(color(background), &mut rgb);
        // SAFETY: We have exclusive write access to output through PyO3's borrow rules
        unsafe {
            let mut out = output.as_array_mut();
            for row in 0..h {
                for col in 0..w {
                    let i = (row * w + col) * 3;
                    for c in 0..3 {
                        out[[row, col, c]] = rgb[i + c];
                    }
                }
            }
        }
        Ok(())
    }
}

/// Closed fill outline for one wave layer as a list of (x, y) points.
#[pyfunction]
pub fn wave_outline(level: f64, amplitude: f64, phase: f64, width: f64, height: f64) -> Vec<(f64, f64)> {
    wave::generate(level, amplitude, phase, Size::new(width, height))
        .points()
        .iter()
        .map(|p| (p.x, p.y))
        .collect()
}
