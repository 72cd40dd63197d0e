//! Wave outline generator.
//!
//! Samples `y = midY + sin(2π·x/width + phase) · amplitude · height` once per
//! unit of width, where `midY = height · (1 - level)`, then closes the
//! polygon along the bottom edge so the region below the crest can be filled.

use std::f64::consts::TAU;

use crate::geometry::{Point, Size};

/// Horizontal sampling step, in surface units.
const SAMPLE_STEP: f64 = 1.0;

/// Per-frame wave parameters read by the generator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveState {
    /// Fill fraction from the bottom, always in [0, 1].
    pub level: f64,
    /// Fraction of surface height.
    pub amplitude: f64,
    pub phase_front: f64,
    pub phase_back: f64,
}

/// Closed fill polygon: crest samples left to right, then the bottom-right
/// and bottom-left corners.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    points: Vec<Point>,
    crest_len: usize,
}

impl Outline {
    /// Every vertex of the closed polygon.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Only the sampled wave crest.
    pub fn crest(&self) -> &[Point] {
        &self.points[..self.crest_len]
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest y among crest samples (the highest point on screen).
    pub fn top(&self) -> Option<f64> {
        self.crest().iter().map(|p| p.y).reduce(f64::min)
    }

    /// Signed-area magnitude via the shoelace formula.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }
}

/// Baseline of the wave for a fill `level` on a surface `height` tall.
#[inline]
pub fn mid_y(level: f64, height: f64) -> f64 {
    height * (1.0 - level)
}

/// Generate the closed fill outline for one wave layer.
///
/// # Arguments
/// * `level` - Fill fraction from the bottom, clamped to [0, 1]
/// * `amplitude` - Wave height as a fraction of surface height
/// * `phase` - Horizontal phase offset in radians
/// * `size` - Drawing surface size
pub fn generate(level: f64, amplitude: f64, phase: f64, size: Size) -> Outline {
    if size.is_empty() || !size.width.is_finite() || !size.height.is_finite() {
        return Outline::default();
    }

    let Size { width, height } = size;
    let mid = mid_y(level.clamp(0.0, 1.0), height);
    let swing = amplitude * height;

    let samples = (width / SAMPLE_STEP).floor() as usize + 1;
    let mut points = Vec::with_capacity(samples + 2);

    for i in 0..samples {
        let x = i as f64 * SAMPLE_STEP;
        let y = mid + (TAU * x / width + phase).sin() * swing;
        points.push(Point::new(x, y));
    }

    points.push(Point::new(width, height));
    points.push(Point::new(0.0, height));

    Outline {
        points,
        crest_len: samples,
    }
}
