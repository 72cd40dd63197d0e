//! Floating decoration that bobs on the water surface.

use crate::error::{positive_dimension, ConfigError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::wave::mid_y;

/// Row-major straight-alpha RGBA image.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    rgba: Vec<f64>,
}

impl Sprite {
    pub fn new(width: usize, height: usize, rgba: Vec<f64>) -> Result<Self> {
        let expected = width * height * 4;
        if rgba.len() != expected || expected == 0 {
            return Err(ConfigError::InvalidSprite {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at (`col`, `row`) as `[r, g, b, a]`.
    pub fn pixel(&self, col: usize, row: usize) -> [f64; 4] {
        let i = (row * self.width + col) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingDecoration {
    pub size: Size,
    /// Vertical bob in surface units.
    pub amplitude: f64,
    /// Pixels to draw. Without a sprite the host draws into the placement.
    pub sprite: Option<Sprite>,
}

impl Default for FloatingDecoration {
    fn default() -> Self {
        Self {
            size: Size::new(50.0, 50.0),
            amplitude: 10.0,
            sprite: None,
        }
    }
}

impl FloatingDecoration {
    pub fn validate(&self) -> Result<()> {
        positive_dimension("decoration width", self.size.width)?;
        positive_dimension("decoration height", self.size.height)?;
        if !self.amplitude.is_finite() {
            return Err(ConfigError::InvalidDimension {
                name: "decoration amplitude",
                value: self.amplitude,
            });
        }
        Ok(())
    }

    /// Bounding box on the surface: horizontally centred, riding the
    /// waterline and offset by `-amplitude * sin(phase)`.
    pub fn placement(&self, surface: Size, level: f64, phase: f64) -> Rect {
        let center = Point::new(
            surface.width / 2.0,
            mid_y(level, surface.height) - self.amplitude * phase.sin(),
        );
        Rect::centered_at(center, self.size)
    }
}
