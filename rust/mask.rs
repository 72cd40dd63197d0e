//! Alpha mask restricting the visible region of a frame.
//!
//! The mask is scaled to fit inside the surface with its aspect ratio kept
//! and centred, mirroring how an image mask is usually laid out. Anything
//! outside the fitted rectangle is hidden.

use crate::error::{positive_dimension, ConfigError, Result};
use crate::geometry::{Point, Rect, Size};

#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    width: usize,
    height: usize,
    alpha: Vec<f64>,
}

impl Mask {
    /// Build a mask from row-major alpha values in [0, 1].
    pub fn new(width: usize, height: usize, alpha: Vec<f64>) -> Result<Self> {
        positive_dimension("mask width", width as f64)?;
        positive_dimension("mask height", height as f64)?;
        let expected = width * height;
        if alpha.len() != expected {
            return Err(ConfigError::InvalidMask {
                expected,
                actual: alpha.len(),
            });
        }
        let alpha = alpha.into_iter().map(|a| a.clamp(0.0, 1.0)).collect();
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Use the alpha channel of a row-major RGBA buffer.
    pub fn from_rgba(width: usize, height: usize, rgba: &[f64]) -> Result<Self> {
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(ConfigError::InvalidMask {
                expected,
                actual: rgba.len(),
            });
        }
        Self::new(width, height, rgba.chunks_exact(4).map(|px| px[3]).collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Where the mask lands on a surface of `surface` size.
    pub fn fitted_rect(&self, surface: Size) -> Rect {
        let (mw, mh) = (self.width as f64, self.height as f64);
        let scale = (surface.width / mw).min(surface.height / mh);
        let size = Size::new(mw * scale, mh * scale);
        Rect::new(
            (surface.width - size.width) / 2.0,
            (surface.height - size.height) / 2.0,
            size.width,
            size.height,
        )
    }

    /// Visibility of `point` in [0, 1] (nearest sample).
    pub fn coverage_at(&self, point: Point, surface: Size) -> f64 {
        let rect = self.fitted_rect(surface);
        if rect.size.is_empty()
            || point.x < rect.origin.x
            || point.y < rect.origin.y
            || point.x >= rect.max_x()
            || point.y >= rect.max_y()
        {
            return 0.0;
        }
        let u = (point.x - rect.origin.x) / rect.size.width;
        let v = (point.y - rect.origin.y) / rect.size.height;
        let col = ((u * self.width as f64) as usize).min(self.width - 1);
        let row = ((v * self.height as f64) as usize).min(self.height - 1);
        self.alpha[row * self.width + col]
    }
}
