//! Colors and fill styles for the wave layers.
//!
//! A [`FillStyle`] is either a flat color or a linear gradient whose
//! direction is given in unit coordinates of the drawing surface
//! (`(0, 0)` top-left, `(1, 1)` bottom-right).

use crate::error::{ConfigError, Result};
use crate::geometry::{Point, Size};

/// Straight (non-premultiplied) RGBA color, each channel in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.478, 1.0);
    pub const CYAN: Color = Color::rgb(0.196, 0.678, 0.902);
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha multiplied by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn lerp(self, other: Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient (0.0 to 1.0).
    pub offset: f64,
    pub color: Color,
}

impl ColorStop {
    pub const fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Linear gradient between two unit points.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    start: Point,
    end: Point,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    /// Build a gradient from explicit stops. Stops are sorted by offset.
    pub fn new(start: Point, end: Point, mut stops: Vec<ColorStop>) -> Result<Self> {
        if stops.is_empty() {
            return Err(ConfigError::InvalidGradient);
        }
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Ok(Self { start, end, stops })
    }

    /// Top-to-bottom gradient with evenly spaced colors.
    pub fn vertical(colors: &[Color]) -> Result<Self> {
        let last = colors.len().saturating_sub(1).max(1) as f64;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| ColorStop::new(i as f64 / last, c))
            .collect();
        Self::new(Point::new(0.5, 0.0), Point::new(0.5, 1.0), stops)
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at parameter `t` along the gradient axis.
    pub fn sample(&self, t: f64) -> Color {
        let first = self.stops[0];
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f64::EPSILON {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    /// Project a surface point onto the gradient axis.
    fn parameter_at(&self, point: Point, size: Size) -> f64 {
        let (sx, sy) = (self.start.x * size.width, self.start.y * size.height);
        let (ex, ey) = (self.end.x * size.width, self.end.y * size.height);
        let (dx, dy) = (ex - sx, ey - sy);
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f64::EPSILON {
            return 0.0;
        }
        ((point.x - sx) * dx + (point.y - sy) * dy) / len_sq
    }
}

/// How a wave layer is painted.
#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    Solid(Color),
    Gradient(LinearGradient),
}

impl FillStyle {
    /// Color of the fill at `point` on a surface of `size`.
    pub fn color_at(&self, point: Point, size: Size) -> Color {
        match self {
            FillStyle::Solid(color) => *color,
            FillStyle::Gradient(gradient) => gradient.sample(gradient.parameter_at(point, size)),
        }
    }
}

impl From<Color> for FillStyle {
    fn from(color: Color) -> Self {
        FillStyle::Solid(color)
    }
}

impl From<LinearGradient> for FillStyle {
    fn from(gradient: LinearGradient) -> Self {
        FillStyle::Gradient(gradient)
    }
}
