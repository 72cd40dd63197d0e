//! Frame composition and rasterization.
//!
//! [`compose`] turns the current wave state, a ripple snapshot, and the
//! style settings into a retained [`Frame`]. [`Canvas`] rasterizes a frame
//! into an RGBA f64 buffer of shape (height, width, 4) and can flatten it to
//! RGB u8 for output.
//!
//! Draw order, back to front:
//! 1. Back wave (half amplitude, back phase, 0.6 opacity)
//! 2. Front wave (full amplitude, front phase, 0.8 opacity)
//! 3. Floating decoration
//! 4. Ripple strokes
//!
//! The mask, when present, multiplies the alpha of everything above.

use crate::color::{Color, FillStyle};
use crate::config::WaveConfig;
use crate::decoration::Sprite;
use crate::drawing::{fill_polygon, stroke_circle};
use crate::geometry::{Point, Rect, Size};
use crate::mask::Mask;
use crate::ripple::Ripple;
use crate::wave::{self, Outline, WaveState};

pub const BACK_AMPLITUDE_FACTOR: f64 = 0.5;
pub const BACK_OPACITY: f64 = 0.6;
pub const FRONT_OPACITY: f64 = 0.8;

#[derive(Clone, Debug, PartialEq)]
pub struct WaveLayer<'a> {
    pub outline: Outline,
    pub fill: &'a FillStyle,
    pub opacity: f64,
    /// Amplitude the outline was generated with, as a fraction of height.
    pub amplitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleStroke {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
    pub opacity: f64,
    pub line_width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationPlacement<'a> {
    pub rect: Rect,
    pub sprite: Option<&'a Sprite>,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    pub size: Size,
    pub back: WaveLayer<'a>,
    pub front: WaveLayer<'a>,
    pub decoration: Option<DecorationPlacement<'a>>,
    pub ripples: Vec<RippleStroke>,
    pub mask: Option<&'a Mask>,
}

/// Build a frame from state, ripples, and style. Pure; no side effects.
pub fn compose<'a, 'r, I>(
    state: &WaveState,
    ripples: I,
    config: &'a WaveConfig,
    size: Size,
) -> Frame<'a>
where
    I: IntoIterator<Item = &'r Ripple>,
{
    let back_amplitude = state.amplitude * BACK_AMPLITUDE_FACTOR;
    let back = WaveLayer {
        outline: wave::generate(state.level, back_amplitude, state.phase_back, size),
        fill: &config.back_fill,
        opacity: BACK_OPACITY,
        amplitude: back_amplitude,
    };
    let front = WaveLayer {
        outline: wave::generate(state.level, state.amplitude, state.phase_front, size),
        fill: &config.front_fill,
        opacity: FRONT_OPACITY,
        amplitude: state.amplitude,
    };

    let decoration = config.decoration.as_ref().map(|deco| DecorationPlacement {
        rect: deco.placement(size, state.level, state.phase_front),
        sprite: deco.sprite.as_ref(),
    });

    let ripples = if config.ripples_visible() {
        ripples
            .into_iter()
            .map(|ripple| RippleStroke {
                center: ripple.origin(),
                radius: ripple.radius(config.ripple_max_diameter),
                color: ripple.color(),
                opacity: ripple.opacity(config.ripple_opacity),
                line_width: config.ripple_stroke_width,
            })
            .collect()
    } else {
        Vec::new()
    };

    Frame {
        size,
        back,
        front,
        decoration,
        ripples,
        mask: config.mask.as_ref(),
    }
}

/// RGBA f64 render target, straight alpha, row-major (height, width, 4).
///
/// The buffer is reused across frames and only grows.
#[derive(Debug, Default)]
pub struct Canvas {
    width: usize,
    height: usize,
    buffer: Vec<f64>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let mut canvas = Self::default();
        canvas.resize(width, height);
        canvas
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let required = width * height * 4;
        if self.buffer.len() < required {
            self.buffer.resize(required, 0.0);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The active (height * width * 4) portion of the buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.buffer[..self.width * self.height * 4]
    }

    pub fn pixel(&self, row: usize, col: usize) -> [f64; 4] {
        let i = (row * self.width + col) * 4;
        [
            self.buffer[i],
            self.buffer[i + 1],
            self.buffer[i + 2],
            self.buffer[i + 3],
        ]
    }

    pub fn clear(&mut self) {
        let len = self.width * self.height * 4;
        self.buffer[..len].fill(0.0);
    }

    /// Source-over blend of a straight-alpha color into one pixel.
    #[inline]
    fn blend(&mut self, row: usize, col: usize, color: Color) {
        let src_a = color.a.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let i = (row * self.width + col) * 4;
        let dst_a = self.buffer[i + 3];
        let out_a = src_a + dst_a * (1.0 - src_a);
        let src = [color.r, color.g, color.b];
        for (c, &s) in src.iter().enumerate() {
            let d = self.buffer[i + c];
            self.buffer[i + c] = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        }
        self.buffer[i + 3] = out_a;
    }

    fn draw_layer(&mut self, layer: &WaveLayer<'_>, size: Size) {
        let (w, h) = (self.width, self.height);
        let mut spans = Vec::new();
        fill_polygon(layer.outline.points(), w, h, |row, col, coverage| {
            spans.push((row, col, coverage));
        });
        for (row, col, coverage) in spans {
            let center = Point::new(col as f64 + 0.5, row as f64 + 0.5);
            let color = layer
                .fill
                .color_at(center, size)
                .with_opacity(layer.opacity * coverage);
            self.blend(row, col, color);
        }
    }

    fn draw_sprite(&mut self, placement: &DecorationPlacement<'_>) {
        let Some(sprite) = placement.sprite else {
            return;
        };
        let rect = placement.rect;
        if rect.size.is_empty() {
            return;
        }
        let min_row = rect.origin.y.floor().max(0.0) as usize;
        let max_row = (rect.max_y().ceil().max(0.0) as usize).min(self.height);
        let min_col = rect.origin.x.floor().max(0.0) as usize;
        let max_col = (rect.max_x().ceil().max(0.0) as usize).min(self.width);

        for row in min_row..max_row {
            let v = (row as f64 + 0.5 - rect.origin.y) / rect.size.height;
            if !(0.0..1.0).contains(&v) {
                continue;
            }
            let sy = ((v * sprite.height() as f64) as usize).min(sprite.height() - 1);
            for col in min_col..max_col {
                let u = (col as f64 + 0.5 - rect.origin.x) / rect.size.width;
                if !(0.0..1.0).contains(&u) {
                    continue;
                }
                let sx = ((u * sprite.width() as f64) as usize).min(sprite.width() - 1);
                let [r, g, b, a] = sprite.pixel(sx, sy);
                self.blend(row, col, Color::rgba(r, g, b, a));
            }
        }
    }

    fn draw_ripple(&mut self, stroke: &RippleStroke) {
        let (w, h) = (self.width, self.height);
        let mut hits = Vec::new();
        stroke_circle(stroke.center, stroke.radius, stroke.line_width, w, h, |row, col, coverage| {
            hits.push((row, col, coverage));
        });
        for (row, col, coverage) in hits {
            self.blend(row, col, stroke.color.with_opacity(stroke.opacity * coverage));
        }
    }

    fn apply_mask(&mut self, mask: &Mask, size: Size) {
        for row in 0..self.height {
            for col in 0..self.width {
                let center = Point::new(col as f64 + 0.5, row as f64 + 0.5);
                let i = (row * self.width + col) * 4 + 3;
                self.buffer[i] *= mask.coverage_at(center, size);
            }
        }
    }

    /// Clear and draw `frame`. The canvas is resized to the frame's pixel size.
    pub fn render(&mut self, frame: &Frame<'_>) {
        let width = frame.size.width.max(0.0).round() as usize;
        let height = frame.size.height.max(0.0).round() as usize;
        self.resize(width, height);
        self.clear();
        if width == 0 || height == 0 {
            return;
        }

        self.draw_layer(&frame.back, frame.size);
        self.draw_layer(&frame.front, frame.size);
        if let Some(placement) = &frame.decoration {
            self.draw_sprite(placement);
        }
        for stroke in &frame.ripples {
            self.draw_ripple(stroke);
        }
        if let Some(mask) = frame.mask {
            self.apply_mask(mask, frame.size);
        }
    }

    /// Flatten to RGB u8 against a background color.
    ///
    /// # Formula
    /// ```text
    /// out = (1.0 - alpha) * bg + alpha * src
    /// // Then clamped to [0.0, 1.0] and scaled to u8 [0, 255]
    /// ```
    pub fn to_rgb8(&self, background: Color, output: &mut [u8]) {
        let pixels = self.width * self.height;
        debug_assert!(output.len() >= pixels * 3, "output too small for canvas");
        let bg = [background.r, background.g, background.b];

        for p in 0..pixels.min(output.len() / 3) {
            let src_idx = p * 4;
            let dst_idx = p * 3;
            let alpha = self.buffer[src_idx + 3];
            let inv_alpha = 1.0 - alpha;

            for c in 0..3 {
                let src = self.buffer[src_idx + c];
                let composited = inv_alpha * bg[c] + alpha * src;
                let clamped = composited.clamp(0.0, 1.0);
                output[dst_idx + c] = (clamped * 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::FloatingDecoration;
    use crate::ripple::{RippleLifecycle, RippleSettings};

    fn state(level: f64) -> WaveState {
        WaveState {
            level,
            amplitude: 0.04,
            phase_front: 0.0,
            phase_back: 0.0,
        }
    }

    fn ripples_with(points: &[Point]) -> RippleLifecycle {
        let mut ripples = RippleLifecycle::new(
            RippleSettings {
                color: Color::WHITE,
                duration: 2.0,
                interval: 3.0,
                auto_enabled: false,
            },
            fastrand::Rng::with_seed(1),
        );
        for &p in points {
            ripples.spawn_at(p);
        }
        ripples.advance(1.0);
        ripples
    }

    #[test]
    fn test_layer_amplitudes() {
        let config = WaveConfig::default();
        let frame = compose(&state(0.5), std::iter::empty(), &config, Size::new(100.0, 100.0));
        assert!((frame.back.amplitude - 0.5 * config.wave_amplitude).abs() < 1e-12);
        assert_eq!(frame.front.amplitude, config.wave_amplitude);
        assert_eq!(frame.back.opacity, BACK_OPACITY);
        assert_eq!(frame.front.opacity, FRONT_OPACITY);
        assert_eq!(frame.front.fill, &config.front_fill);
        assert_eq!(frame.back.fill, &config.back_fill);
    }

    #[test]
    fn test_layers_use_their_own_phase() {
        let config = WaveConfig::default();
        let st = WaveState {
            phase_front: 1.0,
            phase_back: 2.0,
            ..state(0.5)
        };
        let size = Size::new(100.0, 100.0);
        let frame = compose(&st, std::iter::empty(), &config, size);
        assert_eq!(frame.front.outline, wave::generate(0.5, 0.04, 1.0, size));
        assert_eq!(frame.back.outline, wave::generate(0.5, 0.02, 2.0, size));
    }

    #[test]
    fn test_ripple_strokes() {
        let config = WaveConfig::default();
        let ripples = ripples_with(&[Point::new(10.0, 10.0)]);
        let frame = compose(&state(0.5), ripples.iter(), &config, Size::new(100.0, 100.0));
        assert_eq!(frame.ripples.len(), 1);
        let stroke = frame.ripples[0];
        assert_eq!(stroke.center, Point::new(10.0, 10.0));
        assert!((stroke.radius - 37.5).abs() < 1e-9);
        assert!((stroke.opacity - 0.125).abs() < 1e-9);
        assert_eq!(stroke.line_width, 2.0);
    }

    #[test]
    fn test_ripples_hidden_when_both_modes_disabled() {
        let config = WaveConfig::builder()
            .auto_ripple_enabled(false)
            .tap_ripple_enabled(false)
            .build()
            .unwrap();
        let ripples = ripples_with(&[Point::new(10.0, 10.0)]);
        let frame = compose(&state(0.5), ripples.iter(), &config, Size::new(100.0, 100.0));
        assert!(frame.ripples.is_empty());
    }

    #[test]
    fn test_decoration_optional() {
        let config = WaveConfig::default();
        let frame = compose(&state(0.5), std::iter::empty(), &config, Size::new(100.0, 100.0));
        assert!(frame.decoration.is_none());
        assert!(frame.mask.is_none());

        let config = WaveConfig::builder()
            .decoration(FloatingDecoration::default())
            .build()
            .unwrap();
        let frame = compose(&state(0.25), std::iter::empty(), &config, Size::new(100.0, 100.0));
        let placement = frame.decoration.unwrap();
        assert_eq!(placement.rect.center(), Point::new(50.0, 75.0));
    }

    #[test]
    fn test_render_fills_below_waterline() {
        let config = WaveConfig::builder()
            .front_fill(Color::rgb(1.0, 0.0, 0.0))
            .back_fill(Color::rgb(1.0, 0.0, 0.0))
            .build()
            .unwrap();
        let size = Size::new(40.0, 40.0);
        let frame = compose(&state(0.5), std::iter::empty(), &config, size);
        let mut canvas = Canvas::new(0, 0);
        canvas.render(&frame);

        assert_eq!(canvas.width(), 40);
        assert_eq!(canvas.as_slice().len(), 40 * 40 * 4);

        let top = canvas.pixel(2, 20);
        assert_eq!(top[3], 0.0);

        let bottom = canvas.pixel(38, 20);
        // 0.6 back under 0.8 front
        assert!((bottom[3] - (0.8 + 0.6 * 0.2)).abs() < 1e-9);
        assert!((bottom[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_empty_level() {
        let config = WaveConfig::default();
        let st = WaveState {
            amplitude: 0.0,
            ..state(0.0)
        };
        let frame = compose(&st, std::iter::empty(), &config, Size::new(20.0, 20.0));
        let mut canvas = Canvas::new(20, 20);
        canvas.render(&frame);
        assert!(canvas.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mask_hides_outside() {
        let mask = Mask::new(1, 1, vec![0.0]).unwrap();
        let config = WaveConfig::builder().mask(mask).build().unwrap();
        let frame = compose(&state(1.0), std::iter::empty(), &config, Size::new(10.0, 10.0));
        let mut canvas = Canvas::new(10, 10);
        canvas.render(&frame);
        assert!(canvas.as_slice().chunks(4).all(|px| px[3] == 0.0));
    }

    #[test]
    fn test_sprite_drawn_at_placement() {
        let sprite = Sprite::new(1, 1, vec![0.0, 1.0, 0.0, 1.0]).unwrap();
        let deco = FloatingDecoration {
            size: Size::new(4.0, 4.0),
            amplitude: 0.0,
            sprite: Some(sprite),
        };
        let config = WaveConfig::builder().decoration(deco).build().unwrap();
        let frame = compose(&state(0.5), std::iter::empty(), &config, Size::new(20.0, 20.0));
        let mut canvas = Canvas::new(20, 20);
        canvas.render(&frame);
        // Rect spans x 8..12, y 8..12
        assert_eq!(canvas.pixel(9, 10), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_to_rgb8_background() {
        let mut canvas = Canvas::new(2, 1);
        canvas.clear();
        let mut out = vec![0u8; 6];
        canvas.to_rgb8(Color::rgb(1.0, 0.0, 0.0), &mut out);
        assert_eq!(out, vec![255, 0, 0, 255, 0, 0]);
    }
}
