//! Anti-aliased rasterization primitives.
//!
//! Both primitives report per-pixel coverage through a callback instead of
//! allocating coordinate arrays, so the canvas can blend in a single pass.
//!
//! - `fill_polygon` - Non-zero scanline fill with vertical supersampling
//! - `stroke_circle` - Circle outline of a given line width

use crate::geometry::Point;

/// Sub-scanlines per pixel row for polygon edge smoothing.
const SUBSAMPLES: usize = 4;

/// Fill a closed polygon, calling `plot(row, col, coverage)` for every
/// pixel with non-zero coverage inside a `width` x `height` grid.
///
/// Coverage is the fraction of sub-scanlines whose span contains the
/// pixel centre, so horizontal edges blend and vertical edges are crisp.
pub fn fill_polygon<F>(points: &[Point], width: usize, height: usize, mut plot: F)
where
    F: FnMut(usize, usize, f64),
{
    if points.len() < 3 || width == 0 || height == 0 {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let first_row = min_y.floor().max(0.0) as usize;
    let last_row = (max_y.ceil().max(0.0) as usize).min(height);

    let weight = 1.0 / SUBSAMPLES as f64;
    let mut coverage = vec![0.0f64; width];
    let mut crossings: Vec<(f64, i32)> = Vec::with_capacity(16);

    for row in first_row..last_row {
        coverage.fill(0.0);
        let mut touched = false;

        for sub in 0..SUBSAMPLES {
            let y = row as f64 + (sub as f64 + 0.5) * weight;

            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                    let t = (y - a.y) / (b.y - a.y);
                    let winding = if b.y > a.y { 1 } else { -1 };
                    crossings.push((a.x + t * (b.x - a.x), winding));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                // Pixel columns whose centre lies in [x0, x1)
                let x0 = (pair[0].0 - 0.5).ceil().max(0.0) as usize;
                let x1 = ((pair[1].0 - 0.5).ceil().max(0.0) as usize).min(width);
                for c in coverage.iter_mut().take(x1).skip(x0) {
                    *c += weight;
                    touched = true;
                }
            }
        }

        if touched {
            for (col, &c) in coverage.iter().enumerate() {
                if c > 0.0 {
                    plot(row, col, c.min(1.0));
                }
            }
        }
    }
}

/// Stroke a circle outline centred on `center`.
///
/// Coverage falls off linearly over the half-pixel on each side of the
/// stroke band `|d - radius| <= line_width / 2`.
pub fn stroke_circle<F>(
    center: Point,
    radius: f64,
    line_width: f64,
    width: usize,
    height: usize,
    mut plot: F,
) where
    F: FnMut(usize, usize, f64),
{
    if radius <= 0.0 || line_width <= 0.0 || width == 0 || height == 0 {
        return;
    }

    let half = line_width / 2.0;
    let reach = radius + half + 1.0;

    // Compute bounding box for this circle
    let min_row = (center.y - reach).floor().max(0.0) as usize;
    let max_row = ((center.y + reach).ceil().max(0.0) as usize).min(height);
    let min_col = (center.x - reach).floor().max(0.0) as usize;
    let max_col = ((center.x + reach).ceil().max(0.0) as usize).min(width);

    for row in min_row..max_row {
        for col in min_col..max_col {
            let dx = col as f64 + 0.5 - center.x;
            let dy = row as f64 + 0.5 - center.y;
            let dist = (dx * dx + dy * dy).sqrt();
            let coverage = (half + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0);
            if coverage > 0.0 {
                plot(row, col, coverage);
            }
        }
    }
}
