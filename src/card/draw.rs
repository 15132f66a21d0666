//! Raster primitives for the card: alpha blending, gradients, circle and
//! rectangle strokes, glyph rendering.

use crate::card::layout::TextMeasure;
use image::{ImageBuffer, Rgba};
use rusttype::{point, Font, Scale};

pub type Canvas = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Source-over blend of `color` at `alpha` onto one pixel. Out-of-bounds
/// coordinates are ignored.
pub fn blend_px(canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>, alpha: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x, y);
    let inv = 1.0 - a;
    for c in 0..3 {
        dst.0[c] = (f32::from(color.0[c]) * a + f32::from(dst.0[c]) * inv) as u8;
    }
    dst.0[3] = 255;
}

/// Fill the whole canvas with a vertical gradient between positioned color
/// stops (`position` in 0..=1, ascending).
pub fn fill_vertical_gradient(canvas: &mut Canvas, stops: &[(f32, Rgba<u8>)]) {
    let height = canvas.height();
    for y in 0..height {
        let t = y as f32 / (height - 1) as f32;
        let color = sample_gradient(stops, t);
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, color);
        }
    }
}

fn sample_gradient(stops: &[(f32, Rgba<u8>)], t: f32) -> Rgba<u8> {
    let mut prev = stops[0];
    for &stop in stops {
        if t <= stop.0 {
            let span = stop.0 - prev.0;
            let local = if span > 0.0 { (t - prev.0) / span } else { 0.0 };
            return lerp_color(prev.1, stop.1, local);
        }
        prev = stop;
    }
    prev.1
}

fn lerp_color(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let mut out = [0u8; 4];
    for c in 0..4 {
        out[c] = (f32::from(a.0[c]) + (f32::from(b.0[c]) - f32::from(a.0[c])) * t) as u8;
    }
    Rgba(out)
}

pub fn fill_rect(canvas: &mut Canvas, x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>, alpha: f32) {
    for dy in 0..h as i32 {
        for dx in 0..w as i32 {
            blend_px(canvas, x + dx, y + dy, color, alpha);
        }
    }
}

/// Rectangle outline of `line_width` drawn inward from the given bounds.
pub fn stroke_rect(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    line_width: u32,
    color: Rgba<u8>,
    alpha: f32,
) {
    fill_rect(canvas, x, y, w, line_width, color, alpha);
    fill_rect(canvas, x, y + h as i32 - line_width as i32, w, line_width, color, alpha);
    fill_rect(canvas, x, y, line_width, h, color, alpha);
    fill_rect(canvas, x + w as i32 - line_width as i32, y, line_width, h, color, alpha);
}

pub fn stroke_circle(
    canvas: &mut Canvas,
    cx: f32,
    cy: f32,
    radius: f32,
    line_width: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let outer = radius + line_width / 2.0 + 1.0;
    let (min_x, max_x) = ((cx - outer) as i32, (cx + outer) as i32);
    let (min_y, max_y) = ((cy - outer) as i32, (cy + outer) as i32);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            let edge = (d - radius).abs();
            if edge <= line_width / 2.0 {
                blend_px(canvas, x, y, color, alpha);
            } else if edge <= line_width / 2.0 + 1.0 {
                // one-pixel feather so the ring is not stair-stepped
                blend_px(canvas, x, y, color, alpha * (line_width / 2.0 + 1.0 - edge));
            }
        }
    }
}

pub fn fill_circle(canvas: &mut Canvas, cx: f32, cy: f32, radius: f32, color: Rgba<u8>, alpha: f32) {
    let (min_x, max_x) = ((cx - radius) as i32 - 1, (cx + radius) as i32 + 1);
    let (min_y, max_y) = ((cy - radius) as i32 - 1, (cy + radius) as i32 + 1);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            if d <= radius {
                blend_px(canvas, x, y, color, alpha);
            } else if d <= radius + 1.0 {
                blend_px(canvas, x, y, color, alpha * (radius + 1.0 - d));
            }
        }
    }
}

/// Radial falloff fill: `alpha_inner` at `r_inner` fading to zero at `r_outer`.
pub fn radial_glow(
    canvas: &mut Canvas,
    cx: f32,
    cy: f32,
    r_inner: f32,
    r_outer: f32,
    color: Rgba<u8>,
    alpha_inner: f32,
) {
    let (min_x, max_x) = ((cx - r_outer) as i32, (cx + r_outer) as i32);
    let (min_y, max_y) = ((cy - r_outer) as i32, (cy + r_outer) as i32);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            if d >= r_outer {
                continue;
            }
            let t = if d <= r_inner {
                1.0
            } else {
                1.0 - (d - r_inner) / (r_outer - r_inner)
            };
            blend_px(canvas, x, y, color, alpha_inner * t);
        }
    }
}

/// Four-pointed sparkle glyph (astroid region test), points up/down/left/right.
pub fn sparkle(canvas: &mut Canvas, cx: f32, cy: f32, radius: f32, color: Rgba<u8>, alpha: f32) {
    let limit = radius.powf(2.0 / 3.0);
    let r = radius as i32 + 1;
    for dy in -r..=r {
        for dx in -r..=r {
            let v = (dx.abs() as f32).powf(2.0 / 3.0) + (dy.abs() as f32).powf(2.0 / 3.0);
            if v <= limit {
                blend_px(canvas, cx as i32 + dx, cy as i32 + dy, color, alpha);
            }
        }
    }
}

/// Draw `text` with its horizontal center at `cx` and its baseline at
/// `baseline_y`, alpha-blending glyph coverage.
pub fn draw_text_centered(
    canvas: &mut Canvas,
    font: &Font<'static>,
    px: f32,
    cx: f32,
    baseline_y: f32,
    color: Rgba<u8>,
    alpha: f32,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let width = super::fonts::ScaledFont { font, scale }.text_width(text);
    let start_x = cx - width / 2.0;

    for glyph in font.layout(text, scale, point(start_x, baseline_y)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                blend_px(
                    canvas,
                    gx as i32 + bb.min.x,
                    gy as i32 + bb.min.y,
                    color,
                    alpha * v,
                );
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::from_pixel(w, h, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn blend_is_bounds_safe() {
        let mut c = canvas(4, 4);
        blend_px(&mut c, -1, 0, Rgba([255, 255, 255, 255]), 1.0);
        blend_px(&mut c, 10, 10, Rgba([255, 255, 255, 255]), 1.0);
        blend_px(&mut c, 2, 2, Rgba([255, 255, 255, 255]), 1.0);
        assert_eq!(c.get_pixel(2, 2).0[0], 255);
    }

    #[test]
    fn gradient_hits_both_endpoints() {
        let mut c = canvas(2, 10);
        let stops = [
            (0.0, Rgba([0, 0, 0, 255])),
            (1.0, Rgba([200, 100, 50, 255])),
        ];
        fill_vertical_gradient(&mut c, &stops);
        assert_eq!(c.get_pixel(0, 0).0[0], 0);
        assert_eq!(c.get_pixel(0, 9).0[0], 200);
    }

    #[test]
    fn stroke_rect_leaves_interior_untouched() {
        let mut c = canvas(20, 20);
        stroke_rect(&mut c, 2, 2, 16, 16, 2, Rgba([255, 255, 255, 255]), 1.0);
        assert_eq!(c.get_pixel(3, 3).0[0], 255);
        assert_eq!(c.get_pixel(10, 10).0[0], 0);
    }

    #[test]
    fn circle_ring_excludes_center() {
        let mut c = canvas(41, 41);
        stroke_circle(&mut c, 20.0, 20.0, 15.0, 2.0, Rgba([255, 0, 0, 255]), 1.0);
        assert_eq!(c.get_pixel(20, 20).0[0], 0);
        assert!(c.get_pixel(35, 20).0[0] > 0);
    }
}
