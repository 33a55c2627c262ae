//! Text measurement and stroke-font drawing.
//!
//! Text is drawn with the built-in stroke font. Metrics follow the usual
//! vector-font convention: the origin sits at the bottom-left of the text on
//! the baseline, `height` measures from the baseline up to the cap line and
//! `baseline` measures the descent below it.

use image::Pixel;
use imageproc::definitions::Image;
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use imageproc::point::Point;

use crate::glyphs::{self, BEARING, CAP_HEIGHT, DESCENT};

/// Pixels per font unit at a font scale of 1.0.
const UNIT_PX: f64 = 1.75;

/// Pixel extent of a rendered string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSize {
    /// Width of the text box in pixels.
    pub width: u32,
    /// Height from the baseline to the cap line, in pixels.
    pub height: u32,
    /// Descent below the baseline, in pixels.
    pub baseline: u32,
}

fn px_per_unit(font_scale: f64) -> f64 {
    font_scale * UNIT_PX
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_px(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

/// Measure `text` at the given font scale and stroke thickness.
#[must_use]
pub fn text_size(text: &str, font_scale: f64, thickness: u32) -> TextSize {
    let k = px_per_unit(font_scale);
    let units: i32 = text.chars().map(|ch| glyphs::glyph(ch).advance()).sum();

    TextSize {
        width: round_px(f64::from(units) * k + f64::from(thickness)),
        height: round_px(f64::from(CAP_HEIGHT) * k + f64::from(thickness.div_ceil(2))),
        baseline: round_px(f64::from(DESCENT) * k + f64::from(thickness) * 0.5),
    }
}

/// Origin at which text of `size` must be drawn to be centred on `centre`.
///
/// Uses truncating integer halves, so `origin.x + width / 2 == centre.x` and
/// `origin.y - height / 2 == centre.y` hold exactly.
#[must_use]
pub fn text_origin(centre: Point<i32>, size: TextSize) -> Point<i32> {
    let half_w = i32::try_from(size.width / 2).unwrap_or(i32::MAX);
    let half_h = i32::try_from(size.height / 2).unwrap_or(i32::MAX);
    Point::new(centre.x.saturating_sub(half_w), centre.y.saturating_add(half_h))
}

/// Draw a straight stroke of the given thickness.
///
/// One-pixel strokes are plain line segments; thicker strokes are built from
/// filled discs so that ends and joints come out round. Pixels outside the
/// canvas are clipped.
pub fn draw_stroke<P>(
    canvas: &mut Image<P>,
    from: (f32, f32),
    to: (f32, f32),
    color: P,
    thickness: u32,
) where
    P: Pixel + 'static,
{
    if thickness <= 1 {
        draw_line_segment_mut(canvas, from, to, color);
        return;
    }

    let radius = i32::try_from(thickness / 2).unwrap_or(i32::MAX);
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (dx.hypot(dy).ceil() as u32).max(1);

    for step in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let t = step as f32 / steps as f32;
        #[allow(clippy::cast_possible_truncation)]
        let centre = (
            (from.0 + dx * t).round() as i32,
            (from.1 + dy * t).round() as i32,
        );
        draw_filled_circle_mut(canvas, centre, radius, color);
    }
}

/// Draw `text` with its bottom-left corner on `origin`.
pub fn put_text<P>(
    canvas: &mut Image<P>,
    text: &str,
    origin: Point<i32>,
    font_scale: f64,
    color: P,
    thickness: u32,
) where
    P: Pixel + 'static,
{
    let k = px_per_unit(font_scale);
    let mut pen = 0_i32;

    for ch in text.chars() {
        let glyph = glyphs::glyph(ch);
        let left = pen + BEARING;
        #[allow(clippy::cast_possible_truncation)]
        let to_px = |(x, y): (i8, i8)| -> (f32, f32) {
            (
                (f64::from(origin.x) + f64::from(left + i32::from(x)) * k) as f32,
                (f64::from(origin.y) - f64::from(y) * k) as f32,
            )
        };

        for stroke in glyph.strokes {
            if let [only] = stroke {
                let p = to_px(*only);
                draw_stroke(canvas, p, p, color, thickness);
                continue;
            }
            for pair in stroke.windows(2) {
                draw_stroke(canvas, to_px(pair[0]), to_px(pair[1]), color, thickness);
            }
        }

        pen += glyph.advance();
    }
}

/// Draw `text` centred on `centre` with an underline `2 * thickness` below
/// the baseline, as used for every directly drawn tile.
pub fn write_text_at_centre<P>(
    canvas: &mut Image<P>,
    centre: Point<i32>,
    text: &str,
    thickness: u32,
    font_scale: f64,
    color: P,
) where
    P: Pixel + 'static,
{
    let size = text_size(text, font_scale, thickness);
    let origin = text_origin(centre, size);

    let gap = i32::try_from(thickness.saturating_mul(2)).unwrap_or(i32::MAX);
    let line_y = origin.y.saturating_add(gap);
    let line_end_x = origin
        .x
        .saturating_add(i32::try_from(size.width).unwrap_or(i32::MAX));

    #[allow(clippy::cast_precision_loss)]
    draw_stroke(
        canvas,
        (origin.x as f32, line_y as f32),
        (line_end_x as f32, line_y as f32),
        color,
        thickness,
    );
    put_text(canvas, text, origin, font_scale, color, thickness);
}
