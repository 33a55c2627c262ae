//! Pre-rendered watermark patch for seamless blending.

use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::error::Result;
use crate::grid::Layout;
use crate::text::{self, TextSize};

/// Mask value marking pixels that take part in the blend.
pub const MASK_ON: u8 = 255;

/// Gray text patch plus the mask of the region to blend.
#[derive(Debug, Clone)]
pub struct WatermarkPatch {
    /// Text drawn at 255 on a black canvas.
    pub text: GrayImage,
    /// 255 inside the blend rectangle, 0 elsewhere.
    pub mask: GrayImage,
    /// Measured size of the rendered text.
    pub text_size: TextSize,
}

impl WatermarkPatch {
    /// Render `text` centred on a canvas of one tile and build its mask.
    ///
    /// The canvas is `text_width * scale_w` wide and `text_height * scale_h`
    /// tall. The mask covers the text box grown by one pixel on every side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`](crate::Error::InvalidLayout) for a
    /// layout with factors <= 1,
    /// [`Error::DegenerateTile`](crate::Error::DegenerateTile) if the text
    /// measures zero pixels and
    /// [`Error::TileTooLarge`](crate::Error::TileTooLarge) if one tile would exceed
    /// [`MAX_TILE_PIXELS`](crate::grid::MAX_TILE_PIXELS).
    pub fn render(text: &str, thickness: u32, font_scale: f64, layout: Layout) -> Result<Self> {
        layout.validate()?;
        let text_size = text::text_size(text, font_scale, thickness);
        let (width, height) = layout.checked_tile_size(text_size)?;

        let mut canvas = GrayImage::new(width, height);
        let centre = Point::new(
            i32::try_from(width / 2).unwrap_or(i32::MAX),
            i32::try_from(height / 2).unwrap_or(i32::MAX),
        );
        let origin = text::text_origin(centre, text_size);
        text::put_text(
            &mut canvas,
            text,
            origin,
            font_scale,
            Luma([MASK_ON]),
            thickness,
        );

        let mut mask = GrayImage::new(width, height);
        let top = origin
            .y
            .saturating_sub(i32::try_from(text_size.height).unwrap_or(i32::MAX))
            - 1;
        let blend_region =
            Rect::at(origin.x - 1, top).of_size(text_size.width + 2, text_size.height + 2);
        draw_filled_rect_mut(&mut mask, blend_region, Luma([MASK_ON]));

        Ok(Self {
            text: canvas,
            mask,
            text_size,
        })
    }

    /// The patch as a three-channel image with the gray value in every channel.
    #[must_use]
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.text.width(), self.text.height(), |x, y| {
            let v = self.text.get_pixel(x, y)[0];
            image::Rgb([v, v, v])
        })
    }

    /// Bounding box `(left, top, right, bottom)` of the mask's on-region, inclusive.
    #[must_use]
    pub fn mask_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        mask_bounds(&self.mask)
    }
}

/// Inclusive bounding box of all non-zero pixels in `mask`.
pub(crate) fn mask_bounds(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in mask.enumerate_pixels() {
        if px[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
        });
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn patch_is_one_tile_in_size() {
        let patch = WatermarkPatch::render("WatermarkIt", 1, 0.5, Layout::default()).unwrap();
        let size = patch.text_size;
        assert_eq!(patch.text.dimensions(), (size.width * 3, size.height * 6));
        assert_eq!(patch.mask.dimensions(), patch.text.dimensions());
    }

    #[test]
    fn mask_is_text_box_grown_by_one_pixel() {
        let patch = WatermarkPatch::render("WatermarkIt", 1, 0.5, Layout::default()).unwrap();
        let size = patch.text_size;
        let (w, h) = patch.mask.dimensions();

        let origin = text::text_origin(
            Point::new(i32::try_from(w / 2).unwrap(), i32::try_from(h / 2).unwrap()),
            size,
        );
        let left = u32::try_from(origin.x - 1).unwrap();
        let top = u32::try_from(origin.y - i32::try_from(size.height).unwrap() - 1).unwrap();
        let right = left + size.width + 1;
        let bottom = top + size.height + 1;

        assert_eq!(patch.mask_bounds(), Some((left, top, right, bottom)));
        assert!(right < w && bottom < h);

        for (x, y, px) in patch.mask.enumerate_pixels() {
            let inside = (left..=right).contains(&x) && (top..=bottom).contains(&y);
            let expected = if inside { MASK_ON } else { 0 };
            assert_eq!(px[0], expected, "mask mismatch at ({x}, {y})");
        }
    }

    #[test]
    fn text_ink_is_inside_the_mask() {
        let patch = WatermarkPatch::render("Hello", 1, 1.0, Layout::default()).unwrap();
        let mut inked = 0;
        for (x, y, px) in patch.text.enumerate_pixels() {
            if px[0] > 0 {
                inked += 1;
                assert_eq!(
                    patch.mask.get_pixel(x, y)[0],
                    MASK_ON,
                    "ink outside mask at ({x}, {y})"
                );
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn rgb_patch_replicates_gray() {
        let patch = WatermarkPatch::render("ab", 1, 0.5, Layout::default()).unwrap();
        let rgb = patch.to_rgb();
        assert_eq!(rgb.dimensions(), patch.text.dimensions());
        for (x, y, px) in rgb.enumerate_pixels() {
            let v = patch.text.get_pixel(x, y)[0];
            assert_eq!(px.0, [v, v, v]);
        }
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let layout = Layout {
            scale_w: 1,
            scale_h: 6,
        };
        assert!(matches!(
            WatermarkPatch::render("ab", 1, 0.5, layout),
            Err(Error::InvalidLayout { .. })
        ));
    }

    #[test]
    fn oversized_patch_is_rejected() {
        assert!(matches!(
            WatermarkPatch::render("WatermarkIt", 1, 200.0, Layout::default()),
            Err(Error::TileTooLarge { .. })
        ));
    }

    #[test]
    fn empty_mask_has_no_bounds() {
        assert_eq!(mask_bounds(&GrayImage::new(8, 8)), None);
    }
}
