//! Gradient-domain (Poisson) blending for seamless watermark tiles.
//!
//! The masked region of a source patch is pasted into the destination by
//! solving `laplacian(f) = div(v)` with the destination as boundary condition.
//! In mixed mode the guidance field `v` takes, for every pixel pair, whichever
//! of the source or destination gradients is stronger, so the text keeps its
//! edges while the destination texture shows through elsewhere.

use image::{GrayImage, RgbImage};
use imageproc::point::Point;
use tracing::debug;

use crate::patch::mask_bounds;

/// Stop iterating once no pixel changes by more than this (in 0-255 units).
const TOLERANCE: f32 = 0.01;

/// Upper bound on relaxation sweeps per channel.
const MAX_ITERATIONS: usize = 5000;

/// 4-neighbourhood offsets.
const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// One unknown pixel of the Poisson system.
struct Cell {
    src: (u32, u32),
    dst: (u32, u32),
    /// Index of each neighbour if it is itself unknown.
    links: [Option<usize>; 4],
}

/// Blend the masked part of `src` into `dst`, centred on `centre`.
///
/// The bounding box of the non-zero mask pixels is positioned so that pixel
/// `((right - left) / 2, (bottom - top) / 2)` of the box lands on `centre`.
/// Masked pixels that would fall on or outside the border
/// of `dst` keep their destination value, as do masked pixels on the border
/// of `src`.
///
/// # Arguments
///
/// * `dst` - The destination image, modified in place.
/// * `src` - The source patch; must have the same dimensions as `mask`.
/// * `mask` - Non-zero where the source takes part in the blend.
/// * `centre` - Destination point the mask's bounding box is centred on.
pub fn seamless_clone_mixed(
    dst: &mut RgbImage,
    src: &RgbImage,
    mask: &GrayImage,
    centre: Point<i32>,
) {
    debug_assert_eq!(src.dimensions(), mask.dimensions());
    let Some((left, top, right, bottom)) = mask_bounds(mask) else {
        return;
    };

    let box_w = right - left + 1;
    let box_h = bottom - top + 1;
    // An even-sized box reaches one pixel further right and down than left and up.
    let off_x = i64::from(centre.x) - i64::from((right - left) / 2) - i64::from(left);
    let off_y = i64::from(centre.y) - i64::from((bottom - top) / 2) - i64::from(top);

    let cells = collect_cells(dst, src, mask, (left, top, box_w, box_h), (off_x, off_y));
    if cells.is_empty() {
        return;
    }

    let omega = relaxation_factor(box_w.min(box_h));
    let mut solved: Vec<[f32; 3]> = vec![[0.0; 3]; cells.len()];

    for ch in 0..3 {
        let rhs = guidance(&cells, dst, src, ch);
        let mut f: Vec<f32> = cells
            .iter()
            .map(|c| f32::from(dst.get_pixel(c.dst.0, c.dst.1)[ch]))
            .collect();

        let mut sweeps = 0;
        let mut max_delta = f32::INFINITY;
        while sweeps < MAX_ITERATIONS && max_delta > TOLERANCE {
            max_delta = 0.0;
            for (i, cell) in cells.iter().enumerate() {
                let linked: f32 = cell.links.iter().flatten().map(|&n| f[n]).sum();
                let delta = (rhs[i] + linked) / 4.0 - f[i];
                f[i] += omega * delta;
                max_delta = max_delta.max(delta.abs());
            }
            sweeps += 1;
        }
        debug!(channel = ch, sweeps, residual = max_delta, "poisson solve");

        for (out, v) in solved.iter_mut().zip(&f) {
            out[ch] = *v;
        }
    }

    for (cell, value) in cells.iter().zip(&solved) {
        let px = dst.get_pixel_mut(cell.dst.0, cell.dst.1);
        for (channel, v) in px.0.iter_mut().zip(value) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                *channel = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Gather the unknown pixels and link each to its unknown neighbours.
fn collect_cells(
    dst: &RgbImage,
    src: &RgbImage,
    mask: &GrayImage,
    (left, top, box_w, box_h): (u32, u32, u32, u32),
    (off_x, off_y): (i64, i64),
) -> Vec<Cell> {
    let (dst_w, dst_h) = (i64::from(dst.width()), i64::from(dst.height()));
    let (src_w, src_h) = src.dimensions();
    let mut index: Vec<Option<usize>> = vec![None; (box_w as usize) * (box_h as usize)];
    let mut cells = Vec::new();

    for by in 0..box_h {
        for bx in 0..box_w {
            let (sx, sy) = (left + bx, top + by);
            if mask.get_pixel(sx, sy)[0] == 0 {
                continue;
            }
            if sx == 0 || sy == 0 || sx + 1 >= src_w || sy + 1 >= src_h {
                continue;
            }
            let (dx, dy) = (i64::from(sx) + off_x, i64::from(sy) + off_y);
            if !(1..dst_w - 1).contains(&dx) || !(1..dst_h - 1).contains(&dy) {
                continue;
            }

            index[(by * box_w + bx) as usize] = Some(cells.len());
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            cells.push(Cell {
                src: (sx, sy),
                dst: (dx as u32, dy as u32),
                links: [None; 4],
            });
        }
    }

    for cell in &mut cells {
        for (link, (ox, oy)) in cell.links.iter_mut().zip(NEIGHBOURS) {
            let bx = i64::from(cell.src.0 - left) + ox;
            let by = i64::from(cell.src.1 - top) + oy;
            if !(0..i64::from(box_w)).contains(&bx) || !(0..i64::from(box_h)).contains(&by) {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                *link = index[(by * i64::from(box_w) + bx) as usize];
            }
        }
    }

    cells
}

/// Right-hand side of the system for one channel: the divergence of the
/// mixed guidance field plus the fixed boundary values.
fn guidance(cells: &[Cell], dst: &RgbImage, src: &RgbImage, ch: usize) -> Vec<f32> {
    cells
        .iter()
        .map(|cell| {
            let s = f32::from(src.get_pixel(cell.src.0, cell.src.1)[ch]);
            let d = f32::from(dst.get_pixel(cell.dst.0, cell.dst.1)[ch]);
            let mut b = 0.0;

            for (link, (ox, oy)) in cell.links.iter().zip(NEIGHBOURS) {
                let sq = src.get_pixel(shift(cell.src.0, ox), shift(cell.src.1, oy))[ch];
                let dq = dst.get_pixel(shift(cell.dst.0, ox), shift(cell.dst.1, oy))[ch];
                let grad_src = s - f32::from(sq);
                let grad_dst = d - f32::from(dq);
                b += if grad_src.abs() > grad_dst.abs() {
                    grad_src
                } else {
                    grad_dst
                };
                if link.is_none() {
                    b += f32::from(dq);
                }
            }
            b
        })
        .collect()
}

/// Offset a coordinate known to have an in-bounds neighbour.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn shift(v: u32, by: i64) -> u32 {
    (i64::from(v) + by) as u32
}

/// Over-relaxation factor for a region whose short side is `n` pixels.
#[allow(clippy::cast_precision_loss)]
fn relaxation_factor(n: u32) -> f32 {
    let s = (std::f32::consts::PI / (n as f32 + 1.0)).sin();
    2.0 / (1.0 + s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn square_patch(size: u32, inner: u32, value: u8) -> (RgbImage, GrayImage) {
        let mut src = RgbImage::new(size, size);
        let mut mask = GrayImage::new(size, size);
        let start = i32::try_from((size - inner) / 2).unwrap();
        draw_filled_rect_mut(
            &mut src,
            Rect::at(start + 2, start + 2).of_size(inner - 4, inner - 4),
            Rgb([value; 3]),
        );
        draw_filled_rect_mut(
            &mut mask,
            Rect::at(start, start).of_size(inner, inner),
            Luma([255]),
        );
        (src, mask)
    }

    #[test]
    fn white_patch_shows_on_black_destination() {
        let (src, mask) = square_patch(40, 20, 255);
        let mut dst = RgbImage::new(100, 100);
        seamless_clone_mixed(&mut dst, &src, &mask, Point::new(50, 50));

        // Source square (16x16) lands centred on (50, 50).
        let px = dst.get_pixel(50, 50);
        assert!(px[0] > 240, "centre pixel {px:?}");
        assert_eq!(dst.get_pixel(5, 5), &Rgb([0, 0, 0]));
        assert_eq!(dst.get_pixel(95, 50), &Rgb([0, 0, 0]));
    }

    #[test]
    fn flat_destination_level_is_kept_around_text() {
        let (src, mask) = square_patch(40, 20, 100);
        let mut dst = RgbImage::from_pixel(100, 100, Rgb([60, 60, 60]));
        seamless_clone_mixed(&mut dst, &src, &mask, Point::new(50, 50));

        let inside = dst.get_pixel(50, 50)[0];
        assert!((155..=165).contains(&inside), "inside {inside}");
        // Mask ring outside the source square keeps the destination level.
        let ring = dst.get_pixel(42, 42)[0];
        assert!((58..=62).contains(&ring), "ring {ring}");
        assert_eq!(dst.get_pixel(10, 10), &Rgb([60, 60, 60]));
    }

    #[test]
    fn stronger_destination_gradient_wins() {
        let src = RgbImage::from_pixel(20, 20, Rgb([80, 80, 80]));
        let mut mask = GrayImage::new(20, 20);
        draw_filled_rect_mut(&mut mask, Rect::at(5, 5).of_size(10, 10), Luma([255]));

        let mut dst = RgbImage::new(40, 40);
        for (x, _, px) in dst.enumerate_pixels_mut() {
            let v = u8::try_from(x * 6).unwrap();
            *px = Rgb([v, v, v]);
        }
        let before = dst.clone();
        seamless_clone_mixed(&mut dst, &src, &mask, Point::new(20, 20));

        for y in 16..25 {
            for x in 16..25 {
                let diff =
                    i32::from(dst.get_pixel(x, y)[0]) - i32::from(before.get_pixel(x, y)[0]);
                assert!(diff.abs() <= 1, "({x}, {y}) moved by {diff}");
            }
        }
    }

    #[test]
    fn region_outside_destination_is_skipped() {
        let (src, mask) = square_patch(40, 20, 255);
        let mut dst = RgbImage::new(30, 30);

        seamless_clone_mixed(&mut dst, &src, &mask, Point::new(500, 500));
        assert!(dst.pixels().all(|p| p[0] == 0));

        // Only the corner that overlaps the destination is touched.
        seamless_clone_mixed(&mut dst, &src, &mask, Point::new(0, 0));
        assert_eq!(dst.dimensions(), (30, 30));
        for (x, y, px) in dst.enumerate_pixels() {
            if x >= 10 || y >= 10 {
                assert_eq!(px[0], 0, "({x}, {y}) changed");
            }
        }
    }

    #[test]
    fn even_sized_mask_reaches_further_right_and_down() {
        let mut src = RgbImage::new(10, 10);
        let mut mask = GrayImage::new(10, 10);
        draw_filled_rect_mut(&mut mask, Rect::at(3, 3).of_size(4, 4), Luma([255]));
        draw_filled_rect_mut(&mut src, Rect::at(4, 4).of_size(2, 2), Rgb([255; 3]));

        let mut dst = RgbImage::new(20, 20);
        seamless_clone_mixed(&mut dst, &src, &mask, Point::new(10, 10));

        // Box spans 3..=6, so its pixel 1 sits on the centre: white lands on 10..=11.
        for (x, y) in [(10, 10), (11, 11), (10, 11), (11, 10)] {
            assert!(dst.get_pixel(x, y)[0] > 200, "({x}, {y}) not white");
        }
        for (x, y) in [(9, 9), (9, 10), (10, 9), (12, 12)] {
            assert!(dst.get_pixel(x, y)[0] < 50, "({x}, {y}) painted");
        }
    }

    #[test]
    fn empty_mask_leaves_destination_untouched() {
        let src = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let mask = GrayImage::new(10, 10);
        let mut dst = RgbImage::from_pixel(20, 20, Rgb([7, 8, 9]));
        seamless_clone_mixed(&mut dst, &src, &mask, Point::new(10, 10));
        assert!(dst.pixels().all(|p| *p == Rgb([7, 8, 9])));
    }

    #[test]
    fn relaxation_factor_is_between_one_and_two() {
        for n in [1, 3, 12, 100, 2000] {
            let w = relaxation_factor(n);
            assert!((1.0..2.0).contains(&w), "omega {w} for n={n}");
        }
    }
}
