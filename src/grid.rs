//! Grid planning for tiled watermarks.
//!
//! A tile is the text box scaled by the [`Layout`] factors. The grid covers
//! the canvas with `canvas / tile` tiles per axis (floor division), plus one
//! extra tile per axis when full coverage is requested.

use imageproc::point::Point;
use tracing::info;

use crate::error::{Error, Result};
use crate::text::TextSize;

/// Horizontal tile factor applied to the text width.
pub const SCALE_FACTOR_W: u32 = 3;
/// Vertical tile factor applied to the text height.
pub const SCALE_FACTOR_H: u32 = 6;

/// Largest tile area, in pixels, that a patch may be rendered at.
pub const MAX_TILE_PIXELS: u64 = 1 << 26;

/// Tile layout parameters shared by grid planning and patch generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Tile width as a multiple of the text width.
    pub scale_w: u32,
    /// Tile height as a multiple of the text height.
    pub scale_h: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            scale_w: SCALE_FACTOR_W,
            scale_h: SCALE_FACTOR_H,
        }
    }
}

impl Layout {
    /// Check that both factors leave room around the text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] unless both factors are greater than one.
    pub fn validate(&self) -> Result<()> {
        if self.scale_w > 1 && self.scale_h > 1 {
            Ok(())
        } else {
            Err(Error::InvalidLayout {
                scale_w: self.scale_w,
                scale_h: self.scale_h,
            })
        }
    }

    /// Tile size `(width, height)` for text of the given size.
    #[must_use]
    pub fn tile_size(&self, text: TextSize) -> (u32, u32) {
        (
            text.width.saturating_mul(self.scale_w),
            text.height.saturating_mul(self.scale_h),
        )
    }

    /// Tile size for text of the given size, rejecting empty or oversized tiles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateTile`] if either dimension is zero and
    /// [`Error::TileTooLarge`] if the area exceeds [`MAX_TILE_PIXELS`].
    pub fn checked_tile_size(&self, text: TextSize) -> Result<(u32, u32)> {
        let (width, height) = self.tile_size(text);
        if width == 0 || height == 0 {
            return Err(Error::DegenerateTile { width, height });
        }
        if u64::from(width) * u64::from(height) > MAX_TILE_PIXELS {
            return Err(Error::TileTooLarge {
                width,
                height,
                max: MAX_TILE_PIXELS,
            });
        }
        Ok((width, height))
    }
}

/// How far the grid reaches past the canvas edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// One extra tile per axis so the last partial row and column are covered.
    Full,
    /// Only tiles that fit entirely inside the canvas.
    Partial,
}

/// A planned tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Number of tile columns.
    pub num_x: u32,
    /// Number of tile rows.
    pub num_y: u32,
}

impl Grid {
    /// Plan a grid of `tile_width` x `tile_height` tiles over a canvas.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateTile`] if either tile dimension is zero.
    pub fn plan(
        canvas_width: u32,
        canvas_height: u32,
        tile_width: u32,
        tile_height: u32,
        coverage: Coverage,
    ) -> Result<Self> {
        if tile_width == 0 || tile_height == 0 {
            return Err(Error::DegenerateTile {
                width: tile_width,
                height: tile_height,
            });
        }

        let extra = match coverage {
            Coverage::Full => 1,
            Coverage::Partial => 0,
        };
        let grid = Self {
            tile_width,
            tile_height,
            num_x: canvas_width / tile_width + extra,
            num_y: canvas_height / tile_height + extra,
        };

        info!(num_x = grid.num_x, num_y = grid.num_y, "grid size");
        Ok(grid)
    }

    /// Total number of tiles.
    #[must_use]
    pub fn len(&self) -> u64 {
        u64::from(self.num_x) * u64::from(self.num_y)
    }

    /// Whether the grid has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_x == 0 || self.num_y == 0
    }

    /// Centre of tile `(i, j)`: `(tw/2 + i*tw, th/2 + j*th)`.
    #[must_use]
    pub fn centre(&self, i: u32, j: u32) -> Point<i32> {
        let axis = |tile: u32, n: u32| {
            let c = u64::from(tile / 2) + u64::from(n) * u64::from(tile);
            i32::try_from(c).unwrap_or(i32::MAX)
        };
        Point::new(axis(self.tile_width, i), axis(self.tile_height, j))
    }

    /// All tile centres, columns in the outer loop and rows in the inner.
    pub fn centres(&self) -> impl Iterator<Item = Point<i32>> + '_ {
        (0..self.num_x).flat_map(move |i| (0..self.num_y).map(move |j| self.centre(i, j)))
    }
}
