//! Tile a repeating text watermark across an image.
//!
//! The text is measured once, a grid of tiles (text box scaled by a fixed
//! [`Layout`]) is laid over the image, and every tile receives a copy of the
//! text centred on it. Two strategies are available:
//!
//! - [`Mode::Direct`] draws the text and an underline in a solid color,
//!   adding an extra row and column so the whole canvas is covered.
//! - [`Mode::Seamless`] pre-renders the text into a gray patch and blends it
//!   into each tile with mixed-gradient Poisson blending, so the text picks up
//!   the local background instead of a flat paint color.
//!
//! # Quick Start
//!
//! ```no_run
//! use watermarkit::{Mode, WatermarkOptions, Watermarker};
//!
//! let opts = WatermarkOptions { mode: Mode::Direct, ..WatermarkOptions::default() };
//! let engine = Watermarker::new("WatermarkIt", &opts).expect("invalid options");
//! let img = image::open("photo.jpg").unwrap().to_rgb8();
//! let marked = engine.apply(&img).unwrap();
//! marked.save("watermarked.jpg").unwrap();
//! ```
//!
//! # Grid planning
//!
//! ```
//! use watermarkit::{Coverage, Grid};
//!
//! let grid = Grid::plan(500, 500, 303, 72, Coverage::Full).unwrap();
//! assert_eq!((grid.num_x, grid.num_y), (2, 7));
//! ```

#![deny(missing_docs)]

pub mod blending;
mod engine;
pub mod error;
mod glyphs;
pub mod grid;
pub mod patch;
pub mod text;

pub use engine::{
    is_supported_image, load_image, save_image, watermark, DirectDraw, Mode, PatchBlend,
    TileRenderer, WatermarkOptions, Watermarker, DEFAULT_COLOR, DEFAULT_FONT_SCALE,
    DEFAULT_THICKNESS, MAX_FONT_SCALE, MAX_THICKNESS,
};
pub use error::{Error, Result};
pub use grid::{Coverage, Grid, Layout};
pub use patch::WatermarkPatch;
pub use text::TextSize;
