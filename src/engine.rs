//! Core watermarking engine.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::point::Point;
use tracing::debug;

use crate::blending;
use crate::error::{Error, Result};
use crate::grid::{Coverage, Grid, Layout};
use crate::patch::WatermarkPatch;
use crate::text::{self, TextSize};

/// Default stroke thickness in pixels.
pub const DEFAULT_THICKNESS: u32 = 1;

/// Default font scale.
pub const DEFAULT_FONT_SCALE: f64 = 0.5;

/// Thickest stroke accepted, in pixels.
pub const MAX_THICKNESS: u32 = 64;

/// Largest font scale accepted.
pub const MAX_FONT_SCALE: f64 = 16.0;

/// Default direct-draw color, (236, 236, 238) in BGR order.
pub const DEFAULT_COLOR: Rgb<u8> = Rgb([238, 236, 236]);

/// How each tile is put on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Draw text and underline directly in the requested color.
    Direct,
    /// Blend a pre-rendered gray text patch with mixed-gradient Poisson blending.
    Seamless,
}

/// Options controlling watermark rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    /// Rendering strategy.
    pub mode: Mode,
    /// Stroke thickness in pixels (>= 1).
    pub thickness: u32,
    /// Font scale (> 0).
    pub font_scale: f64,
    /// Paint color for [`Mode::Direct`]; ignored by [`Mode::Seamless`].
    pub color: Rgb<u8>,
    /// Tile size factors.
    pub layout: Layout,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Seamless,
            thickness: DEFAULT_THICKNESS,
            font_scale: DEFAULT_FONT_SCALE,
            color: DEFAULT_COLOR,
            layout: Layout::default(),
        }
    }
}

impl WatermarkOptions {
    /// Check thickness, font scale and layout.
    ///
    /// Thickness must lie in `1..=MAX_THICKNESS` and the font scale in
    /// `(0, MAX_FONT_SCALE]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStyle`] or [`Error::InvalidLayout`].
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_THICKNESS).contains(&self.thickness) {
            return Err(Error::InvalidStyle(format!(
                "thickness must be between 1 and {MAX_THICKNESS}, got {}",
                self.thickness
            )));
        }
        let scale = self.font_scale;
        if scale.is_nan() || scale <= 0.0 || scale > MAX_FONT_SCALE {
            return Err(Error::InvalidStyle(format!(
                "font scale must be in (0, {MAX_FONT_SCALE}], got {scale}"
            )));
        }
        self.layout.validate()
    }
}

/// A strategy for rendering one watermark tile.
pub trait TileRenderer {
    /// Grid coverage policy this strategy uses.
    fn coverage(&self) -> Coverage;

    /// Render one tile centred on `centre`, modifying `canvas` in place.
    fn render_tile(&self, canvas: &mut RgbImage, centre: Point<i32>);
}

/// Draws text and underline directly in a solid color.
#[derive(Debug, Clone)]
pub struct DirectDraw {
    text: String,
    thickness: u32,
    font_scale: f64,
    color: Rgb<u8>,
}

impl DirectDraw {
    /// Create a direct-draw renderer.
    #[must_use]
    pub fn new(text: &str, thickness: u32, font_scale: f64, color: Rgb<u8>) -> Self {
        Self {
            text: text.to_owned(),
            thickness,
            font_scale,
            color,
        }
    }
}

impl TileRenderer for DirectDraw {
    fn coverage(&self) -> Coverage {
        Coverage::Full
    }

    fn render_tile(&self, canvas: &mut RgbImage, centre: Point<i32>) {
        text::write_text_at_centre(
            canvas,
            centre,
            &self.text,
            self.thickness,
            self.font_scale,
            self.color,
        );
    }
}

/// Blends a pre-rendered patch into every tile.
#[derive(Debug, Clone)]
pub struct PatchBlend {
    source: RgbImage,
    patch: WatermarkPatch,
}

impl PatchBlend {
    /// Wrap a rendered patch, expanding it to three channels once.
    #[must_use]
    pub fn new(patch: WatermarkPatch) -> Self {
        Self {
            source: patch.to_rgb(),
            patch,
        }
    }

    /// The underlying gray patch and mask.
    #[must_use]
    pub fn patch(&self) -> &WatermarkPatch {
        &self.patch
    }
}

impl TileRenderer for PatchBlend {
    fn coverage(&self) -> Coverage {
        Coverage::Partial
    }

    fn render_tile(&self, canvas: &mut RgbImage, centre: Point<i32>) {
        blending::seamless_clone_mixed(canvas, &self.source, &self.patch.mask, centre);
    }
}

/// The watermark engine for one text and set of options.
///
/// Create once with [`Watermarker::new()`] and reuse for multiple images.
/// The text is measured, and in seamless mode the patch rendered, at
/// construction.
pub struct Watermarker {
    text_size: TextSize,
    layout: Layout,
    renderer: Box<dyn TileRenderer + Send + Sync>,
}

impl Watermarker {
    /// Build an engine for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyText`] for an empty string, the error from
    /// [`WatermarkOptions::validate`], or the error from
    /// [`Layout::checked_tile_size`] when the text yields an unusable tile.
    pub fn new(text: &str, opts: &WatermarkOptions) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        opts.validate()?;

        let text_size = text::text_size(text, opts.font_scale, opts.thickness);
        opts.layout.checked_tile_size(text_size)?;
        debug!(
            width = text_size.width,
            height = text_size.height,
            baseline = text_size.baseline,
            "text size"
        );

        let renderer: Box<dyn TileRenderer + Send + Sync> = match opts.mode {
            Mode::Direct => Box::new(DirectDraw::new(
                text,
                opts.thickness,
                opts.font_scale,
                opts.color,
            )),
            Mode::Seamless => Box::new(PatchBlend::new(WatermarkPatch::render(
                text,
                opts.thickness,
                opts.font_scale,
                opts.layout,
            )?)),
        };

        Ok(Self {
            text_size,
            layout: opts.layout,
            renderer,
        })
    }

    /// Measured size of the watermark text.
    #[must_use]
    pub fn text_size(&self) -> TextSize {
        self.text_size
    }

    /// Plan the tile grid for a canvas of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateTile`] if the tile size is zero.
    pub fn plan(&self, width: u32, height: u32) -> Result<Grid> {
        let (tile_w, tile_h) = self.layout.tile_size(self.text_size);
        Grid::plan(width, height, tile_w, tile_h, self.renderer.coverage())
    }

    /// Watermark a copy of `image`; the input is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateTile`] if the tile size is zero.
    pub fn apply(&self, image: &RgbImage) -> Result<RgbImage> {
        let grid = self.plan(image.width(), image.height())?;
        Ok(self.render(image, &grid))
    }

    fn render(&self, image: &RgbImage, grid: &Grid) -> RgbImage {
        let mut canvas = image.clone();
        for centre in grid.centres() {
            self.renderer.render_tile(&mut canvas, centre);
        }
        canvas
    }

    /// Process a single image file: load, watermark, save.
    ///
    /// Returns the grid that was applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the input cannot be decoded, and the errors
    /// of [`save_image`] if the output cannot be written.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<Grid> {
        let image = load_image(input)?;
        let grid = self.plan(image.width(), image.height())?;
        let watermarked = self.render(&image, &grid);
        save_image(&watermarked, output)?;
        Ok(grid)
    }
}

/// Watermark a copy of `image` with `text` in one call.
///
/// # Errors
///
/// See [`Watermarker::new`] and [`Watermarker::apply`].
pub fn watermark(image: &RgbImage, text: &str, opts: &WatermarkOptions) -> Result<RgbImage> {
    Watermarker::new(text, opts)?.apply(image)
}

/// Load an image from disk as 8-bit RGB.
///
/// # Errors
///
/// Returns [`Error::Load`] if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let dyn_img = image::open(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(dyn_img.to_rgb8())
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save an RGB image with format-specific quality settings.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if the extension has no encoder,
/// [`Error::Io`] if the file cannot be created and [`Error::Encode`] if
/// encoding fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
    let encode_err = |source: image::ImageError| Error::Encode {
        path: path.to_path_buf(),
        source,
    };

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(img).map_err(encode_err)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            img.save_with_format(path, format).map_err(encode_err)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}
