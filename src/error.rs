//! Error types for the watermarkit crate.

use std::path::PathBuf;

/// Errors that can occur while watermarking an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input image could not be read or decoded.
    #[error("failed to load image {}: {source}", path.display())]
    Load {
        /// Path of the image that failed to load.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// The encoder failed while writing the output image.
    #[error("failed to encode image {}: {source}", path.display())]
    Encode {
        /// Path of the output image.
        path: PathBuf,
        /// Underlying encoder error.
        source: image::ImageError,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The watermark text is empty.
    #[error("watermark text must not be empty")]
    EmptyText,

    /// Stroke thickness or font scale is out of range.
    #[error("invalid text style: {0}")]
    InvalidStyle(String),

    /// A layout scale factor is not greater than one.
    #[error("layout scale factors must be > 1 (got {scale_w}x{scale_h})")]
    InvalidLayout {
        /// Horizontal tile factor.
        scale_w: u32,
        /// Vertical tile factor.
        scale_h: u32,
    },

    /// The measured text produced a zero-size grid tile.
    #[error("degenerate {width}x{height} grid tile")]
    DegenerateTile {
        /// Tile width in pixels.
        width: u32,
        /// Tile height in pixels.
        height: u32,
    },

    /// The measured text produced a grid tile too large to render.
    #[error("{width}x{height} grid tile exceeds the {max} pixel limit")]
    TileTooLarge {
        /// Tile width in pixels.
        width: u32,
        /// Tile height in pixels.
        height: u32,
        /// Largest allowed tile area in pixels.
        max: u64,
    },
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let layout = Error::InvalidLayout {
            scale_w: 1,
            scale_h: 6,
        };
        assert!(layout.to_string().contains("1x6"));

        let large = Error::TileTooLarge {
            width: 70_000,
            height: 2_000,
            max: 1 << 26,
        };
        assert!(large.to_string().contains("70000x2000"));

        let tile = Error::DegenerateTile {
            width: 0,
            height: 12,
        };
        assert!(tile.to_string().contains("0x12"));
    }

    #[test]
    fn load_error_names_the_path() {
        let err = Error::Load {
            path: PathBuf::from("/tmp/missing.png"),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.png"));
        assert!(msg.contains("no such file"));
    }
}
