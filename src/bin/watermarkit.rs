use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use watermarkit::{
    Mode, WatermarkOptions, Watermarker, DEFAULT_FONT_SCALE, DEFAULT_THICKNESS, MAX_FONT_SCALE,
    MAX_THICKNESS,
};

#[derive(Parser)]
#[command(
    name = "watermarkit",
    about = "Watermark an image with a text",
    version,
    after_help = "Example: watermarkit photo.jpg \"(c) me\" --des marked.png\n\n\
                  Seamless mode blends gray text into the image and ignores --color."
)]
struct Cli {
    /// Image to watermark
    image_path: PathBuf,

    /// Text to watermark with
    text: String,

    /// Output image path (format taken from the extension)
    #[arg(long, default_value = "watermarked.jpg")]
    des: PathBuf,

    /// How tiles are rendered
    #[arg(short, long, value_enum, default_value_t = CliMode::Seamless)]
    mode: CliMode,

    /// Stroke thickness in pixels
    #[arg(long, default_value_t = DEFAULT_THICKNESS)]
    thickness: u32,

    /// Font scale
    #[arg(long, default_value_t = DEFAULT_FONT_SCALE)]
    font_scale: f64,

    /// Text color for direct mode as B,G,R
    #[arg(long, default_value = "236,236,238", value_parser = parse_bgr)]
    color: [u8; 3],

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliMode {
    /// Blend a gray text patch with Poisson blending
    Seamless,
    /// Draw text and underline in a solid color
    Direct,
}

fn parse_bgr(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [b, g, r] = parts.as_slice() else {
        return Err(format!("expected B,G,R, got {s:?}"));
    };
    let channel = |v: &str| v.parse::<u8>().map_err(|e| format!("bad channel {v:?}: {e}"));
    Ok([channel(*r)?, channel(*g)?, channel(*b)?])
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose && cli.quiet {
        eprintln!("Error: Cannot specify both --verbose and --quiet");
        process::exit(1);
    }

    if !(1..=MAX_THICKNESS).contains(&cli.thickness) {
        eprintln!("Error: Thickness must be between 1 and {MAX_THICKNESS}");
        process::exit(1);
    }

    if cli.font_scale.is_nan() || cli.font_scale <= 0.0 || cli.font_scale > MAX_FONT_SCALE {
        eprintln!("Error: Font scale must be greater than 0 and at most {MAX_FONT_SCALE}");
        process::exit(1);
    }

    init_tracing(cli.verbose, cli.quiet);

    if !cli.image_path.exists() {
        eprintln!(
            "Error: Input path does not exist: {}",
            cli.image_path.display()
        );
        process::exit(1);
    }

    if !watermarkit::is_supported_image(&cli.des) {
        eprintln!(
            "Error: Unsupported output format: {} (use jpg, png, webp or bmp)",
            cli.des.display()
        );
        process::exit(1);
    }

    let opts = WatermarkOptions {
        mode: match cli.mode {
            CliMode::Seamless => Mode::Seamless,
            CliMode::Direct => Mode::Direct,
        },
        thickness: cli.thickness,
        font_scale: cli.font_scale,
        color: image::Rgb(cli.color),
        ..WatermarkOptions::default()
    };

    let engine = match Watermarker::new(&cli.text, &opts) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Fatal: Failed to initialize watermarker: {e}");
            process::exit(1);
        }
    };

    match engine.process_file(&cli.image_path, &cli.des) {
        Ok(grid) => {
            if !cli.quiet {
                println!(
                    "[OK] {} -> {} ({}x{} tiles)",
                    file_name(&cli.image_path),
                    cli.des.display(),
                    grid.num_x,
                    grid.num_y
                );
            }
        }
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", file_name(&cli.image_path));
            process::exit(1);
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_is_read_in_bgr_order() {
        assert_eq!(parse_bgr("236,236,238"), Ok([238, 236, 236]));
        assert_eq!(parse_bgr(" 1, 2 ,3"), Ok([3, 2, 1]));
    }

    #[test]
    fn malformed_color_is_rejected() {
        assert!(parse_bgr("1,2").is_err());
        assert!(parse_bgr("1,2,3,4").is_err());
        assert!(parse_bgr("1,2,256").is_err());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["watermarkit", "in.jpg", "WatermarkIt"]).unwrap();
        assert_eq!(cli.des, PathBuf::from("watermarked.jpg"));
        assert!(matches!(cli.mode, CliMode::Seamless));
        assert_eq!(cli.thickness, 1);
        assert_eq!(cli.color, [238, 236, 236]);
    }
}
