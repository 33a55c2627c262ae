//! Watermark a single image with directly drawn text.
//!
//! Usage:
//! ```sh
//! cargo run --example watermark_image -- input.jpg "my text" output.jpg
//! ```

use std::env;
use std::process;

use watermarkit::{Mode, WatermarkOptions, Watermarker};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <input> <text> <output>", args[0]);
        process::exit(1);
    }

    let opts = WatermarkOptions {
        mode: Mode::Direct,
        ..WatermarkOptions::default()
    };
    let engine = match Watermarker::new(&args[2], &opts) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    match engine.process_file(args[1].as_ref(), args[3].as_ref()) {
        Ok(grid) => println!("Done: {}x{} tiles", grid.num_x, grid.num_y),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
