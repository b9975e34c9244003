// ============================================================================
// KeyPixel command line: which file to edit and how big a new one should be
// ============================================================================
//
// Usage examples:
//   keypixel --filepath sprite.png
//   keypixel -f new_tile.png --resolution 16,16
//   keypixel -f sprite.png --verbose

use std::path::PathBuf;

use clap::Parser;

use crate::io::{self, PersistenceError};
use crate::project::Project;
use crate::settings::AppSettings;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Keyboard-driven pixel art editor.
#[derive(Parser, Debug)]
#[command(
    name = "keypixel",
    about = "Keyboard-driven pixel art editor",
    long_about = "Open an image for pixel editing, or create it when the file does\n\
                  not exist yet. Press space inside the editor for the key list.\n\n\
                  Example:\n  \
                  keypixel --filepath sprite.png\n  \
                  keypixel -f tile.png --resolution 16,16"
)]
pub struct CliArgs {
    /// Image to edit. Created on first save when it does not exist.
    #[arg(short, long, value_name = "FILE")]
    pub filepath: PathBuf,

    /// Size of a newly created image as "WIDTH,HEIGHT".
    /// Ignored when the file already exists.
    #[arg(short, long, value_name = "W,H", value_parser = parse_resolution)]
    pub resolution: Option<Resolution>,

    /// Keep debug records in the session log and echo them to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Parse `"W,H"` with both values positive.
pub fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let (w, h) = s
        .split_once(',')
        .ok_or_else(|| format!("expected WIDTH,HEIGHT, got {s:?}"))?;
    let parse = |v: &str| -> Result<u32, String> {
        match v.trim().parse::<u32>() {
            Ok(0) => Err("resolution values must be greater than zero".to_string()),
            Ok(n) => Ok(n),
            Err(e) => Err(format!("invalid resolution value {v:?}: {e}")),
        }
    };
    Ok(Resolution {
        width: parse(w)?,
        height: parse(h)?,
    })
}

// ============================================================================
// Startup
// ============================================================================

/// Load the file named on the command line, or start a blank project for it.
///
/// A new canvas uses `--resolution` when given, else the size from settings.
pub fn open_project(args: &CliArgs, settings: &AppSettings) -> Result<Project, PersistenceError> {
    let size = args.resolution.unwrap_or(Resolution {
        width: settings.new_image_width,
        height: settings.new_image_height,
    });
    let (canvas, created) = io::open_or_create(&args.filepath, size.width, size.height)?;
    if created {
        Ok(Project::new_blank(args.filepath.clone(), canvas))
    } else {
        if args.resolution.is_some() {
            log::info!("--resolution ignored, {} already exists", args.filepath.display());
        }
        Ok(Project::from_file(args.filepath.clone(), canvas))
    }
}
