use image::{ImageError, ImageFormat};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::canvas::{CanvasError, PixelCanvas};

/// Error type for loading and saving images.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("could not write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("'{}' does not have a supported image extension", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Decode any raster format the `image` crate understands into a canvas.
pub fn load_image(path: &Path) -> Result<PixelCanvas, PersistenceError> {
    let img = image::open(path)
        .map_err(|source| PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    log::info!(
        "Loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(PixelCanvas::from_image(img)?)
}

/// Encode the canvas to `path`. The format is inferred from the extension.
pub fn save_image(canvas: &PixelCanvas, path: &Path) -> Result<(), PersistenceError> {
    let format = ImageFormat::from_path(path).map_err(|_| PersistenceError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    canvas
        .as_image()
        .save_with_format(path, format)
        .map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    log::info!("Saved {}", path.display());
    Ok(())
}

/// Load `path` if it is an existing file, otherwise allocate a transparent
/// `width`×`height` canvas. Nothing is written to disk here.
///
/// The returned flag is `true` when the canvas was freshly created.
pub fn open_or_create(
    path: &Path,
    width: u32,
    height: u32,
) -> Result<(PixelCanvas, bool), PersistenceError> {
    if path.is_file() {
        return Ok((load_image(path)?, false));
    }

    log::info!(
        "{} does not exist, creating a new {}x{} image",
        path.display(),
        width,
        height
    );
    Ok((PixelCanvas::new(width, height)?, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_save_and_load_keeps_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        let mut canvas = PixelCanvas::new(3, 2).unwrap();
        canvas.set(0, 0, Rgba([172, 50, 50, 255])).unwrap();
        canvas.set(2, 1, Rgba([91, 110, 225, 128])).unwrap();

        save_image(&canvas, &path).unwrap();
        let loaded = load_image(&path).unwrap();

        assert_eq!(loaded, canvas);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.notanimage");
        let canvas = PixelCanvas::new(2, 2).unwrap();

        let err = save_image(&canvas, &path).unwrap_err();

        assert!(matches!(err, PersistenceError::UnsupportedFormat { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_reports_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, PersistenceError::Read { .. }));
    }

    #[test]
    fn open_or_create_allocates_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.png");

        let (canvas, created) = open_or_create(&path, 20, 10).unwrap();

        assert!(created);
        assert_eq!((canvas.width(), canvas.height()), (20, 10));
        assert!(!path.exists());
    }

    #[test]
    fn open_or_create_loads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.png");
        let canvas = PixelCanvas::filled(4, 4, Rgba([0, 0, 0, 255])).unwrap();
        save_image(&canvas, &path).unwrap();

        let (loaded, created) = open_or_create(&path, 99, 99).unwrap();

        assert!(!created);
        assert_eq!(loaded, canvas);
    }

    #[test]
    fn open_or_create_rejects_zero_size() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_or_create(&dir.path().join("x.png"), 0, 4).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Canvas(CanvasError::InvalidDimensions { .. })
        ));
    }
}
