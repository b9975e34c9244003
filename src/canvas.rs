use image::{Rgba, RgbaImage};
use thiserror::Error;

/// A single RGBA pixel value.
pub type Color = Rgba<u8>;

/// Fully transparent pixel. Erasing is drawing with this color.
pub const TRANSPARENT: Color = Rgba([0, 0, 0, 0]);

/// Errors raised by direct canvas access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

// ============================================================================
// SYMMETRY
// ============================================================================

/// Mirror mode applied to a single pixel write.
///
/// The names follow the axis the *coordinate* is mirrored on, not the axis
/// drawn on screen: `Horizontal` flips top/bottom (changes `y`), `Vertical`
/// flips left/right (changes `x`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SymmetryMode {
    #[default]
    None,
    /// Top↔Bottom (mirrors y about height/2)
    Horizontal,
    /// Left↔Right (mirrors x about width/2)
    Vertical,
}

impl SymmetryMode {
    /// Cycle to the next mode.
    pub fn next(self) -> Self {
        match self {
            SymmetryMode::None => SymmetryMode::Horizontal,
            SymmetryMode::Horizontal => SymmetryMode::Vertical,
            SymmetryMode::Vertical => SymmetryMode::None,
        }
    }

    pub fn is_active(self) -> bool {
        self != SymmetryMode::None
    }

    pub fn label(self) -> &'static str {
        match self {
            SymmetryMode::None => "None",
            SymmetryMode::Horizontal => "Horizontal",
            SymmetryMode::Vertical => "Vertical",
        }
    }

    /// Mirrored counterpart of `(x, y)` on a `width`×`height` canvas.
    ///
    /// Uses integer halves: `mid + (mid - v) - 1`. The result is not clamped
    /// and can fall outside the canvas on odd dimensions (e.g. the last
    /// column of a 9-wide canvas maps to -1).
    pub fn mirror(self, x: i32, y: i32, width: u32, height: u32) -> Option<(i32, i32)> {
        match self {
            SymmetryMode::None => None,
            SymmetryMode::Vertical => {
                let mid = (width / 2) as i32;
                Some((mid + (mid - x) - 1, y))
            }
            SymmetryMode::Horizontal => {
                let mid = (height / 2) as i32;
                Some((x, mid + (mid - y) - 1))
            }
        }
    }
}

// ============================================================================
// PREVIOUS STATE - what a symmetric write overwrote
// ============================================================================

/// A coordinate together with the color it held before a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelEntry {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// Colors overwritten by one [`PixelCanvas::symmetric_write`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviousState {
    pub primary: PixelEntry,
    /// Absent when the write used [`SymmetryMode::None`].
    pub mirrored: Option<PixelEntry>,
}

impl PreviousState {
    /// Recorded entries, primary first.
    pub fn entries(&self) -> impl Iterator<Item = &PixelEntry> {
        std::iter::once(&self.primary).chain(self.mirrored.iter())
    }

    /// Write every recorded color back with plain `set`.
    ///
    /// The mirrored entry is restored before the primary one: if both name
    /// the same pixel, the primary entry holds the true original color.
    pub fn restore(&self, canvas: &mut PixelCanvas) -> Result<(), CanvasError> {
        if let Some(mirrored) = self.mirrored {
            canvas.set(mirrored.x, mirrored.y, mirrored.color)?;
        }
        canvas.set(self.primary.x, self.primary.y, self.primary.color)
    }
}

// ============================================================================
// PIXEL CANVAS
// ============================================================================

/// The authoritative pixel buffer being edited.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelCanvas {
    pixels: RgbaImage,
}

impl PixelCanvas {
    /// Transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        Self::filled(width, height, TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, color),
        })
    }

    /// Wrap an already decoded image.
    pub fn from_image(pixels: RgbaImage) -> Result<Self, CanvasError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Read-only view of the raw buffer (for saving and texture upload).
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    fn index(&self, x: i32, y: i32) -> Result<(u32, u32), CanvasError> {
        if self.contains(x, y) {
            Ok((x as u32, y as u32))
        } else {
            Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Color, CanvasError> {
        let (px, py) = self.index(x, y)?;
        Ok(*self.pixels.get_pixel(px, py))
    }

    pub fn set(&mut self, x: i32, y: i32, color: Color) -> Result<(), CanvasError> {
        let (px, py) = self.index(x, y)?;
        self.pixels.put_pixel(px, py, color);
        Ok(())
    }

    /// Write `color` at `(x, y)` and at its mirror under `mode`, returning
    /// the colors that were overwritten.
    ///
    /// Both coordinates are validated first; on error nothing is written.
    /// The primary pixel is written before the mirror is read, so a pixel
    /// that mirrors onto itself records `color` as the mirror's prior value.
    pub fn symmetric_write(
        &mut self,
        x: i32,
        y: i32,
        color: Color,
        mode: SymmetryMode,
    ) -> Result<PreviousState, CanvasError> {
        let (px, py) = self.index(x, y)?;
        let mirror = match mode.mirror(x, y, self.width(), self.height()) {
            Some((mx, my)) => Some((mx, my, self.index(mx, my)?)),
            None => None,
        };

        let primary = PixelEntry {
            x,
            y,
            color: *self.pixels.get_pixel(px, py),
        };
        self.pixels.put_pixel(px, py, color);

        let mirrored = mirror.map(|(mx, my, (mpx, mpy))| {
            let prior = *self.pixels.get_pixel(mpx, mpy);
            self.pixels.put_pixel(mpx, mpy, color);
            PixelEntry {
                x: mx,
                y: my,
                color: prior,
            }
        });

        Ok(PreviousState { primary, mirrored })
    }
}
