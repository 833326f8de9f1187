use std::path::Path;
use image::{Rgba, RgbaImage};
use log::{debug, warn};
use crate::error::SimError;

/// The adaptive formats are built on a grid which must divide into 12x12 cells
pub const GRID_ALIGNMENT: u32 = 12;

/// Reserved palette of the reference visualisations
///
/// The 4x4 grid format reads `RED` as a 12x12 block and `GREEN` as an 8x8 block. The 12x12 grid
/// format reads `RED` as a whole 12x12 block, `BLUE` as nine 4x4 blocks, `YELLOW` as four 6x6
/// blocks, and `GREEN` as the 8x8 block of a mixed cell whose remainder is `BLUE`
pub mod palette {
    use image::Rgba;

    pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    pub const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
}

/// A colour coded image describing how an adaptive texture is divided into blocks
///
/// Pixels are held as RGBA, images without alpha are expanded as fully opaque
pub struct ReferenceImage {
    pixels: RgbaImage,
}

impl ReferenceImage {
    pub fn open(path: &Path) -> Result<Self, SimError> {
        let pixels = image::open(path)
            .map_err(|e| SimError::resource(path, e.to_string()))?
            .to_rgba8();
        debug!("Loaded reference image {} ({}x{})", path.display(), pixels.width(), pixels.height());
        Ok(Self::from_rgba(pixels))
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// The dimensions the adaptive grid covers, each rounded down to a multiple of 12
    ///
    /// Truncation is not an error, the remaining pixels are ignored. A dimension smaller than a
    /// single cell is.
    pub fn grid_dimensions(&self) -> Result<(u32, u32), SimError> {
        let width = self.width() / GRID_ALIGNMENT * GRID_ALIGNMENT;
        let height = self.height() / GRID_ALIGNMENT * GRID_ALIGNMENT;
        if width == 0 || height == 0 {
            return Err(SimError::Configuration(format!(
                "reference image of {}x{} is smaller than a {GRID_ALIGNMENT}x{GRID_ALIGNMENT} cell",
                self.width(),
                self.height()
            )));
        }
        if width != self.width() || height != self.height() {
            warn!(
                "Reference image of {}x{} truncated to {width}x{height}",
                self.width(),
                self.height()
            );
        }
        Ok((width, height))
    }

    /// Returns true if every pixel of the rectangle has exactly the given colour
    pub fn is_solid(&self, x: u32, y: u32, w: u32, h: u32, colour: Rgba<u8>) -> bool {
        (y..y + h).all(|py| (x..x + w).all(|px| self.pixel(px, py) == colour))
    }
}
