use image::{Rgba, RgbaImage};
use crate::duplicates::DuplicateMap;
use crate::reference::{palette, ReferenceImage};

/// Builds reference images in memory, pixel rectangles are painted over a background colour
pub struct ReferenceBuilder {
    pixels: RgbaImage,
}

impl ReferenceBuilder {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn paint(mut self, x: u32, y: u32, w: u32, h: u32, colour: Rgba<u8>) -> Self {
        for py in y..y + h {
            for px in x..x + w {
                self.pixels.put_pixel(px, py, colour);
            }
        }
        self
    }

    /// Paints a 12x12 cell as an 8x8 block in the given corner plus 4x4 blocks
    pub fn paint_split8x8(self, cell_x: u32, cell_y: u32, origin: (u32, u32)) -> Self {
        let (x, y) = (cell_x * 12, cell_y * 12);
        self.paint(x, y, 12, 12, palette::BLUE)
            .paint(x + origin.0, y + origin.1, 8, 8, palette::GREEN)
    }

    pub fn build(self) -> ReferenceImage {
        ReferenceImage::from_rgba(self.pixels)
    }
}

/// Renders a duplicate map in the on-disk format, header line included
pub fn duplicate_map_text(canonical: &[usize]) -> String {
    let mut out = String::from("canonical\n");
    for index in canonical {
        out.push_str(&format!("{index}\n"));
    }
    out
}

/// A duplicate map where every `period`-th cell is fresh and the cells after it repeat it
pub fn periodic_duplicates(len: usize, period: usize) -> DuplicateMap {
    DuplicateMap::from_indices((0..len).map(|i| i - i % period).collect())
}
