use crate::cache::CacheTrait;
use crate::error::SimError;
use super::{Texture, BLOCK_BYTES};

const SUPPORTED_BLOCK_SIZES: [u32; 4] = [4, 6, 8, 12];

/// A texture where every block has the same footprint, stored in row major block order with no
/// metadata
#[derive(Debug, Clone)]
pub struct FixedBlockTexture {
    width: u32,
    height: u32,
    block_w: u32,
    block_h: u32,
    blocks_per_row: u32,
}

impl FixedBlockTexture {
    pub fn new(width: u32, height: u32, block_w: u32, block_h: u32) -> Result<Self, SimError> {
        if !SUPPORTED_BLOCK_SIZES.contains(&block_w) || !SUPPORTED_BLOCK_SIZES.contains(&block_h) {
            return Err(SimError::Configuration(format!("unsupported block size {block_w}x{block_h}")));
        }
        if width == 0 || height == 0 {
            return Err(SimError::Configuration(format!("texture dimensions {width}x{height} are empty")));
        }
        Ok(Self {
            width,
            height,
            block_w,
            block_h,
            blocks_per_row: (width + block_w - 1) / block_w,
        })
    }

    /// The byte address of the block holding a texel
    pub fn block_address(&self, x: u32, y: u32) -> u64 {
        let block_x = (x / self.block_w) as u64;
        let block_y = (y / self.block_h) as u64;
        let block_offset = block_y * self.blocks_per_row as u64 + block_x;
        block_offset * BLOCK_BYTES
    }
}

impl Texture for FixedBlockTexture {
    fn get_width(&self) -> u32 {
        self.width
    }

    fn get_height(&self) -> u32 {
        self.height
    }

    fn access<C: CacheTrait>(&self, x: u32, y: u32, cache: &mut C) {
        cache.access_range(self.block_address(x, y), BLOCK_BYTES);
    }
}
