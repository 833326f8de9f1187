use crate::cache::CacheTrait;
use super::{Texture, BLOCK_BYTES};

/// Each metadata record is packed into 3 bytes
pub const METADATA_RECORD_BYTES: u64 = 3;

/// Which corner of a 12x12 cell an 8x8 block sits in
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];

    /// The pixel offset of the 8x8 block within its 12x12 cell
    pub fn origin(&self) -> (u32, u32) {
        match self {
            Corner::TopLeft => (0, 0),
            Corner::TopRight => (4, 0),
            Corner::BottomLeft => (0, 4),
            Corner::BottomRight => (4, 4),
        }
    }
}

/// How the pixels of a metadata entry are compressed
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlockType {
    /// A lone 4x4 block
    Astc4x4,
    /// Part of an 8x8 block spanning four 4x4 cells
    Astc8x8,
    /// One 12x12 block, spanning nine 4x4 cells or one 12x12 cell
    Astc12x12,
    /// A 12x12 cell split into nine 4x4 blocks
    Split4x4,
    /// A 12x12 cell split into four 6x6 blocks
    Split6x6,
    /// A 12x12 cell split into one 8x8 block in the given corner and five 4x4 blocks
    Split8x8(Corner),
}

impl BlockType {
    /// The number of 16 byte compressed blocks stored for the entry
    pub fn sub_blocks(&self) -> u32 {
        match self {
            BlockType::Astc4x4 | BlockType::Astc8x8 | BlockType::Astc12x12 => 1,
            BlockType::Split4x4 => 9,
            BlockType::Split6x6 => 4,
            BlockType::Split8x8(_) => 6,
        }
    }

    pub fn payload_bytes(&self) -> u64 {
        self.sub_blocks() as u64 * BLOCK_BYTES
    }
}

/// One metadata record per minimal cell
///
/// `data_offset` counts 16 byte blocks from the start of the payload region
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlockMetadata {
    pub block_type: BlockType,
    pub data_offset: u32,
}

/// A texture whose block sizes vary, described by a per cell metadata table
///
/// Memory holds the metadata table (3 bytes per cell, row major) followed directly by the
/// compressed payload. Decoding a texel reads its metadata record and then the whole payload of
/// its entry. Entries never change after construction.
#[derive(Debug, Clone)]
pub struct AdaptiveTexture {
    width: u32,
    height: u32,
    cell_size: u32,
    grid_w: u32,
    grid_h: u32,
    entries: Vec<BlockMetadata>,
}

impl AdaptiveTexture {
    pub(crate) fn new(width: u32, height: u32, cell_size: u32, entries: Vec<BlockMetadata>) -> Self {
        let grid_w = width / cell_size;
        let grid_h = height / cell_size;
        debug_assert_eq!(entries.len(), grid_w as usize * grid_h as usize);
        Self {
            width,
            height,
            cell_size,
            grid_w,
            grid_h,
            entries,
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn grid_dimensions(&self) -> (u32, u32) {
        (self.grid_w, self.grid_h)
    }

    pub fn entries(&self) -> &[BlockMetadata] {
        &self.entries
    }

    pub fn entry(&self, cell_x: u32, cell_y: u32) -> &BlockMetadata {
        &self.entries[self.cell_index(cell_x, cell_y)]
    }

    /// The first byte of the payload region, directly after the metadata table
    pub fn payload_base(&self) -> u64 {
        METADATA_RECORD_BYTES * self.entries.len() as u64
    }

    /// The number of 16 byte blocks the payload region holds
    pub fn payload_blocks(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.data_offset as u64 + e.block_type.sub_blocks() as u64)
            .max()
            .unwrap_or(0)
    }

    fn cell_index(&self, cell_x: u32, cell_y: u32) -> usize {
        cell_y as usize * self.grid_w as usize + cell_x as usize
    }
}

impl Texture for AdaptiveTexture {
    fn get_width(&self) -> u32 {
        self.width
    }

    fn get_height(&self) -> u32 {
        self.height
    }

    fn access<C: CacheTrait>(&self, x: u32, y: u32, cache: &mut C) {
        let index = self.cell_index(x / self.cell_size, y / self.cell_size);
        let entry = &self.entries[index];
        cache.access_range(index as u64 * METADATA_RECORD_BYTES, METADATA_RECORD_BYTES);
        cache.access_range(
            self.payload_base() + entry.data_offset as u64 * BLOCK_BYTES,
            entry.block_type.payload_bytes(),
        );
    }
}
