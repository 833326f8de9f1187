use image::Rgba;
use log::info;
use crate::duplicates::DuplicateMap;
use crate::error::SimError;
use crate::reference::{palette, ReferenceImage};
use super::adaptive::{AdaptiveTexture, BlockMetadata, BlockType};

/// Minimal cell size of this format, in pixels
pub const CELL_SIZE: u32 = 4;

/// Builds the 4x4 grid adaptive texture
///
/// Cells are grouped coarsest first: every 3x3 window of unclaimed cells painted entirely red
/// becomes a 12x12 block, then every 2x2 window of unclaimed cells painted entirely green becomes
/// an 8x8 block, and each cell left over is its own 4x4 block. Windows are tried at every cell
/// position in raster order. Each group gets the next sequential offset.
///
/// Duplicates are then resolved, a cell whose canonical index isn't its own copies the canonical
/// cell's entry, and the offsets are compacted so the payload has no holes.
///
/// # Arguments
///
/// * `reference`: The colour coded reference image
/// * `duplicates`: The duplicate map, indexed by cell in raster order
///
/// returns: Result<AdaptiveTexture, SimError>
pub fn build(reference: &ReferenceImage, duplicates: &DuplicateMap) -> Result<AdaptiveTexture, SimError> {
    let (width, height) = reference.grid_dimensions()?;
    let grid_w = width / CELL_SIZE;
    let grid_h = height / CELL_SIZE;
    let cells = grid_w as usize * grid_h as usize;
    duplicates.ensure_covers(cells)?;

    let mut grid = ClaimGrid::new(grid_w, grid_h);
    let mut next_offset = 0;
    for (span, colour, block_type) in [(3, palette::RED, BlockType::Astc12x12), (2, palette::GREEN, BlockType::Astc8x8)] {
        next_offset = grid.claim_windows(reference, span, colour, block_type, next_offset);
    }
    let mut entries: Vec<BlockMetadata> = grid
        .cells
        .into_iter()
        .map(|cell| {
            cell.unwrap_or_else(|| {
                let entry = BlockMetadata {
                    block_type: BlockType::Astc4x4,
                    data_offset: next_offset,
                };
                next_offset += 1;
                entry
            })
        })
        .collect();

    for index in 0..cells {
        let canonical = duplicates.canonical(index);
        if canonical != index {
            entries[index] = entries[canonical];
        }
    }

    let payload_blocks = compact_offsets(&mut entries, next_offset);
    info!(
        "Built 4x4 adaptive texture: {grid_w}x{grid_h} cells, {next_offset} groups, {payload_blocks} stored blocks"
    );
    Ok(AdaptiveTexture::new(width, height, CELL_SIZE, entries))
}

/// Cells of the grid, `None` until claimed by a block
struct ClaimGrid {
    grid_w: u32,
    grid_h: u32,
    cells: Vec<Option<BlockMetadata>>,
}

impl ClaimGrid {
    fn new(grid_w: u32, grid_h: u32) -> Self {
        Self {
            grid_w,
            grid_h,
            cells: vec![None; grid_w as usize * grid_h as usize],
        }
    }

    fn index(&self, cell_x: u32, cell_y: u32) -> usize {
        cell_y as usize * self.grid_w as usize + cell_x as usize
    }

    fn window_unclaimed(&self, cell_x: u32, cell_y: u32, span: u32) -> bool {
        (cell_y..cell_y + span).all(|y| (cell_x..cell_x + span).all(|x| self.cells[self.index(x, y)].is_none()))
    }

    /// Claims every unclaimed `span` x `span` window painted in `colour`, returning the next free
    /// offset
    fn claim_windows(&mut self, reference: &ReferenceImage, span: u32, colour: Rgba<u8>, block_type: BlockType, mut next_offset: u32) -> u32 {
        let pixels = span * CELL_SIZE;
        for cell_y in 0..(self.grid_h + 1).saturating_sub(span) {
            for cell_x in 0..(self.grid_w + 1).saturating_sub(span) {
                if !self.window_unclaimed(cell_x, cell_y, span) {
                    continue;
                }
                if !reference.is_solid(cell_x * CELL_SIZE, cell_y * CELL_SIZE, pixels, pixels, colour) {
                    continue;
                }
                let entry = BlockMetadata {
                    block_type,
                    data_offset: next_offset,
                };
                for y in cell_y..cell_y + span {
                    for x in cell_x..cell_x + span {
                        let index = self.index(x, y);
                        self.cells[index] = Some(entry);
                    }
                }
                next_offset += 1;
            }
        }
        next_offset
    }
}

/// Renumbers the offsets of `entries` so they form the dense range `[0, M)`
///
/// Offsets in `[0, assigned)` which no entry references are dropped, and every entry moves down by
/// the number of dropped offsets below it
///
/// returns: u32, the number of offsets still in use, `M`
pub fn compact_offsets(entries: &mut [BlockMetadata], assigned: u32) -> u32 {
    let mut used = vec![false; assigned as usize];
    for entry in entries.iter() {
        used[entry.data_offset as usize] = true;
    }
    let unused: Vec<u32> = (0..assigned).filter(|offset| !used[*offset as usize]).collect();
    for entry in entries.iter_mut() {
        entry.data_offset -= rank(&unused, entry.data_offset) as u32;
    }
    assigned - unused.len() as u32
}

/// Counts the elements of a sorted slice strictly less than `target`
///
/// # Examples
///
/// ```
/// use texcachelib::texture::adaptive4x4::rank;
/// assert_eq!(rank(&[1, 4, 6], 5), 2);
/// assert_eq!(rank(&[1, 4, 6], 1), 0);
/// ```
pub fn rank(sorted: &[u32], target: u32) -> usize {
    sorted.partition_point(|value| *value < target)
}
