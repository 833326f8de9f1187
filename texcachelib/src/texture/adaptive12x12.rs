use log::info;
use crate::duplicates::DuplicateMap;
use crate::error::SimError;
use crate::reference::{palette, ReferenceImage};
use super::adaptive::{AdaptiveTexture, BlockMetadata, BlockType, Corner};

/// Minimal cell size of this format, in pixels
pub const CELL_SIZE: u32 = 12;

const SUB_BLOCK_SIZE: u32 = 8;

/// Builds the 12x12 grid adaptive texture
///
/// Cells are visited in raster order. A fresh cell is classified from its pixels and stored at the
/// next free offset, which then advances by the number of blocks the cell stores. A duplicate cell
/// copies the canonical cell's entry, classification included, without consuming any space, so the
/// payload is dense as built.
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
    duplicates.ensure_covers(grid_w as usize * grid_h as usize)?;

    let mut entries: Vec<BlockMetadata> = Vec::with_capacity(grid_w as usize * grid_h as usize);
    let mut next_offset = 0;
    for cell_y in 0..grid_h {
        for cell_x in 0..grid_w {
            let index = entries.len();
            let canonical = duplicates.canonical(index);
            if canonical != index {
                entries.push(entries[canonical]);
                continue;
            }
            let block_type = classify_cell(reference, cell_x, cell_y)?;
            entries.push(BlockMetadata {
                block_type,
                data_offset: next_offset,
            });
            next_offset += block_type.sub_blocks();
        }
    }
    info!("Built 12x12 adaptive texture: {grid_w}x{grid_h} cells, {next_offset} stored blocks");
    Ok(AdaptiveTexture::new(width, height, CELL_SIZE, entries))
}

/// Classifies a 12x12 cell from the colours of its pixels
///
/// A solid red, blue, or yellow cell is one 12x12 block, nine 4x4 blocks, or four 6x6 blocks. A
/// cell with an 8x8 green square in one corner and blue everywhere else is an 8x8 block plus five
/// 4x4 blocks. Anything else can't be classified.
pub fn classify_cell(reference: &ReferenceImage, cell_x: u32, cell_y: u32) -> Result<BlockType, SimError> {
    let x0 = cell_x * CELL_SIZE;
    let y0 = cell_y * CELL_SIZE;
    let first = reference.pixel(x0, y0);
    if reference.is_solid(x0, y0, CELL_SIZE, CELL_SIZE, first) {
        return if first == palette::RED {
            Ok(BlockType::Astc12x12)
        } else if first == palette::BLUE {
            Ok(BlockType::Split4x4)
        } else if first == palette::YELLOW {
            Ok(BlockType::Split6x6)
        } else {
            Err(SimError::Classification {
                cell_x,
                cell_y,
                message: format!("solid colour {:?} is not a block marker", first.0),
            })
        };
    }
    Corner::ALL
        .into_iter()
        .find(|corner| matches_corner(reference, x0, y0, *corner))
        .map(BlockType::Split8x8)
        .ok_or_else(|| SimError::Classification {
            cell_x,
            cell_y,
            message: "pixels match no block signature".to_string(),
        })
}

/// Checks for the 8x8 marker in `corner` with the rest of the cell filled as 4x4 blocks
fn matches_corner(reference: &ReferenceImage, x0: u32, y0: u32, corner: Corner) -> bool {
    let (ox, oy) = corner.origin();
    (0..CELL_SIZE).all(|y| {
        (0..CELL_SIZE).all(|x| {
            let inside = x >= ox && x < ox + SUB_BLOCK_SIZE && y >= oy && y < oy + SUB_BLOCK_SIZE;
            let expected = if inside { palette::GREEN } else { palette::BLUE };
            reference.pixel(x0 + x, y0 + y) == expected
        })
    })
}
