use std::collections::BTreeSet;
use std::error::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::duplicates::DuplicateMap;
use crate::error::SimError;
use crate::reference::palette;
use crate::texture::adaptive4x4::{compact_offsets, rank};
use crate::texture::adaptive12x12::classify_cell;
use crate::texture::{adaptive12x12, adaptive4x4, AdaptiveTexture, BlockMetadata, BlockType, Corner, Texture};
use crate::util::{periodic_duplicates, ReferenceBuilder};
use super::RecordingCache;

fn assert_dense(texture: &AdaptiveTexture) {
    let offsets: BTreeSet<u32> = texture.entries().iter().map(|e| e.data_offset).collect();
    let expected: BTreeSet<u32> = (0..offsets.len() as u32).collect();
    assert_eq!(offsets, expected);
}

#[test]
fn plain_image_is_all_4x4_blocks() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(24, 24, palette::BLUE).build();
    let texture = adaptive4x4::build(&reference, &DuplicateMap::identity(36))?;
    assert_eq!(texture.grid_dimensions(), (6, 6));
    for (index, entry) in texture.entries().iter().enumerate() {
        assert_eq!(*entry, BlockMetadata { block_type: BlockType::Astc4x4, data_offset: index as u32 });
    }
    assert_eq!(texture.payload_blocks(), 36);
    Ok(())
}

#[test]
fn claims_coarse_blocks_before_fine_ones() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(24, 24, palette::BLUE)
        .paint(0, 0, 12, 12, palette::RED)
        .paint(12, 0, 8, 8, palette::GREEN)
        .build();
    let texture = adaptive4x4::build(&reference, &DuplicateMap::identity(36))?;
    for (x, y) in [(0, 0), (2, 0), (1, 1), (2, 2)] {
        assert_eq!(*texture.entry(x, y), BlockMetadata { block_type: BlockType::Astc12x12, data_offset: 0 });
    }
    for (x, y) in [(3, 0), (4, 0), (3, 1), (4, 1)] {
        assert_eq!(*texture.entry(x, y), BlockMetadata { block_type: BlockType::Astc8x8, data_offset: 1 });
    }
    // Leftover cells follow in raster order
    assert_eq!(texture.entry(5, 0).data_offset, 2);
    assert_eq!(texture.entry(5, 1).data_offset, 3);
    assert_eq!(texture.entry(3, 2).data_offset, 4);
    assert_eq!(texture.entry(5, 5).data_offset, 24);
    assert_eq!(texture.entry(5, 5).block_type, BlockType::Astc4x4);
    assert_eq!(texture.payload_blocks(), 25);
    assert_dense(&texture);
    Ok(())
}

#[test]
fn windows_slide_over_cells_without_overlapping() -> Result<(), Box<dyn Error>> {
    // A 24x12 red strip starting one cell in holds exactly two 12x12 blocks
    let reference = ReferenceBuilder::new(36, 24, palette::BLUE)
        .paint(4, 4, 24, 12, palette::RED)
        .build();
    let texture = adaptive4x4::build(&reference, &DuplicateMap::identity(54))?;
    assert_eq!(*texture.entry(1, 1), BlockMetadata { block_type: BlockType::Astc12x12, data_offset: 0 });
    assert_eq!(*texture.entry(3, 3), BlockMetadata { block_type: BlockType::Astc12x12, data_offset: 0 });
    assert_eq!(*texture.entry(4, 1), BlockMetadata { block_type: BlockType::Astc12x12, data_offset: 1 });
    assert_eq!(*texture.entry(6, 3), BlockMetadata { block_type: BlockType::Astc12x12, data_offset: 1 });
    assert_eq!(texture.entry(0, 0).block_type, BlockType::Astc4x4);
    assert_eq!(texture.entry(7, 1).block_type, BlockType::Astc4x4);
    assert_eq!(texture.payload_blocks(), 54 - 18 + 2);
    Ok(())
}

#[test]
fn solid_images_form_the_largest_blocks() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(12, 12, palette::RED).build();
    let texture = adaptive4x4::build(&reference, &DuplicateMap::identity(9))?;
    assert!(texture.entries().iter().all(|e| e.block_type == BlockType::Astc12x12 && e.data_offset == 0));
    let reference = ReferenceBuilder::new(12, 12, palette::GREEN).build();
    let texture = adaptive4x4::build(&reference, &DuplicateMap::identity(9))?;
    // One 8x8 block in the corner, the remaining strip falls back to 4x4 blocks
    assert_eq!(texture.entry(1, 1).block_type, BlockType::Astc8x8);
    assert_eq!(texture.entry(2, 0).block_type, BlockType::Astc4x4);
    assert_eq!(texture.payload_blocks(), 6);
    Ok(())
}

#[test]
fn duplicates_share_compacted_offsets() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(24, 12, palette::BLUE).build();
    let texture = adaptive4x4::build(&reference, &periodic_duplicates(18, 2))?;
    for (index, entry) in texture.entries().iter().enumerate() {
        assert_eq!(entry.data_offset, (index / 2) as u32);
    }
    assert_eq!(texture.payload_blocks(), 9);
    assert_dense(&texture);
    Ok(())
}

#[test]
fn duplicated_groups_copy_block_type() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(24, 12, palette::BLUE)
        .paint(0, 0, 12, 12, palette::RED)
        .build();
    // The last cell repeats the 12x12 block
    let mut canonical: Vec<usize> = (0..18).collect();
    canonical[17] = 0;
    let texture = adaptive4x4::build(&reference, &DuplicateMap::from_indices(canonical))?;
    assert_eq!(*texture.entry(5, 2), *texture.entry(0, 0));
    // Nine 4x4 cells remain fresh, one was absorbed
    assert_eq!(texture.payload_blocks(), 1 + 8);
    assert_dense(&texture);
    Ok(())
}

#[test]
fn compaction_is_dense_for_random_duplicates() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(7);
    let reference = ReferenceBuilder::new(48, 48, palette::BLUE)
        .paint(0, 0, 12, 12, palette::RED)
        .paint(24, 24, 12, 12, palette::RED)
        .paint(12, 36, 8, 8, palette::GREEN)
        .build();
    for _ in 0..20 {
        let canonical: Vec<usize> = (0..144)
            .map(|i| if rng.gen_bool(0.4) { rng.gen_range(0..=i) } else { i })
            .collect();
        let duplicates = DuplicateMap::from_indices(canonical);
        let texture = adaptive4x4::build(&reference, &duplicates)?;
        assert_dense(&texture);
        for index in 0..144 {
            let entries = texture.entries();
            assert_eq!(entries[index], entries[duplicates.canonical(index)]);
        }
    }
    Ok(())
}

#[test]
fn compaction_drops_unused_offsets() {
    let mut entries: Vec<BlockMetadata> = [5, 0, 5, 3]
        .into_iter()
        .map(|data_offset| BlockMetadata { block_type: BlockType::Astc4x4, data_offset })
        .collect();
    assert_eq!(compact_offsets(&mut entries, 6), 3);
    let offsets: Vec<u32> = entries.iter().map(|e| e.data_offset).collect();
    assert_eq!(offsets, vec![2, 0, 2, 1]);
}

#[test]
fn rank_matches_linear_count() {
    let mut rng = StdRng::seed_from_u64(11);
    for len in 0..40 {
        let mut sorted: Vec<u32> = (0..len).map(|_| rng.gen_range(0..64)).collect();
        sorted.sort_unstable();
        sorted.dedup();
        for target in 0..70 {
            let expected = sorted.iter().filter(|value| **value < target).count();
            assert_eq!(rank(&sorted, target), expected, "{sorted:?} below {target}");
        }
    }
}

#[test]
fn adaptive_reads_metadata_then_payload() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(24, 24, palette::BLUE).build();
    let texture = adaptive4x4::build(&reference, &DuplicateMap::identity(36))?;
    assert_eq!(texture.payload_base(), 108);
    let mut cache = RecordingCache::default();
    // Cell 7: record at 21..24, payload at 108 + 112
    texture.access(5, 5, &mut cache);
    assert_eq!(cache.addresses, vec![0, 192]);
    cache.addresses.clear();
    // Cell 21: the record and the payload at 108 + 336 both straddle two lines
    texture.access(13, 14, &mut cache);
    assert_eq!(cache.addresses, vec![0, 64, 384, 448]);
    Ok(())
}

#[test]
fn rejects_short_duplicate_maps_and_tiny_images() {
    let reference = ReferenceBuilder::new(24, 24, palette::BLUE).build();
    assert!(matches!(adaptive4x4::build(&reference, &DuplicateMap::identity(35)), Err(SimError::Configuration(_))));
    assert!(matches!(adaptive12x12::build(&reference, &DuplicateMap::identity(3)), Err(SimError::Configuration(_))));
    let tiny = ReferenceBuilder::new(11, 30, palette::BLUE).build();
    assert!(matches!(adaptive4x4::build(&tiny, &DuplicateMap::identity(100)), Err(SimError::Configuration(_))));
}

#[test]
fn truncates_to_multiples_of_twelve() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(29, 25, palette::YELLOW).build();
    let texture = adaptive12x12::build(&reference, &DuplicateMap::identity(4))?;
    assert_eq!((texture.get_width(), texture.get_height()), (24, 24));
    let texture = adaptive4x4::build(&reference, &DuplicateMap::identity(36))?;
    assert_eq!((texture.get_width(), texture.get_height()), (24, 24));
    Ok(())
}

#[test]
fn classifies_solid_cells() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(48, 12, palette::RED)
        .paint(12, 0, 12, 12, palette::BLUE)
        .paint(24, 0, 12, 12, palette::YELLOW)
        .paint(36, 0, 12, 12, palette::GREEN)
        .build();
    assert_eq!(classify_cell(&reference, 0, 0)?, BlockType::Astc12x12);
    assert_eq!(classify_cell(&reference, 1, 0)?, BlockType::Split4x4);
    assert_eq!(classify_cell(&reference, 2, 0)?, BlockType::Split6x6);
    assert!(matches!(
        classify_cell(&reference, 3, 0),
        Err(SimError::Classification { cell_x: 3, cell_y: 0, .. })
    ));
    Ok(())
}

#[test]
fn classifies_8x8_placements_by_corner() -> Result<(), Box<dyn Error>> {
    let mut builder = ReferenceBuilder::new(48, 12, palette::RED);
    for (cell_x, corner) in Corner::ALL.into_iter().enumerate() {
        builder = builder.paint_split8x8(cell_x as u32, 0, corner.origin());
    }
    let reference = builder.build();
    for (cell_x, corner) in Corner::ALL.into_iter().enumerate() {
        assert_eq!(classify_cell(&reference, cell_x as u32, 0)?, BlockType::Split8x8(corner));
    }
    Ok(())
}

#[test]
fn rejects_unrecognised_patterns() {
    // 8x8 marker filled with the wrong colour
    let reference = ReferenceBuilder::new(36, 12, palette::YELLOW)
        .paint(0, 0, 8, 8, palette::GREEN)
        // 8x8 marker off the corners
        .paint(12, 0, 12, 12, palette::BLUE)
        .paint(14, 2, 8, 8, palette::GREEN)
        // Two solid colours
        .paint(24, 0, 6, 12, palette::RED)
        .build();
    for cell_x in 0..3 {
        assert!(matches!(classify_cell(&reference, cell_x, 0), Err(SimError::Classification { .. })), "cell {cell_x}");
    }
    let error = adaptive12x12::build(&reference, &DuplicateMap::identity(3));
    assert!(matches!(error, Err(SimError::Classification { cell_x: 0, cell_y: 0, .. })));
}

#[test]
fn offsets_advance_by_stored_blocks() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(36, 24, palette::RED)
        .paint(12, 0, 12, 12, palette::BLUE)
        .paint(24, 0, 12, 12, palette::YELLOW)
        .paint_split8x8(0, 1, Corner::TopLeft.origin())
        .paint(24, 12, 12, 12, palette::BLUE)
        .build();
    let texture = adaptive12x12::build(&reference, &DuplicateMap::identity(6))?;
    let offsets: Vec<u32> = texture.entries().iter().map(|e| e.data_offset).collect();
    assert_eq!(offsets, vec![0, 1, 10, 14, 20, 21]);
    assert_eq!(texture.entry(0, 1).block_type, BlockType::Split8x8(Corner::TopLeft));
    assert_eq!(texture.payload_blocks(), 30);
    Ok(())
}

#[test]
fn duplicate_cells_are_not_classified() -> Result<(), Box<dyn Error>> {
    // The duplicate cells hold unclassifiable pixels, they must never be analysed
    let reference = ReferenceBuilder::new(36, 24, palette::RED)
        .paint(12, 0, 12, 12, palette::BLUE)
        .paint(24, 0, 12, 12, palette::YELLOW)
        .paint_split8x8(0, 1, Corner::BottomRight.origin())
        .paint(12, 12, 24, 12, palette::GREEN)
        .build();
    let texture = adaptive12x12::build(&reference, &DuplicateMap::from_indices(vec![0, 1, 2, 3, 0, 1]))?;
    assert_eq!(texture.entries()[4], texture.entries()[0]);
    assert_eq!(texture.entries()[5], BlockMetadata { block_type: BlockType::Split4x4, data_offset: 1 });
    assert_eq!(texture.payload_blocks(), 20);
    assert_eq!(texture.payload_base(), 18);
    Ok(())
}

#[test]
fn adaptive_12x12_reads_whole_payload() -> Result<(), Box<dyn Error>> {
    let reference = ReferenceBuilder::new(24, 12, palette::RED)
        .paint(12, 0, 12, 12, palette::BLUE)
        .build();
    let texture = adaptive12x12::build(&reference, &DuplicateMap::identity(2))?;
    let mut cache = RecordingCache::default();
    // Cell 1: record at 3..6, nine blocks at 6 + 16 .. 6 + 160
    texture.access(20, 3, &mut cache);
    assert_eq!(cache.addresses, vec![0, 0, 64, 128]);
    Ok(())
}
