//! Level geometry and chunk materialization tests.
//!
//! Tests verify:
//! - Grid dimensions use ceiling division at every level
//! - Probing never creates chunks
//! - Creation is idempotent and bounded by the grid
//! - Edge tiles clip instead of failing

use std::sync::Arc;

use tile_octree::{ImageArray, LevelInfo, Location, OctreeLevel, SliceId};

use super::test_utils::{
    base_level, metadata, position_image, rgb_image, CountingSource, TEST_LAYER,
};

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn test_grid_matches_ceiling_division() {
    let cases = [
        ((512, 512), 256),
        ((300, 300), 100),
        ((250, 250), 100),
        ((1000, 37), 64),
        ((1, 1), 1),
        ((40_000, 30_000), 512),
    ];

    for ((height, width), tile_size) in cases {
        let meta = metadata(height, width, tile_size);
        for level_index in 0..12 {
            let info = LevelInfo::new(&meta, level_index);
            let scaled = tile_size * (1 << level_index);

            assert_eq!(info.scale(), 1 << level_index);
            assert_eq!(info.rows(), height.div_ceil(scaled));
            assert_eq!(info.cols(), width.div_ceil(scaled));
            assert_eq!(info.num_tiles(), info.rows() * info.cols());
            assert_eq!(
                info.image_shape(),
                (height >> level_index, width >> level_index)
            );
        }
    }
}

#[test]
fn test_coarsest_levels_still_materialize() {
    let meta = metadata(1000, 1000, 256);

    for level_index in [40, 63, 64, 200] {
        let data = ImageArray::from_fn(0, 0, None, |_, _, _| 0);
        let mut level = OctreeLevel::new(SliceId::new(0), data, &meta, level_index);

        let chunk = level.get_chunk(0, 0, true).unwrap();
        assert_eq!(chunk.location().tile(), (0, 0));
        assert_eq!(chunk.geom().pos, [0.0, 0.0]);
        assert!(chunk.geom().scale[0].is_finite());
        assert_eq!(level.len(), 1);
    }
}

#[test]
fn test_scale_strictly_increases() {
    let meta = metadata(1024, 1024, 64);
    let scales: Vec<_> = (0..8).map(|i| LevelInfo::new(&meta, i).scale()).collect();
    assert!(scales.windows(2).all(|w| w[0] < w[1]));
}

// =============================================================================
// Materialization
// =============================================================================

#[test]
fn test_probe_absent_until_created() {
    let mut level = base_level(300, 300, 100);

    for row in 0..3 {
        for col in 0..3 {
            assert!(level.get_chunk(row, col, false).is_none());
        }
    }

    level.get_chunk(1, 1, true).unwrap();

    for row in 0..3 {
        for col in 0..3 {
            let expected = (row, col) == (1, 1);
            assert_eq!(level.get_chunk(row, col, false).is_some(), expected);
        }
    }
}

#[test]
fn test_repeated_creation_returns_same_instance() {
    let mut level = base_level(300, 300, 100);

    let first = level.get_chunk(2, 0, true).unwrap();
    for _ in 0..5 {
        assert!(Arc::ptr_eq(&first, &level.get_chunk(2, 0, true).unwrap()));
    }
    assert_eq!(level.len(), 1);
}

#[test]
fn test_cached_chunk_is_not_sliced_again() {
    let meta = metadata(300, 300, 100);
    let source = CountingSource::new(position_image(300, 300));
    let mut level = OctreeLevel::new(SliceId::new(0), source, &meta, 0);

    level.get_chunk(0, 0, true).unwrap();
    level.get_chunk(0, 0, true).unwrap();
    level.get_chunk(0, 0, false).unwrap();
    assert_eq!(level.data().slice_count(), 1);

    level.get_chunk(5, 5, true);
    assert_eq!(level.data().slice_count(), 1);
}

#[test]
fn test_out_of_bounds_leaves_cache_unchanged() {
    let mut level = base_level(250, 250, 100);
    level.get_chunk(0, 0, true).unwrap();

    for (row, col) in [(3, 0), (0, 3), (3, 3), (100, 100)] {
        assert!(level.get_chunk(row, col, true).is_none());
        assert_eq!(level.len(), 1);
    }
}

#[test]
fn test_negative_neighbor_is_absent() {
    let mut level = base_level(250, 250, 100);

    assert!(level.neighbor(0, 0, -1, 0, true).is_none());
    assert!(level.neighbor(0, 0, 0, -1, true).is_none());
    assert!(level.neighbor(0, 0, 1, 1, true).is_some());
    assert_eq!(level.len(), 1);
}

// =============================================================================
// Data and Geometry
// =============================================================================

#[test]
fn test_even_division_gives_full_edge_tile() {
    let mut level = base_level(300, 300, 100);

    let chunk = level.get_chunk(2, 2, true).unwrap();
    let expected = position_image(300, 300).slice(200..300, 200..300);

    assert_eq!(chunk.data().dims(), (100, 100));
    assert_eq!(*chunk.data(), expected);
}

#[test]
fn test_uneven_division_clips_edge_tiles() {
    let mut level = base_level(250, 230, 100);
    assert_eq!(level.info().shape_in_tiles(), (3, 3));

    assert_eq!(level.get_chunk(2, 2, true).unwrap().data().dims(), (50, 30));
    assert_eq!(level.get_chunk(0, 2, true).unwrap().data().dims(), (100, 30));
    assert_eq!(level.get_chunk(2, 1, true).unwrap().data().dims(), (50, 100));
    assert_eq!(level.get_chunk(1, 1, true).unwrap().data().dims(), (100, 100));
}

#[test]
fn test_chunk_data_matches_source_pixels() {
    let mut level = base_level(250, 250, 100);
    let source = position_image(250, 250);

    let chunk = level.get_chunk(1, 2, true).unwrap();
    for row in 0..chunk.data().height() {
        for col in 0..chunk.data().width() {
            assert_eq!(
                chunk.data().pixel(row, col),
                source.pixel(100 + row, 200 + col)
            );
        }
    }
}

#[test]
fn test_multichannel_tiles_keep_channels() {
    let meta = metadata(130, 130, 64);
    let mut level = OctreeLevel::new(SliceId::new(0), rgb_image(130, 130), &meta, 0);

    let chunk = level.get_chunk(2, 2, true).unwrap();
    assert_eq!(chunk.data().shape(), vec![2, 2, 3]);
    assert_eq!(chunk.data().pixel(1, 1), Some(&[200u8, 100, 50][..]));
}

#[test]
fn test_geometry_and_identity_for_every_tile() {
    let meta = metadata(1000, 700, 128);
    let level_index = 1;
    let data = ImageArray::from_fn(500, 350, None, |_, _, _| 0);
    let mut level = OctreeLevel::new(SliceId::new(3), data, &meta, level_index);

    let (rows, cols) = level.info().shape_in_tiles();
    assert_eq!((rows, cols), (4, 3));

    for row in 0..rows {
        for col in 0..cols {
            let chunk = level.get_chunk(row, col, true).unwrap();
            assert_eq!(
                chunk.geom().pos,
                [(col * 128 * 2) as f64, (row * 128 * 2) as f64]
            );
            assert_eq!(chunk.geom().scale, [2.0, 2.0]);
            assert_eq!(
                *chunk.location(),
                Location::new(TEST_LAYER, SliceId::new(3), level_index, row, col)
            );
        }
    }
    assert_eq!(level.len(), 12);
}
