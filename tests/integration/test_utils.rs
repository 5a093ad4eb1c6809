//! Test utilities for integration tests.
//!
//! This module provides a counting data source and helpers for building
//! levels and pyramids over deterministic images.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tile_octree::{
    ImageArray, LayerRef, LevelMetadata, OctreeLevel, Pyramid, PyramidOptions, SliceId,
    TileSource,
};

/// Layer handle used by every helper.
pub const TEST_LAYER: LayerRef = LayerRef::new(42);

// =============================================================================
// Counting Source
// =============================================================================

/// A data source that counts slice requests.
///
/// Useful for verifying that cached chunks are not sliced again.
pub struct CountingSource {
    inner: ImageArray,
    slices: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(inner: ImageArray) -> Self {
        Self {
            inner,
            slices: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn slice_count(&self) -> usize {
        self.slices.load(Ordering::SeqCst)
    }
}

impl TileSource for CountingSource {
    type View = ImageArray;

    fn ndim(&self) -> usize {
        self.inner.ndim()
    }

    fn dims(&self) -> (usize, usize) {
        self.inner.dims()
    }

    fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> ImageArray {
        self.slices.fetch_add(1, Ordering::SeqCst);
        self.inner.slice(rows, cols)
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Grayscale image where each pixel encodes its position modulo 256.
pub fn position_image(height: usize, width: usize) -> ImageArray {
    ImageArray::from_fn(height, width, None, |row, col, _| ((row * 7 + col) % 256) as u8)
}

/// RGB image with constant per-channel values.
pub fn rgb_image(height: usize, width: usize) -> ImageArray {
    ImageArray::from_fn(height, width, Some(3), |_, _, channel| [200, 100, 50][channel])
}

pub fn metadata(height: usize, width: usize, tile_size: usize) -> LevelMetadata {
    LevelMetadata::new((height, width), tile_size, TEST_LAYER).unwrap()
}

/// Full-resolution level over `position_image`.
pub fn base_level(height: usize, width: usize, tile_size: usize) -> OctreeLevel<ImageArray> {
    OctreeLevel::new(
        SliceId::new(0),
        position_image(height, width),
        &metadata(height, width, tile_size),
        0,
    )
}

/// Pyramid over `position_image`, built up to the single-tile root.
pub fn pyramid(height: usize, width: usize, tile_size: usize) -> Pyramid<ImageArray> {
    Pyramid::build(
        SliceId::new(0),
        metadata(height, width, tile_size),
        position_image(height, width),
        &PyramidOptions::new(),
    )
    .unwrap()
}
