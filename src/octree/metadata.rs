//! Pyramid-wide parameters and identity handles.

use std::fmt;

use crate::error::OctreeError;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: usize = 256;

// =============================================================================
// Handles
// =============================================================================

/// Opaque handle naming the image layer a pyramid belongs to.
///
/// This is a lookup key only. Holding a `LayerRef` never keeps the layer
/// alive; whoever owns the layers resolves the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerRef(u64);

impl LayerRef {
    /// Wrap a raw layer id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw layer id.
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Identifier of one static snapshot (timepoint, channel, ...) of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SliceId(u64);

impl SliceId {
    /// Wrap a raw slice id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw slice id.
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slice#{}", self.0)
    }
}

// =============================================================================
// LevelMetadata
// =============================================================================

/// Parameters shared by every level of one pyramid.
///
/// Construction is the only place these values are checked. Everything
/// downstream assumes a non-zero base shape and tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelMetadata {
    /// Full-resolution image size as `(height, width)`
    base_shape: (usize, usize),

    /// Tile edge length in pixels
    tile_size: usize,

    /// Layer this pyramid was built for
    layer_ref: LayerRef,
}

impl LevelMetadata {
    /// Create metadata for a pyramid.
    ///
    /// # Errors
    ///
    /// Returns [`OctreeError::InvalidBaseShape`] if either base dimension is
    /// zero and [`OctreeError::InvalidTileSize`] if `tile_size` is zero.
    pub fn new(
        base_shape: (usize, usize),
        tile_size: usize,
        layer_ref: LayerRef,
    ) -> Result<Self, OctreeError> {
        let (height, width) = base_shape;
        if height == 0 || width == 0 {
            return Err(OctreeError::InvalidBaseShape { height, width });
        }
        if tile_size == 0 {
            return Err(OctreeError::InvalidTileSize(tile_size));
        }

        Ok(Self {
            base_shape,
            tile_size,
            layer_ref,
        })
    }

    /// Full-resolution image size as `(height, width)`.
    pub fn base_shape(&self) -> (usize, usize) {
        self.base_shape
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Handle of the owning layer.
    pub fn layer_ref(&self) -> LayerRef {
        self.layer_ref
    }
}
