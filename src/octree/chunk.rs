//! Chunks and their identity.
//!
//! A [`Chunk`] is what a level hands out for one tile: a view of the pixels,
//! where to draw them, and a [`Location`] saying which tile it is. Locations
//! are plain values, so they can be compared, hashed and stored by renderers
//! without holding on to the chunk or the layer.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::metadata::{LayerRef, SliceId};

// =============================================================================
// Location
// =============================================================================

/// Identity of one tile across all layers, slices and levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// Layer the tile belongs to
    pub layer_ref: LayerRef,

    /// Slice the tile was cut from
    pub slice_id: SliceId,

    /// Pyramid level (0 = full resolution)
    pub level_index: usize,

    /// Tile row within the level
    pub row: usize,

    /// Tile column within the level
    pub col: usize,
}

impl Location {
    /// Create a location.
    pub fn new(
        layer_ref: LayerRef,
        slice_id: SliceId,
        level_index: usize,
        row: usize,
        col: usize,
    ) -> Self {
        Self {
            layer_ref,
            slice_id,
            level_index,
            row,
            col,
        }
    }

    /// The tile coordinates as `(row, col)`.
    pub fn tile(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// The tile one level coarser that covers this one.
    ///
    /// Returns `None` only if the level index would overflow. The parent may
    /// still be missing from a pyramid that stops before that level.
    pub fn parent(&self) -> Option<Location> {
        Some(Location {
            level_index: self.level_index.checked_add(1)?,
            row: self.row / 2,
            col: self.col / 2,
            ..*self
        })
    }

    /// The four tiles one level finer that this one covers.
    ///
    /// Returns `None` at level 0, or if the child coordinates would overflow.
    /// Some children may fall outside the finer grid when the image is not a
    /// power-of-two multiple of the tile size.
    pub fn children(&self) -> Option<[Location; 4]> {
        let level_index = self.level_index.checked_sub(1)?;
        let (row, col) = (self.row.checked_mul(2)?, self.col.checked_mul(2)?);

        let child = |row, col| Location {
            level_index,
            row,
            col,
            ..*self
        };

        Some([
            child(row, col),
            child(row, col + 1),
            child(row + 1, col),
            child(row + 1, col + 1),
        ])
    }

    /// The tile `d_row` rows and `d_col` columns away on the same level.
    ///
    /// Returns `None` if that would be a negative coordinate.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Location> {
        Some(Location {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
            ..*self
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/level {}/({}, {})",
            self.layer_ref, self.slice_id, self.level_index, self.row, self.col
        )
    }
}

// =============================================================================
// ChunkGeom
// =============================================================================

/// Where and how large a chunk is drawn, in level-0 pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkGeom {
    /// Top-left corner as `[x, y]`
    pub pos: [f64; 2],

    /// Level-0 pixels per chunk pixel as `[x, y]`
    pub scale: [f64; 2],
}

impl ChunkGeom {
    /// Geometry of tile `(row, col)` on a level with the given scale factor.
    ///
    /// The scaled tile size saturates like [`LevelInfo`](super::LevelInfo)
    /// does, so the coarsest levels still get a finite placement.
    pub fn for_tile(row: usize, col: usize, tile_size: usize, scale: usize) -> Self {
        let scaled_size = tile_size.saturating_mul(scale) as f64;
        Self {
            pos: [col as f64 * scaled_size, row as f64 * scaled_size],
            scale: [scale as f64, scale as f64],
        }
    }

    /// Drawn size as `[width, height]` of a chunk holding `dims` pixels.
    pub fn extent(&self, dims: (usize, usize)) -> [f64; 2] {
        let (height, width) = dims;
        [width as f64 * self.scale[0], height as f64 * self.scale[1]]
    }
}

// =============================================================================
// Chunk
// =============================================================================

/// One materialized tile.
///
/// Chunks are immutable and shared through `Arc`. Two chunks compare equal
/// and hash identically when their locations match, whatever their data.
#[derive(Debug, Clone)]
pub struct Chunk<V> {
    data: V,
    geom: ChunkGeom,
    location: Location,
}

impl<V> Chunk<V> {
    pub(crate) fn new(data: V, geom: ChunkGeom, location: Location) -> Self {
        Self {
            data,
            geom,
            location,
        }
    }

    /// The tile's pixels, possibly a lazy view.
    pub fn data(&self) -> &V {
        &self.data
    }

    /// Placement in level-0 pixel space.
    pub fn geom(&self) -> &ChunkGeom {
        &self.geom
    }

    /// Identity of this tile.
    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl<V> PartialEq for Chunk<V> {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl<V> Eq for Chunk<V> {}

impl<V> Hash for Chunk<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.hash(state);
    }
}

// =============================================================================
// Tests
// =============================================================================
