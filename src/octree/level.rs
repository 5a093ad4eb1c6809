//! One resolution level of the octree.
//!
//! [`LevelInfo`] is the geometry of a level, computed from the pyramid
//! metadata alone. [`OctreeLevel`] pairs that geometry with the level's data
//! and lazily materializes [`Chunk`]s on request.
//!
//! # Tile Grid
//!
//! Level `n` has scale factor `2^n`. Its grid is sized so that tiles of
//! `tile_size * 2^n` level-0 pixels cover the whole base image:
//!
//! ```text
//! rows = ceil(base_height / (tile_size * 2^n))
//! cols = ceil(base_width  / (tile_size * 2^n))
//! ```
//!
//! When the base image is not a multiple of the tile size, the last row and
//! column of tiles are partial, and their data is clipped.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::{debug, trace};

use super::chunk::{Chunk, ChunkGeom, Location};
use super::metadata::{LevelMetadata, SliceId};
use crate::array::TileSource;

// =============================================================================
// LevelInfo
// =============================================================================

/// Geometry of one pyramid level.
///
/// A pure function of the metadata and the level index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    meta: LevelMetadata,
    level_index: usize,
    scale: usize,
    image_shape: (usize, usize),
    rows: usize,
    cols: usize,
    num_tiles: usize,
}

impl LevelInfo {
    /// Compute the geometry of level `level_index`.
    pub fn new(meta: &LevelMetadata, level_index: usize) -> Self {
        let scale = level_scale(level_index);
        let (base_height, base_width) = meta.base_shape();

        let image_shape = (base_height / scale, base_width / scale);

        let scaled_size = meta.tile_size().saturating_mul(scale);
        let rows = base_height.div_ceil(scaled_size);
        let cols = base_width.div_ceil(scaled_size);

        Self {
            meta: *meta,
            level_index,
            scale,
            image_shape,
            rows,
            cols,
            num_tiles: rows * cols,
        }
    }

    /// Metadata of the pyramid this level belongs to.
    pub fn meta(&self) -> &LevelMetadata {
        &self.meta
    }

    /// Index of this level (0 = full resolution).
    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// Level-0 pixels per pixel of this level (`2^level_index`).
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Image size at this level as `(height, width)`.
    pub fn image_shape(&self) -> (usize, usize) {
        self.image_shape
    }

    /// Number of tile rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of tile columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid size as `(rows, cols)`.
    pub fn shape_in_tiles(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of tiles in the grid.
    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    /// Whether `(row, col)` lies inside the grid.
    pub fn contains_tile(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }
}

/// `2^level_index`, saturating instead of overflowing for absurd levels.
fn level_scale(level_index: usize) -> usize {
    u32::try_from(level_index)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .unwrap_or(usize::MAX)
}

// =============================================================================
// OctreeLevel
// =============================================================================

/// Tile cache for one level of one slice.
///
/// Chunks are created on demand by [`OctreeLevel::get_chunk`] and kept for
/// the lifetime of the level. A level built with
/// [`OctreeLevel::with_capacity`] instead keeps at most that many chunks and
/// evicts the least recently used one when full.
///
/// The level has no internal locking. Mutation requires `&mut self`; wrap it
/// in a [`SharedLevel`](super::SharedLevel) to use it from several tasks.
pub struct OctreeLevel<S: TileSource> {
    /// Slice this level was cut from
    slice_id: SliceId,

    /// Pixels at this level's resolution
    data: S,

    /// Grid geometry
    info: LevelInfo,

    /// Materialized chunks keyed by `(row, col)`
    tiles: LruCache<(usize, usize), Arc<Chunk<S::View>>>,

    /// Whether `tiles` has a capacity limit
    bounded: bool,
}

impl<S: TileSource> OctreeLevel<S> {
    /// Create a level with an unbounded cache.
    ///
    /// # Arguments
    ///
    /// * `slice_id` - Slice the data belongs to
    /// * `data` - Pixels already at this level's resolution
    /// * `meta` - Pyramid metadata
    /// * `level_index` - Index of this level (0 = full resolution)
    pub fn new(slice_id: SliceId, data: S, meta: &LevelMetadata, level_index: usize) -> Self {
        Self {
            slice_id,
            data,
            info: LevelInfo::new(meta, level_index),
            tiles: LruCache::unbounded(),
            bounded: false,
        }
    }

    /// Create a level that keeps at most `capacity` chunks.
    pub fn with_capacity(
        slice_id: SliceId,
        data: S,
        meta: &LevelMetadata,
        level_index: usize,
        capacity: NonZeroUsize,
    ) -> Self {
        Self {
            slice_id,
            data,
            info: LevelInfo::new(meta, level_index),
            tiles: LruCache::new(capacity),
            bounded: true,
        }
    }

    /// Geometry of this level.
    pub fn info(&self) -> &LevelInfo {
        &self.info
    }

    /// Data backing this level.
    pub fn data(&self) -> &S {
        &self.data
    }

    /// Slice this level was cut from.
    pub fn slice_id(&self) -> SliceId {
        self.slice_id
    }

    /// Maximum number of cached chunks, or `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.bounded.then(|| self.tiles.cap().get())
    }

    /// Number of materialized chunks.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no chunk has been materialized.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether the chunk at `(row, col)` is materialized.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.tiles.contains(&(row, col))
    }

    /// Return the chunk at `(row, col)` if it is already materialized.
    ///
    /// Never creates anything and does not affect eviction order.
    pub fn peek(&self, row: usize, col: usize) -> Option<Arc<Chunk<S::View>>> {
        self.tiles.peek(&(row, col)).cloned()
    }

    /// Return the chunk at `(row, col)`, creating it if asked to.
    ///
    /// - Materialized: the same `Arc` is returned on every call.
    /// - Not materialized and `create` is false: `None`.
    /// - Not materialized, `create` is true and `(row, col)` is on the grid:
    ///   the chunk is created, cached and returned.
    /// - Off the grid: `None`, and nothing is cached. Callers probe one step
    ///   past the edge on purpose when the image is not a power-of-two
    ///   multiple of the tile size, so this is not an error.
    pub fn get_chunk(
        &mut self,
        row: usize,
        col: usize,
        create: bool,
    ) -> Option<Arc<Chunk<S::View>>> {
        if !create {
            return self.peek(row, col);
        }

        if let Some(chunk) = self.tiles.get(&(row, col)) {
            return Some(Arc::clone(chunk));
        }

        if !self.info.contains_tile(row, col) {
            trace!(
                level = self.info.level_index,
                row,
                col,
                "Tile outside grid, not created"
            );
            return None;
        }

        let chunk = Arc::new(self.create_chunk(row, col));

        if let Some(((evicted_row, evicted_col), _)) =
            self.tiles.push((row, col), Arc::clone(&chunk))
        {
            debug!(
                level = self.info.level_index,
                row = evicted_row,
                col = evicted_col,
                "Evicted least recently used chunk"
            );
        }

        Some(chunk)
    }

    /// Like [`OctreeLevel::get_chunk`], for the tile at a signed offset.
    ///
    /// Offsets that would produce a negative row or column yield `None`.
    pub fn neighbor(
        &mut self,
        row: usize,
        col: usize,
        d_row: isize,
        d_col: isize,
        create: bool,
    ) -> Option<Arc<Chunk<S::View>>> {
        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;
        self.get_chunk(row, col, create)
    }

    /// Materialized chunks, most recently used first.
    pub fn chunks(&self) -> impl Iterator<Item = &Arc<Chunk<S::View>>> {
        self.tiles.iter().map(|(_, chunk)| chunk)
    }

    fn create_chunk(&self, row: usize, col: usize) -> Chunk<S::View> {
        let meta = self.info.meta();
        let location = Location::new(
            meta.layer_ref(),
            self.slice_id,
            self.info.level_index,
            row,
            col,
        );

        let geom = ChunkGeom::for_tile(row, col, meta.tile_size(), self.info.scale);
        let data = self.get_data(row, col);

        trace!(%location, "Created chunk");

        Chunk::new(data, geom, location)
    }

    /// Slice the data for one tile; the channel axis, if any, comes along whole.
    fn get_data(&self, row: usize, col: usize) -> S::View {
        let tile_size = self.info.meta().tile_size();
        let span = |index: usize| {
            let start = index.saturating_mul(tile_size);
            start..start.saturating_add(tile_size)
        };
        self.data.slice(span(row), span(col))
    }
}

impl<S: TileSource> fmt::Debug for OctreeLevel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OctreeLevel")
            .field("slice_id", &self.slice_id)
            .field("info", &self.info)
            .field("chunks", &self.tiles.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
