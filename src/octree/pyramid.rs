//! Pyramid assembly and cross-level navigation.
//!
//! A [`Pyramid`] is the ordered list of levels built over one slice: index 0
//! is full resolution and every following level halves it, until the grid
//! collapses to a single tile.
//!
//! # Pyramid Structure
//!
//! ```text
//! level 2   ┌───────┐                 1 x 1 tiles, scale 4
//!           │       │
//!           └───────┘
//! level 1   ┌───┬───┐                 2 x 2 tiles, scale 2
//!           ├───┼───┤
//!           └───┴───┘
//! level 0   ┌─┬─┬─┬─┐                 4 x 4 tiles, scale 1
//!           ├─┼─┼─┼─┤
//!           ├─┼─┼─┼─┤
//!           └─┴─┴─┴─┘
//! ```
//!
//! Levels can come from the caller (multiscale data) or be produced by
//! downsampling, or both: supplied levels are used first and extra levels are
//! appended until the root has a single tile.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::debug;

use super::chunk::{Chunk, Location};
use super::level::{LevelInfo, OctreeLevel};
use super::metadata::{LevelMetadata, SliceId};
use crate::array::{ImageArray, TileSource};
use crate::error::OctreeError;
use crate::report::{report_levels, LevelReporter, LevelSummary};

/// Maximum number of levels in a pyramid (safety limit)
pub const MAX_LEVELS: usize = 32;

// =============================================================================
// PyramidOptions
// =============================================================================

/// Options controlling pyramid assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PyramidOptions {
    /// Highest level index to build. `None` builds up to the single-tile root.
    pub stop_level: Option<usize>,

    /// Per-level chunk limit. `None` keeps every chunk for the slice lifetime.
    pub cache_capacity: Option<NonZeroUsize>,
}

impl PyramidOptions {
    /// Default options: build to the root, unbounded caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after building level `stop_level`.
    pub fn with_stop_level(mut self, stop_level: usize) -> Self {
        self.stop_level = Some(stop_level);
        self
    }

    /// Bound every level's cache to `capacity` chunks.
    pub fn with_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Number of levels allowed by `stop_level` and [`MAX_LEVELS`].
    fn level_limit(&self) -> usize {
        self.stop_level
            .map_or(MAX_LEVELS, |stop| stop.saturating_add(1))
            .min(MAX_LEVELS)
    }

    fn make_level<S: TileSource>(
        &self,
        slice_id: SliceId,
        data: S,
        meta: &LevelMetadata,
        level_index: usize,
    ) -> OctreeLevel<S> {
        match self.cache_capacity {
            Some(capacity) => OctreeLevel::with_capacity(slice_id, data, meta, level_index, capacity),
            None => OctreeLevel::new(slice_id, data, meta, level_index),
        }
    }
}

// =============================================================================
// Pyramid
// =============================================================================

/// All levels of one slice, finest first.
///
/// A pyramid always has at least one level.
pub struct Pyramid<S: TileSource> {
    slice_id: SliceId,
    meta: LevelMetadata,
    levels: Vec<OctreeLevel<S>>,

    /// How many levels came from the caller rather than downsampling
    supplied_levels: usize,
}

impl<S: TileSource> Pyramid<S> {
    /// Build a pyramid over caller-provided multiscale data.
    ///
    /// `data[i]` must hold level `i` at its own resolution. Levels past
    /// `options.stop_level` are dropped before validation.
    ///
    /// # Errors
    ///
    /// Returns [`OctreeError::EmptyPyramid`] if `data` is empty and
    /// [`OctreeError::LevelShapeMismatch`] if any kept `data[i]` is not the
    /// size given by [`LevelInfo::image_shape`] for level `i`.
    pub fn from_levels(
        slice_id: SliceId,
        meta: LevelMetadata,
        mut data: Vec<S>,
        options: &PyramidOptions,
    ) -> Result<Self, OctreeError> {
        if data.is_empty() {
            return Err(OctreeError::EmptyPyramid);
        }

        data.truncate(options.level_limit());

        for (level_index, level_data) in data.iter().enumerate() {
            let expected = LevelInfo::new(&meta, level_index).image_shape();
            if level_data.dims() != expected {
                return Err(OctreeError::LevelShapeMismatch {
                    level_index,
                    expected,
                    actual: level_data.dims(),
                });
            }
        }

        let levels: Vec<_> = data
            .into_iter()
            .enumerate()
            .map(|(index, level_data)| options.make_level(slice_id, level_data, &meta, index))
            .collect();

        Ok(Self {
            slice_id,
            meta,
            supplied_levels: levels.len(),
            levels,
        })
    }

    /// Slice every level was cut from.
    pub fn slice_id(&self) -> SliceId {
        self.slice_id
    }

    /// Pyramid metadata.
    pub fn meta(&self) -> &LevelMetadata {
        &self.meta
    }

    /// Number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Number of levels supplied by the caller; the rest were downsampled.
    pub fn supplied_levels(&self) -> usize {
        self.supplied_levels
    }

    /// All levels, finest first.
    pub fn levels(&self) -> &[OctreeLevel<S>] {
        &self.levels
    }

    /// Level `level_index`, if the pyramid has it.
    pub fn level(&self, level_index: usize) -> Option<&OctreeLevel<S>> {
        self.levels.get(level_index)
    }

    /// Mutable access to level `level_index`.
    pub fn level_mut(&mut self, level_index: usize) -> Option<&mut OctreeLevel<S>> {
        self.levels.get_mut(level_index)
    }

    /// The coarsest level.
    pub fn root(&self) -> &OctreeLevel<S> {
        // never empty: from_levels rejects an empty list
        &self.levels[self.levels.len() - 1]
    }

    /// [`OctreeLevel::get_chunk`] on level `level_index`.
    ///
    /// A missing level is treated like an out-of-bounds tile.
    pub fn get_chunk(
        &mut self,
        level_index: usize,
        row: usize,
        col: usize,
        create: bool,
    ) -> Option<Arc<Chunk<S::View>>> {
        self.levels
            .get_mut(level_index)?
            .get_chunk(row, col, create)
    }

    /// Resolve a location to a chunk of this pyramid.
    ///
    /// Locations from another layer or slice resolve to `None`.
    pub fn chunk_at(
        &mut self,
        location: &Location,
        create: bool,
    ) -> Option<Arc<Chunk<S::View>>> {
        if location.layer_ref != self.meta.layer_ref() || location.slice_id != self.slice_id {
            return None;
        }
        self.get_chunk(location.level_index, location.row, location.col, create)
    }

    /// The chunk one level coarser covering `location`.
    ///
    /// `None` at the root, or when the parent is not materialized and
    /// `create` is false.
    pub fn parent(&mut self, location: &Location, create: bool) -> Option<Arc<Chunk<S::View>>> {
        self.chunk_at(&location.parent()?, create)
    }

    /// The chunks one level finer covered by `location`.
    ///
    /// Children outside the finer grid are skipped, so edge tiles of a
    /// non-power-of-two image may have fewer than four.
    pub fn children(&mut self, location: &Location, create: bool) -> Vec<Arc<Chunk<S::View>>> {
        let Some(children) = location.children() else {
            return Vec::new();
        };

        children
            .iter()
            .filter_map(|child| self.chunk_at(child, create))
            .collect()
    }

    /// One summary per level, finest first.
    pub fn summaries(&self) -> Vec<LevelSummary> {
        let mut summaries = Vec::with_capacity(self.levels.len());
        self.report(&mut summaries);
        summaries
    }

    /// Send one summary per level to `reporter`.
    pub fn report<R: LevelReporter + ?Sized>(&self, reporter: &mut R) {
        report_levels(&self.levels, 0, reporter);
    }

    /// Send summaries of only the downsampled levels to `reporter`.
    ///
    /// Level numbers stay correct: they start at [`Pyramid::supplied_levels`].
    pub fn report_extra<R: LevelReporter + ?Sized>(&self, reporter: &mut R) {
        report_levels(
            &self.levels[self.supplied_levels..],
            self.supplied_levels,
            reporter,
        );
    }
}

impl Pyramid<ImageArray> {
    /// Build a full pyramid from a single full-resolution image.
    ///
    /// Each level is a 2x box-filtered copy of the previous one. Assembly
    /// stops once a level has a single tile, at `options.stop_level`, or at
    /// [`MAX_LEVELS`].
    pub fn build(
        slice_id: SliceId,
        meta: LevelMetadata,
        base: ImageArray,
        options: &PyramidOptions,
    ) -> Result<Self, OctreeError> {
        Self::from_multiscale(slice_id, meta, vec![base], options)
    }

    /// Use the supplied levels, then downsample extra levels up to the root.
    pub fn from_multiscale(
        slice_id: SliceId,
        meta: LevelMetadata,
        data: Vec<ImageArray>,
        options: &PyramidOptions,
    ) -> Result<Self, OctreeError> {
        let mut pyramid = Self::from_levels(slice_id, meta, data, options)?;
        pyramid.extend_to_root(options);

        debug!(
            slice = %slice_id,
            levels = pyramid.num_levels(),
            supplied = pyramid.supplied_levels,
            "Built pyramid"
        );

        Ok(pyramid)
    }

    fn extend_to_root(&mut self, options: &PyramidOptions) {
        let limit = options.level_limit();

        while self.levels.len() < limit && self.root().info().num_tiles() > 1 {
            let level_index = self.levels.len();
            let data = self.root().data().downsample();

            debug!(
                level = level_index,
                height = data.height(),
                width = data.width(),
                "Downsampled extra level"
            );

            let level = options.make_level(self.slice_id, data, &self.meta, level_index);
            self.levels.push(level);
        }
    }
}

impl<S: TileSource> std::fmt::Debug for Pyramid<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pyramid")
            .field("slice_id", &self.slice_id)
            .field("meta", &self.meta)
            .field("levels", &self.levels)
            .field("supplied_levels", &self.supplied_levels)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
