//! # Tile Octree
//!
//! A multiresolution tile cache for viewing images far larger than memory or
//! screen.
//!
//! An image is split into a pyramid of resolution levels, and every level into
//! a grid of fixed-size tiles. Tiles ("chunks") are materialized only when a
//! caller asks for them, then cached with a stable identity so renderers can
//! correlate them across levels and slices.
//!
//! ## Features
//!
//! - **Lazy materialization**: Tiles are cut from the source only on request
//! - **Zero-copy views**: Chunks share the source buffer instead of copying it
//! - **Non-power-of-two images**: Edge tiles are clipped, off-grid probes are `None`
//! - **Optional eviction**: Per-level LRU bound on the number of cached chunks
//! - **Pluggable reporting**: Level summaries go to a caller-supplied reporter
//!
//! ## Architecture
//!
//! - [`array`] - Data sources and the in-memory [`ImageArray`]
//! - [`octree`] - Levels, chunks, locations and pyramid assembly
//! - [`report`] - Per-level size summaries
//! - [`config`] - CLI configuration for the `octree-info` binary
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use tile_octree::{ImageArray, LayerRef, LevelMetadata, Pyramid, PyramidOptions, SliceId};
//!
//! let meta = LevelMetadata::new((300, 300), 100, LayerRef::new(1)).unwrap();
//! let base = ImageArray::from_fn(300, 300, None, |row, col, _| (row ^ col) as u8);
//! let mut pyramid = Pyramid::build(SliceId::new(0), meta, base, &PyramidOptions::new()).unwrap();
//!
//! // 3x3 tiles at full resolution, then 2x2, then a single root tile.
//! assert_eq!(pyramid.num_levels(), 3);
//!
//! let chunk = pyramid.get_chunk(0, 2, 2, true).unwrap();
//! assert_eq!(chunk.data().dims(), (100, 100));
//! assert_eq!(chunk.geom().pos, [200.0, 200.0]);
//! ```

pub mod array;
pub mod config;
pub mod error;
pub mod octree;
pub mod report;

// Re-export commonly used types
pub use array::{ImageArray, TileSource};
pub use config::{Config, OutputFormat};
pub use error::OctreeError;
pub use octree::{
    Chunk, ChunkGeom, LayerRef, LevelInfo, LevelMetadata, Location, OctreeLevel, Pyramid,
    PyramidOptions, SharedLevel, SliceId, DEFAULT_TILE_SIZE, MAX_LEVELS,
};
pub use report::{intword, report_levels, LevelReporter, LevelSummary, TracingReporter};
