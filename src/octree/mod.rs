//! Multiresolution tile cache.
//!
//! This module pages an arbitrarily large image into fixed-size tiles that
//! are materialized only when asked for.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │                Pyramid                  │
//! │   (levels 0..n, parent/child lookup)    │
//! └────────────────────┬────────────────────┘
//!                      │ one per level
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              OctreeLevel                │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  LevelInfo   │  │  (row, col) ->  │  │
//! │  │  (geometry)  │  │  Arc<Chunk>     │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │ slices
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              TileSource                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`LevelMetadata`]: Base shape, tile size and owning layer of a pyramid
//! - [`LevelInfo`]: Scale, image shape and tile grid of one level
//! - [`OctreeLevel`]: Lazily materializing chunk cache for one level
//! - [`Chunk`]: Data view, [`ChunkGeom`] placement and [`Location`] identity
//! - [`Pyramid`]: Ordered levels with cross-level navigation
//! - [`SharedLevel`]: Lock-protected level for use from async tasks
//!
//! # Example
//!
//! ```
//! use tile_octree::{ImageArray, LayerRef, LevelMetadata, Pyramid, PyramidOptions, SliceId};
//!
//! let meta = LevelMetadata::new((250, 250), 100, LayerRef::new(1)).unwrap();
//! let base = ImageArray::from_fn(250, 250, None, |r, c, _| (r + c) as u8);
//! let mut pyramid = Pyramid::build(SliceId::new(0), meta, base, &PyramidOptions::new()).unwrap();
//!
//! let level = pyramid.level_mut(0).unwrap();
//! assert!(level.get_chunk(2, 2, false).is_none());
//!
//! let chunk = level.get_chunk(2, 2, true).unwrap();
//! assert_eq!(chunk.data().dims(), (50, 50));
//! assert_eq!(chunk.geom().pos, [200.0, 200.0]);
//! ```

mod chunk;
mod level;
mod metadata;
mod pyramid;
mod shared;

pub use chunk::{Chunk, ChunkGeom, Location};
pub use level::{LevelInfo, OctreeLevel};
pub use metadata::{LayerRef, LevelMetadata, SliceId, DEFAULT_TILE_SIZE};
pub use pyramid::{Pyramid, PyramidOptions, MAX_LEVELS};
pub use shared::SharedLevel;
