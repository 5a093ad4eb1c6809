//! Async-safe access to a single level.
//!
//! [`OctreeLevel`] needs `&mut self` to materialize chunks. [`SharedLevel`]
//! puts it behind a `tokio` read-write lock so that many tasks can probe a
//! level concurrently while creation stays serialized.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::chunk::Chunk;
use super::level::{LevelInfo, OctreeLevel};
use crate::array::TileSource;

/// A level shared across tasks.
///
/// Non-creating probes take the read lock and may run in parallel. Creating
/// calls take the write lock, so each chunk is still materialized exactly once.
///
/// # Example
///
/// ```
/// use tile_octree::{ImageArray, LayerRef, LevelMetadata, OctreeLevel, SharedLevel, SliceId};
///
/// #[tokio::main]
/// async fn main() {
///     let meta = LevelMetadata::new((300, 300), 100, LayerRef::new(1)).unwrap();
///     let data = ImageArray::from_fn(300, 300, None, |_, _, _| 0);
///     let shared = SharedLevel::new(OctreeLevel::new(SliceId::new(0), data, &meta, 0));
///
///     assert!(shared.get_chunk(0, 0, false).await.is_none());
///     let chunk = shared.get_chunk(0, 0, true).await.unwrap();
///     assert_eq!(chunk.data().dims(), (100, 100));
/// }
/// ```
pub struct SharedLevel<S: TileSource> {
    inner: Arc<RwLock<OctreeLevel<S>>>,
}

impl<S: TileSource> SharedLevel<S> {
    /// Wrap a level for shared use.
    pub fn new(level: OctreeLevel<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(level)),
        }
    }

    /// [`OctreeLevel::get_chunk`] under the appropriate lock.
    pub async fn get_chunk(
        &self,
        row: usize,
        col: usize,
        create: bool,
    ) -> Option<Arc<Chunk<S::View>>> {
        if !create {
            return self.inner.read().await.peek(row, col);
        }
        self.inner.write().await.get_chunk(row, col, true)
    }

    /// Geometry of the wrapped level.
    pub async fn info(&self) -> LevelInfo {
        *self.inner.read().await.info()
    }

    /// Number of materialized chunks.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether no chunk has been materialized.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Run `f` with read access to the level.
    pub async fn with_level<T>(&self, f: impl FnOnce(&OctreeLevel<S>) -> T) -> T {
        let level = self.inner.read().await;
        f(&level)
    }
}

impl<S: TileSource> Clone for SharedLevel<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
