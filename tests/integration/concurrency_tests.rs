//! Shared level tests.
//!
//! Tests verify:
//! - Concurrent creation of the same tile yields one chunk
//! - Concurrent creation of different tiles fills the grid exactly once
//! - Probes from other tasks see chunks created elsewhere

use std::collections::HashSet;
use std::sync::Arc;

use tile_octree::{SharedLevel, SliceId};

use super::test_utils::{base_level, metadata, position_image, CountingSource};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_tile() {
    let level = SharedLevel::new(base_level(500, 500, 100));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let level = level.clone();
            tokio::spawn(async move { level.get_chunk(4, 4, true).await })
        })
        .collect();

    let mut chunks = Vec::new();
    for handle in handles {
        chunks.push(handle.await.unwrap().unwrap());
    }

    assert!(chunks.iter().all(|c| Arc::ptr_eq(c, &chunks[0])));
    assert_eq!(level.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_fill_slices_each_tile_once() {
    let meta = metadata(500, 400, 100);
    let source = CountingSource::new(position_image(500, 400));
    let level = SharedLevel::new(tile_octree::OctreeLevel::new(
        SliceId::new(0),
        source,
        &meta,
        0,
    ));

    let mut handles = Vec::new();
    for worker in 0..4 {
        let level = level.clone();
        handles.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            // Every worker walks the whole grid, in a different order.
            for index in 0..20 {
                let index = (index + worker * 5) % 20;
                let chunk = level.get_chunk(index / 4, index % 4, true).await.unwrap();
                seen.push(*chunk.location());
            }
            seen
        }));
    }

    let mut locations = HashSet::new();
    for handle in handles {
        locations.extend(handle.await.unwrap());
    }

    assert_eq!(locations.len(), 20);
    assert_eq!(level.len().await, 20);
    assert_eq!(level.with_level(|l| l.data().slice_count()).await, 20);
}

#[tokio::test]
async fn test_probe_sees_chunk_from_other_task() {
    let level = SharedLevel::new(base_level(300, 300, 100));

    let writer = level.clone();
    let created = tokio::spawn(async move { writer.get_chunk(1, 2, true).await })
        .await
        .unwrap()
        .unwrap();

    let probed = level.get_chunk(1, 2, false).await.unwrap();
    assert!(Arc::ptr_eq(&created, &probed));
    assert!(level.get_chunk(2, 1, false).await.is_none());
}
