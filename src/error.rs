use thiserror::Error;

/// Errors raised while constructing octree inputs.
///
/// Tile lookups never fail: a tile that does not exist yet, or that lies
/// outside the grid, is reported as `None` by the level. These errors only
/// cover malformed construction parameters and pixel buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OctreeError {
    /// Tile edge length must be at least one pixel
    #[error("Invalid tile size: {0} (must be greater than 0)")]
    InvalidTileSize(usize),

    /// Base image has a zero dimension
    #[error("Invalid base shape: ({height}, {width}) (both dimensions must be greater than 0)")]
    InvalidBaseShape { height: usize, width: usize },

    /// Pixel buffer length does not match the declared shape
    #[error("Buffer size mismatch: shape requires {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Trailing channel axis must hold at least one sample
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    /// Decoded image uses a pixel layout we cannot convert
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// A pyramid needs at least one level
    #[error("Cannot build a pyramid without levels")]
    EmptyPyramid,

    /// Supplied level data disagrees with the shape its level should have
    #[error("Level {level_index} shape mismatch: expected {expected:?}, got {actual:?}")]
    LevelShapeMismatch {
        level_index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },
}
