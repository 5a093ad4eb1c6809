//! Pixel data sources.
//!
//! This module defines what a level needs from its pixels and provides an
//! in-memory implementation.
//!
//! # Components
//!
//! - [`TileSource`]: Spatial dimensions plus clipped rectangular slicing
//! - [`ImageArray`]: 8-bit 2-D or 3-D array over a shared `Bytes` buffer
//!
//! Slicing an [`ImageArray`] never copies pixels. The returned view shares
//! the parent buffer, so materializing a chunk is cheap even for very large
//! images; pixels are only copied when a consumer asks for them.

mod image_array;
mod source;

pub use image_array::ImageArray;
pub use source::TileSource;
