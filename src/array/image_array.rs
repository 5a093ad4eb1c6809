//! In-memory 8-bit image arrays with zero-copy slicing.
//!
//! # Layout
//!
//! Samples are stored row-major as `(height, width, channels)`. A 2-D array
//! has one sample per pixel and no channel axis. Views produced by slicing
//! keep the row stride of the array they were cut from, so rows of a view are
//! not necessarily adjacent in the backing buffer.

use std::fmt;
use std::ops::Range;

use bytes::Bytes;
use image::DynamicImage;

use super::TileSource;
use crate::error::OctreeError;

// =============================================================================
// ImageArray
// =============================================================================

/// An 8-bit image array backed by a reference-counted buffer.
///
/// Cloning and slicing are O(1): every view shares the buffer it was created
/// from. Use [`ImageArray::to_vec`] to copy the pixels of a view out.
///
/// # Example
///
/// ```
/// use tile_octree::ImageArray;
///
/// let array = ImageArray::from_fn(250, 250, None, |row, col, _| (row + col) as u8);
///
/// // Clipped at the edge: only 50 rows and columns remain.
/// let corner = array.slice(200..300, 200..300);
/// assert_eq!(corner.dims(), (50, 50));
/// ```
#[derive(Clone)]
pub struct ImageArray {
    /// Samples starting at the first pixel of this view
    data: Bytes,

    /// Height in pixels
    height: usize,

    /// Width in pixels
    width: usize,

    /// Samples per pixel (1 for 2-D arrays)
    channels: usize,

    /// Whether the array has a trailing channel axis
    channel_axis: bool,

    /// Distance in bytes between the starts of consecutive rows
    row_stride: usize,
}

impl ImageArray {
    /// Create a 2-D (single channel) array.
    ///
    /// Returns an error if `data` does not hold exactly `height * width` bytes.
    pub fn new_2d(height: usize, width: usize, data: impl Into<Bytes>) -> Result<Self, OctreeError> {
        Self::from_parts(height, width, 1, false, data.into())
    }

    /// Create a 3-D array with a trailing channel axis.
    ///
    /// Returns an error if `channels` is zero or if `data` does not hold
    /// exactly `height * width * channels` bytes.
    pub fn new_3d(
        height: usize,
        width: usize,
        channels: usize,
        data: impl Into<Bytes>,
    ) -> Result<Self, OctreeError> {
        Self::from_parts(height, width, channels, true, data.into())
    }

    /// Create an array by evaluating `f(row, col, channel)` for every sample.
    ///
    /// `channels` of `None` produces a 2-D array.
    pub fn from_fn<F>(height: usize, width: usize, channels: Option<usize>, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> u8,
    {
        let (samples, channel_axis) = match channels {
            Some(c) => (c.max(1), true),
            None => (1, false),
        };

        let mut data = Vec::with_capacity(height * width * samples);
        for row in 0..height {
            for col in 0..width {
                for channel in 0..samples {
                    data.push(f(row, col, channel));
                }
            }
        }

        Self {
            data: Bytes::from(data),
            height,
            width,
            channels: samples,
            channel_axis,
            row_stride: width * samples,
        }
    }

    /// Convert a decoded image into an array.
    ///
    /// Grayscale images become 2-D arrays; images with color or alpha become
    /// 3-D arrays. Wider sample types are reduced to 8 bits.
    pub fn from_dynamic_image(image: DynamicImage) -> Result<Self, OctreeError> {
        let height = image.height() as usize;
        let width = image.width() as usize;

        match image {
            DynamicImage::ImageLuma8(buf) => Self::new_2d(height, width, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => Self::new_3d(height, width, 2, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => Self::new_3d(height, width, 3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => Self::new_3d(height, width, 4, buf.into_raw()),
            wide @ DynamicImage::ImageLuma16(_) => {
                Self::new_2d(height, width, wide.to_luma8().into_raw())
            }
            wide @ DynamicImage::ImageLumaA16(_) => {
                Self::new_3d(height, width, 2, wide.to_luma_alpha8().into_raw())
            }
            wide @ (DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgb32F(_)) => {
                Self::new_3d(height, width, 3, wide.to_rgb8().into_raw())
            }
            wide @ (DynamicImage::ImageRgba16(_) | DynamicImage::ImageRgba32F(_)) => {
                Self::new_3d(height, width, 4, wide.to_rgba8().into_raw())
            }
            other => Err(OctreeError::UnsupportedImage(format!(
                "{:?}",
                other.color()
            ))),
        }
    }

    fn from_parts(
        height: usize,
        width: usize,
        channels: usize,
        channel_axis: bool,
        data: Bytes,
    ) -> Result<Self, OctreeError> {
        if channels == 0 {
            return Err(OctreeError::UnsupportedChannels(channels));
        }

        let expected = height * width * channels;
        if data.len() != expected {
            return Err(OctreeError::BufferSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            height,
            width,
            channels,
            channel_axis,
            row_stride: width * channels,
        })
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Spatial extent as `(height, width)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Number of axes (2 or 3).
    pub fn ndim(&self) -> usize {
        if self.channel_axis {
            3
        } else {
            2
        }
    }

    /// Length of the channel axis, or `None` for 2-D arrays.
    pub fn channels(&self) -> Option<usize> {
        self.channel_axis.then_some(self.channels)
    }

    /// Full shape: `[height, width]` or `[height, width, channels]`.
    pub fn shape(&self) -> Vec<usize> {
        match self.channels() {
            Some(c) => vec![self.height, self.width, c],
            None => vec![self.height, self.width],
        }
    }

    /// Number of bytes covered by this view.
    pub fn byte_len(&self) -> usize {
        self.height * self.width * self.channels
    }

    /// Whether the view covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Samples of one row, or `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        (row < self.height).then(|| self.row_bytes(row))
    }

    /// Samples of one pixel, or `None` outside the array.
    pub fn pixel(&self, row: usize, col: usize) -> Option<&[u8]> {
        if col >= self.width {
            return None;
        }
        let start = col * self.channels;
        self.row(row).map(|r| &r[start..start + self.channels])
    }

    #[inline]
    fn row_bytes(&self, row: usize) -> &[u8] {
        let start = row * self.row_stride;
        &self.data[start..start + self.width * self.channels]
    }

    /// Cut out `rows x cols` without copying.
    ///
    /// Both ranges are clipped to the array. The channel axis is kept whole.
    pub fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> ImageArray {
        let r0 = rows.start.min(self.height);
        let r1 = rows.end.clamp(r0, self.height);
        let c0 = cols.start.min(self.width);
        let c1 = cols.end.clamp(c0, self.width);

        let height = r1 - r0;
        let width = c1 - c0;

        let data = if height == 0 || width == 0 {
            Bytes::new()
        } else {
            let start = r0 * self.row_stride + c0 * self.channels;
            let end = (r1 - 1) * self.row_stride + c1 * self.channels;
            self.data.slice(start..end)
        };

        ImageArray {
            data,
            height,
            width,
            channels: self.channels,
            channel_axis: self.channel_axis,
            row_stride: self.row_stride,
        }
    }

    /// Copy the pixels of this view into a tightly packed buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        for row in 0..self.height {
            out.extend_from_slice(self.row_bytes(row));
        }
        out
    }

    /// Whether rows are adjacent in the backing buffer.
    pub fn is_contiguous(&self) -> bool {
        self.height <= 1 || self.row_stride == self.width * self.channels
    }

    /// Return a view whose rows are adjacent, copying only if needed.
    pub fn to_contiguous(&self) -> ImageArray {
        if self.is_contiguous() {
            return self.clone();
        }

        ImageArray {
            data: Bytes::from(self.to_vec()),
            height: self.height,
            width: self.width,
            channels: self.channels,
            channel_axis: self.channel_axis,
            row_stride: self.width * self.channels,
        }
    }

    /// Halve both spatial dimensions with a 2x2 box filter.
    ///
    /// Odd trailing rows and columns are dropped, so the result has shape
    /// `(height / 2, width / 2)`. Each channel is averaged independently
    /// with rounding.
    pub fn downsample(&self) -> ImageArray {
        let height = self.height / 2;
        let width = self.width / 2;
        let channels = self.channels;

        let mut out = Vec::with_capacity(height * width * channels);
        for row in 0..height {
            let top = self.row_bytes(2 * row);
            let bottom = self.row_bytes(2 * row + 1);
            for col in 0..width {
                let left = 2 * col * channels;
                let right = left + channels;
                for c in 0..channels {
                    let sum = top[left + c] as u16
                        + top[right + c] as u16
                        + bottom[left + c] as u16
                        + bottom[right + c] as u16;
                    out.push(((sum + 2) / 4) as u8);
                }
            }
        }

        ImageArray {
            data: Bytes::from(out),
            height,
            width,
            channels,
            channel_axis: self.channel_axis,
            row_stride: width * channels,
        }
    }
}

impl TileSource for ImageArray {
    type View = ImageArray;

    fn ndim(&self) -> usize {
        ImageArray::ndim(self)
    }

    fn dims(&self) -> (usize, usize) {
        ImageArray::dims(self)
    }

    fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> ImageArray {
        ImageArray::slice(self, rows, cols)
    }
}

impl PartialEq for ImageArray {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && (0..self.height).all(|r| self.row_bytes(r) == other.row_bytes(r))
    }
}

impl Eq for ImageArray {}

impl fmt::Debug for ImageArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageArray")
            .field("shape", &self.shape())
            .field("contiguous", &self.is_contiguous())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
