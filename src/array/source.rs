//! TileSource trait for level data access.
//!
//! A level does not care how its pixels are stored. It only needs the spatial
//! extent of the data and a way to cut out a rectangle, which may be a lazy
//! view whose decode work happens later in the rendering path.

use std::ops::Range;
use std::sync::Arc;

/// Data backing one resolution level of one slice.
///
/// The first two axes are spatial (height, width). A trailing channel axis,
/// when present, is never sliced.
pub trait TileSource {
    /// The type handed out for a sliced region.
    type View: Clone;

    /// Number of axes: 2 for single-channel data, 3 with a channel axis.
    fn ndim(&self) -> usize;

    /// Spatial extent as `(height, width)`.
    fn dims(&self) -> (usize, usize);

    /// Cut out `rows x cols`.
    ///
    /// Ranges reaching past the data are clipped to the intersecting region.
    /// A range that lies entirely outside yields an empty view, not a panic.
    fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> Self::View;
}

impl<S: TileSource + ?Sized> TileSource for Arc<S> {
    type View = S::View;

    fn ndim(&self) -> usize {
        (**self).ndim()
    }

    fn dims(&self) -> (usize, usize) {
        (**self).dims()
    }

    fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> Self::View {
        (**self).slice(rows, cols)
    }
}
