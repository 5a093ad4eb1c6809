//! Per-level size reporting.
//!
//! Reporting is done through a [`LevelReporter`] handed in by the caller, so
//! the octree itself never writes to a global logger. [`TracingReporter`]
//! forwards summaries to `tracing`; a `Vec<LevelSummary>` collects them.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::array::TileSource;
use crate::octree::{LevelInfo, OctreeLevel};

/// Unit names for [`intword`], each 1000x the previous, starting at 10^6
const POWER_NAMES: [&str; 5] = ["million", "billion", "trillion", "quadrillion", "quintillion"];

/// Write a count with a magnitude word once it reaches one million.
///
/// ```
/// use tile_octree::report::intword;
///
/// assert_eq!(intword(800_000), "800000");
/// assert_eq!(intword(1_200_000), "1.2 million");
/// assert_eq!(intword(999_999_999), "1.0 billion");
/// ```
pub fn intword(value: u64) -> String {
    let mut power = 1_000_000u64;
    if value < power {
        return value.to_string();
    }

    for (index, name) in POWER_NAMES.iter().enumerate() {
        let next = power.checked_mul(1000);
        if next.map_or(true, |next| value < next) {
            let chopped = format!("{:.1}", value as f64 / power as f64);

            // 999.95 million rounds up to "1000.0": promote to the next unit.
            if let (Some(next), Some(next_name)) = (next, POWER_NAMES.get(index + 1)) {
                if chopped == "1000.0" {
                    return format!("{:.1} {}", value as f64 / next as f64, next_name);
                }
            }
            return format!("{} {}", chopped, name);
        }
        // `next` is Some here: value >= next implies it did not overflow
        power = next.unwrap_or(u64::MAX);
    }

    value.to_string()
}

// =============================================================================
// LevelSummary
// =============================================================================

/// Size summary of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    /// Level number as reported
    pub level_index: usize,

    /// Image size at this level as `(height, width)`
    pub image_shape: (usize, usize),

    /// Tile grid as `(rows, cols)`
    pub shape_in_tiles: (usize, usize),
}

impl LevelSummary {
    /// Summarize `info`, reporting it as level `level_index`.
    pub fn new(level_index: usize, info: &LevelInfo) -> Self {
        Self {
            level_index,
            image_shape: info.image_shape(),
            shape_in_tiles: info.shape_in_tiles(),
        }
    }

    /// Pixel count at this level.
    pub fn pixels(&self) -> u64 {
        (self.image_shape.0 as u64) * (self.image_shape.1 as u64)
    }

    /// Tile count at this level.
    pub fn tiles(&self) -> u64 {
        (self.shape_in_tiles.0 as u64) * (self.shape_in_tiles.1 as u64)
    }
}

fn dim_str(dim: (usize, usize)) -> String {
    let count = (dim.0 as u64) * (dim.1 as u64);
    format!("({}, {}) = {}", dim.0, dim.1, intword(count))
}

impl fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level {}: {} pixels -> {} tiles",
            self.level_index,
            dim_str(self.image_shape),
            dim_str(self.shape_in_tiles)
        )
    }
}

// =============================================================================
// Reporters
// =============================================================================

/// Receives one summary per level.
pub trait LevelReporter {
    /// Handle the summary of one level.
    fn report(&mut self, summary: &LevelSummary);
}

/// Emits each summary as a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl LevelReporter for TracingReporter {
    fn report(&mut self, summary: &LevelSummary) {
        info!("{}", summary);
    }
}

impl LevelReporter for Vec<LevelSummary> {
    fn report(&mut self, summary: &LevelSummary) {
        self.push(summary.clone());
    }
}

/// Report every level in `levels`, numbering them from `start_level`.
///
/// `start_level` lets callers report a tail of a pyramid, such as the extra
/// downsampled levels, with their real level numbers.
pub fn report_levels<S, R>(levels: &[OctreeLevel<S>], start_level: usize, reporter: &mut R)
where
    S: TileSource,
    R: LevelReporter + ?Sized,
{
    for (offset, level) in levels.iter().enumerate() {
        reporter.report(&LevelSummary::new(start_level + offset, level.info()));
    }
}

// =============================================================================
// Tests
// =============================================================================
