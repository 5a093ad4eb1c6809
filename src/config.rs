//! Configuration for the `octree-info` binary.
//!
//! Options come from command-line arguments via clap, or from environment
//! variables with the `OCTREE_` prefix, with defaults for everything.
//!
//! # Environment Variables
//!
//! - `OCTREE_INPUT` - Image file to load (default: synthetic image)
//! - `OCTREE_SYNTHETIC` - Synthetic image size as `HEIGHTxWIDTH` (default: 1000x800)
//! - `OCTREE_CHANNELS` - Channels of the synthetic image (default: 1)
//! - `OCTREE_TILE_SIZE` - Tile edge length in pixels (default: 256)
//! - `OCTREE_STOP_LEVEL` - Highest level to build (default: up to single tile)
//! - `OCTREE_CACHE_CAPACITY` - Max chunks cached per level (default: unbounded)
//! - `OCTREE_FORMAT` - Output format, `text` or `json` (default: text)

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::octree::{PyramidOptions, DEFAULT_TILE_SIZE, MAX_LEVELS};

// =============================================================================
// Default Values
// =============================================================================

/// Default synthetic image size.
pub const DEFAULT_SYNTHETIC_SIZE: &str = "1000x800";

/// Default number of channels of the synthetic image.
pub const DEFAULT_CHANNELS: usize = 1;

/// Largest supported tile edge length.
pub const MAX_TILE_SIZE: usize = 16 * 1024;

// =============================================================================
// Output Format
// =============================================================================

/// How level summaries are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One log line per level
    #[default]
    Text,
    /// A JSON document on stdout
    Json,
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// octree-info - Inspect the tile pyramid of an image.
///
/// Builds the multiresolution tile pyramid of an image file (or a synthetic
/// test image) and reports the image and tile-grid size of every level.
#[derive(Parser, Debug, Clone)]
#[command(name = "octree-info")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Input Configuration
    // =========================================================================
    /// Image file to build the pyramid from.
    ///
    /// If not specified, a synthetic gradient image is used.
    #[arg(env = "OCTREE_INPUT")]
    pub input: Option<PathBuf>,

    /// Size of the synthetic image as HEIGHTxWIDTH.
    #[arg(long, default_value = DEFAULT_SYNTHETIC_SIZE, env = "OCTREE_SYNTHETIC")]
    pub synthetic: String,

    /// Channels of the synthetic image (1 = grayscale, 3 = RGB, 4 = RGBA).
    #[arg(long, default_value_t = DEFAULT_CHANNELS, env = "OCTREE_CHANNELS")]
    pub channels: usize,

    // =========================================================================
    // Pyramid Configuration
    // =========================================================================
    /// Tile edge length in pixels.
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE, env = "OCTREE_TILE_SIZE")]
    pub tile_size: usize,

    /// Highest level to build.
    ///
    /// If not specified, levels are added until one tile covers the image.
    #[arg(long, env = "OCTREE_STOP_LEVEL")]
    pub stop_level: Option<usize>,

    /// Maximum number of chunks cached per level.
    ///
    /// If not specified, chunks are kept for the lifetime of the pyramid.
    #[arg(long, env = "OCTREE_CACHE_CAPACITY")]
    pub cache_capacity: Option<usize>,

    /// Create every tile of every level and report chunk counts.
    #[arg(long, default_value_t = false)]
    pub materialize: bool,

    // =========================================================================
    // Output Configuration
    // =========================================================================
    /// Output format for level summaries.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "OCTREE_FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            return Err(format!(
                "tile_size must be between 1 and {}",
                MAX_TILE_SIZE
            ));
        }

        if self.cache_capacity == Some(0) {
            return Err("cache_capacity must be greater than 0".to_string());
        }

        if let Some(stop_level) = self.stop_level {
            if stop_level >= MAX_LEVELS {
                return Err(format!("stop_level must be less than {}", MAX_LEVELS));
            }
        }

        if self.input.is_none() {
            self.synthetic_shape()?;
            if !matches!(self.channels, 1 | 3 | 4) {
                return Err("channels must be 1, 3 or 4".to_string());
            }
        }

        Ok(())
    }

    /// Parse the synthetic image size as `(height, width)`.
    pub fn synthetic_shape(&self) -> Result<(usize, usize), String> {
        parse_shape(&self.synthetic)
    }

    /// Pyramid options described by this configuration.
    pub fn pyramid_options(&self) -> PyramidOptions {
        PyramidOptions {
            stop_level: self.stop_level,
            cache_capacity: self.cache_capacity.and_then(NonZeroUsize::new),
        }
    }
}

/// Parse `HEIGHTxWIDTH` into `(height, width)`, both non-zero.
pub fn parse_shape(value: &str) -> Result<(usize, usize), String> {
    let (height, width) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{}': expected HEIGHTxWIDTH", value))?;

    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| format!("invalid size '{}': dimensions must be positive integers", value))
    };

    Ok((parse(height)?, parse(width)?))
}

// =============================================================================
// Tests
// =============================================================================
