//! octree-info - Inspect the tile pyramid of an image.
//!
//! This binary builds a pyramid over an image file or a synthetic image and
//! reports the size of every level.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tile_octree::{
    config::{Config, OutputFormat},
    report::{LevelSummary, TracingReporter},
    ImageArray, LayerRef, LevelMetadata, Pyramid, SliceId,
};

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Per-level counts gathered by `--materialize`.
#[derive(Debug, Serialize)]
struct MaterializedLevel {
    level_index: usize,
    chunks: usize,
    bytes: usize,
}

/// JSON document printed with `--format json`.
#[derive(Debug, Serialize)]
struct Report {
    base_shape: (usize, usize),
    tile_size: usize,
    levels: Vec<LevelSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    materialized: Option<Vec<MaterializedLevel>>,
}

fn run(config: &Config) -> Result<(), String> {
    let image = load_image(config)?;
    let (height, width) = image.dims();

    let meta = LevelMetadata::new((height, width), config.tile_size, LayerRef::new(0))
        .map_err(|e| e.to_string())?;

    let mut pyramid = Pyramid::build(SliceId::new(0), meta, image, &config.pyramid_options())
        .map_err(|e| e.to_string())?;

    let materialized = config
        .materialize
        .then(|| materialize_all(&mut pyramid));

    match config.format {
        OutputFormat::Text => {
            info!(
                "Image ({}, {}), tile size {}, {} level(s)",
                height,
                width,
                config.tile_size,
                pyramid.num_levels()
            );
            pyramid.report(&mut TracingReporter);

            for level in materialized.iter().flatten() {
                info!(
                    "Level {}: materialized {} chunk(s), {} bytes",
                    level.level_index, level.chunks, level.bytes
                );
            }
        }
        OutputFormat::Json => {
            let report = Report {
                base_shape: (height, width),
                tile_size: config.tile_size,
                levels: pyramid.summaries(),
                materialized,
            };
            let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Decode the input image, or synthesize a gradient.
fn load_image(config: &Config) -> Result<ImageArray, String> {
    match config.input {
        Some(ref path) => {
            info!("Loading {}", path.display());
            let decoded = image::open(path)
                .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
            ImageArray::from_dynamic_image(decoded).map_err(|e| e.to_string())
        }
        None => {
            let (height, width) = config.synthetic_shape()?;
            let channels = (config.channels > 1).then_some(config.channels);
            Ok(ImageArray::from_fn(height, width, channels, |row, col, channel| {
                ((row * 255 / height) ^ (col * 255 / width) ^ (channel * 85)) as u8
            }))
        }
    }
}

/// Create every tile of every level, returning per-level counts.
fn materialize_all(pyramid: &mut Pyramid<ImageArray>) -> Vec<MaterializedLevel> {
    let mut counts = Vec::with_capacity(pyramid.num_levels());

    for level_index in 0..pyramid.num_levels() {
        let Some(level) = pyramid.level_mut(level_index) else {
            break;
        };

        let (rows, cols) = level.info().shape_in_tiles();
        let mut bytes = 0;
        for row in 0..rows {
            for col in 0..cols {
                if let Some(chunk) = level.get_chunk(row, col, true) {
                    bytes += chunk.data().byte_len();
                }
            }
        }

        counts.push(MaterializedLevel {
            level_index,
            chunks: level.len(),
            bytes,
        });
    }

    counts
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tile_octree=debug,octree_info=debug"
    } else {
        "tile_octree=info,octree_info=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
