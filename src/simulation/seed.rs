//! First-generation loading
//!
//! A seed image is optional and never fatal: if it is missing or cannot be
//! decoded the simulation starts from the configured pattern instead.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage};

use super::{grid::CellGrid, patterns::SeedPattern};
use crate::config::LifeConfig;

/// Red channel threshold above which a pixel is a live cell
const ALIVE_THRESHOLD: u8 = 127;

/// Decode a seed image into a grid of the given size
///
/// The image is resampled (nearest) when its size differs from the
/// simulation, and flipped so its top row lands on the top row of the grid.
pub fn load_seed_image(
    path: &Path,
    width: u32,
    height: u32,
) -> Result<CellGrid, image::ImageError> {
    let image = image::open(path)?;
    Ok(decode_seed(image, width, height))
}

pub fn decode_seed(image: DynamicImage, width: u32, height: u32) -> CellGrid {
    let image = if image.width() != width || image.height() != height {
        log::debug!(
            "Resampling seed image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        image.resize_exact(width, height, FilterType::Nearest)
    } else {
        image
    };

    let rgba = image.to_rgba8();
    let mut grid = CellGrid::new(width, height);
    grid.fill_with(|x, y| rgba.get_pixel(x, height - 1 - y)[0] > ALIVE_THRESHOLD);
    grid
}

/// First generation for a configuration
///
/// Seed image when one is configured and readable, the configured pattern otherwise.
pub fn initial_generation(config: &LifeConfig) -> CellGrid {
    if let Some(path) = &config.seed_image {
        match load_seed_image(path, config.width, config.height) {
            Ok(grid) => {
                log::info!(
                    "Loaded seed image {} ({} live cells)",
                    path.display(),
                    grid.population()
                );
                return grid;
            }
            Err(e) => {
                log::warn!(
                    "Could not load seed image {}: {}; using {} pattern",
                    path.display(),
                    e,
                    config.seed_pattern.as_str()
                );
            }
        }
    }

    let grid = config.seed_pattern.build(config.width, config.height);
    if config.seed_pattern != SeedPattern::Empty {
        log::info!(
            "Initial {} pattern: {} live cells",
            config.seed_pattern.as_str(),
            grid.population()
        );
    }
    grid
}
