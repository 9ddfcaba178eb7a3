//! Runtime configuration
//!
//! A single parameterized program: resolution, fullscreen flag, seed source and
//! interaction radius, plus a few presentation switches. Values come from
//! [`LifeConfig::default`] and can be overridden through `LIFE_*` environment
//! variables.

use std::env;
use std::path::PathBuf;

use crate::simulation::patterns::SeedPattern;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LifeConfig {
    /// Initial window width in physical pixels; also the simulation width
    pub width: u32,
    /// Initial window height in physical pixels; also the simulation height
    pub height: u32,
    /// Borderless fullscreen on the current monitor
    pub fullscreen: bool,
    /// Optional image defining the first generation
    pub seed_image: Option<PathBuf>,
    /// Pattern used when no seed image is given (or it fails to load)
    pub seed_pattern: SeedPattern,
    /// Pointer brush radius in cells
    pub radius: f32,
    /// Directory holding `life_step.wgsl` and `present.wgsl`; embedded shaders when `None`
    pub shader_dir: Option<PathBuf>,
    /// Fifo presentation when true, Immediate otherwise
    pub vsync: bool,
    /// Reallocate the generation pair at the new surface size on resize
    pub resize_simulation: bool,
    /// Read the current generation back and log its population with each FPS report
    pub log_population: bool,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            fullscreen: false,
            seed_image: None,
            seed_pattern: SeedPattern::Empty,
            radius: 5.0,
            shader_dir: None,
            vsync: true,
            resize_simulation: false,
            log_population: false,
        }
    }
}

impl LifeConfig {
    /// Create config from `LIFE_*` environment variables on top of the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup
    ///
    /// Unparseable values are logged and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(width) = parse_var(&lookup, "LIFE_WIDTH") {
            config.width = width;
        }
        if let Some(height) = parse_var(&lookup, "LIFE_HEIGHT") {
            config.height = height;
        }
        if let Some(radius) = parse_var(&lookup, "LIFE_RADIUS") {
            config.radius = radius;
        }
        if let Some(fullscreen) = flag_var(&lookup, "LIFE_FULLSCREEN") {
            config.fullscreen = fullscreen;
        }
        if let Some(vsync) = flag_var(&lookup, "LIFE_VSYNC") {
            config.vsync = vsync;
        }
        if let Some(resize) = flag_var(&lookup, "LIFE_RESIZE_SIMULATION") {
            config.resize_simulation = resize;
        }
        if let Some(population) = flag_var(&lookup, "LIFE_LOG_POPULATION") {
            config.log_population = population;
        }
        if let Some(path) = lookup("LIFE_SEED_IMAGE").filter(|p| !p.is_empty()) {
            config.seed_image = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("LIFE_SHADER_DIR").filter(|p| !p.is_empty()) {
            config.shader_dir = Some(PathBuf::from(dir));
        }
        if let Some(name) = lookup("LIFE_PATTERN") {
            match SeedPattern::from_name(&name) {
                Some(pattern) => config.seed_pattern = pattern,
                None => log::warn!("Ignoring unknown LIFE_PATTERN '{}'", name),
            }
        }

        if config.width == 0 || config.height == 0 {
            log::warn!(
                "Simulation size {}x{} is empty, falling back to the default",
                config.width,
                config.height
            );
            let defaults = Self::default();
            config.width = defaults.width;
            config.height = defaults.height;
        }

        config
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_seed_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_image = Some(path.into());
        self
    }

    pub fn with_seed_pattern(mut self, pattern: SeedPattern) -> Self {
        self.seed_pattern = pattern;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shader_dir = Some(dir.into());
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_resize_simulation(mut self, resize: bool) -> Self {
        self.resize_simulation = resize;
        self
    }

    pub fn with_log_population(mut self, log_population: bool) -> Self {
        self.log_population = log_population;
        self
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparseable {}='{}'", key, raw);
            None
        }
    }
}

fn flag_var<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            log::warn!("Ignoring unparseable {}='{}'", key, raw);
            None
        }
    }
}
