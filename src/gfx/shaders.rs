//! Shader sources and compile-or-fail module creation
//!
//! Both programs are embedded in the binary. A shader directory can replace
//! them at startup; the files are read once and never reloaded.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::error::{LifeError, LifeResult};

pub const LIFE_STEP_FILE: &str = "life_step.wgsl";
pub const PRESENT_FILE: &str = "present.wgsl";

pub const LIFE_STEP_WGSL: &str = include_str!("../simulation/life_step.wgsl");
pub const PRESENT_WGSL: &str = include_str!("rendering/present.wgsl");

/// WGSL text for the compute kernel and the presentation program
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub life_step: Cow<'static, str>,
    pub present: Cow<'static, str>,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::embedded()
    }
}

impl ShaderSources {
    pub fn embedded() -> Self {
        Self {
            life_step: Cow::Borrowed(LIFE_STEP_WGSL),
            present: Cow::Borrowed(PRESENT_WGSL),
        }
    }

    /// Reads both programs from `dir`
    pub fn from_dir(dir: &Path) -> LifeResult<Self> {
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path)
                .map(Cow::Owned)
                .map_err(|source| LifeError::ShaderLoad { path, source })
        };

        log::info!("Loading shaders from {}", dir.display());
        Ok(Self {
            life_step: read(LIFE_STEP_FILE)?,
            present: read(PRESENT_FILE)?,
        })
    }

    /// Embedded sources unless a directory is given
    pub fn load(dir: Option<&Path>) -> LifeResult<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Ok(Self::embedded()),
        }
    }
}

/// Runs `create` inside a validation error scope
///
/// Any validation error raised while creating the object (a WGSL parse error,
/// a pipeline whose interface does not match its layout) is returned as
/// [`LifeError::ShaderCompile`] carrying the validator's message.
pub fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> LifeResult<T> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let created = create();
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(created),
        Some(error) => {
            log::error!("Shader '{}' rejected:\n{}", label, error);
            Err(LifeError::ShaderCompile {
                label: label.to_string(),
                diagnostics: error.to_string(),
            })
        }
    }
}

pub fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> LifeResult<wgpu::ShaderModule> {
    validated(device, label, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_sources_declare_expected_bindings() {
        let sources = ShaderSources::embedded();
        assert!(sources.life_step.contains("@binding(0) var current_generation"));
        assert!(sources.life_step.contains("@binding(1) var next_generation"));
        assert!(sources.life_step.contains("@binding(2) var<uniform> params"));
        assert!(sources.life_step.contains("@workgroup_size(8, 8)"));
        assert!(sources.present.contains("@binding(0) var current_generation"));
        assert!(sources.present.contains("@binding(1)"));
    }

    #[test]
    fn missing_directory_is_a_load_error() {
        let dir = std::env::temp_dir().join("gpu-life-no-such-shader-dir");
        match ShaderSources::load(Some(&dir)) {
            Err(LifeError::ShaderLoad { path, .. }) => {
                assert_eq!(path, dir.join(LIFE_STEP_FILE))
            }
            other => panic!("expected ShaderLoad, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn directory_sources_replace_embedded_ones() {
        let dir = std::env::temp_dir().join(format!("gpu-life-shaders-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(LIFE_STEP_FILE), "// step").unwrap();
        fs::write(dir.join(PRESENT_FILE), "// present").unwrap();

        let sources = ShaderSources::load(Some(&dir)).unwrap();
        assert_eq!(sources.life_step, "// step");
        assert_eq!(sources.present, "// present");

        fs::remove_dir_all(&dir).unwrap();
    }
}
