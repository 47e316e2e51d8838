//! Runtime configuration for GPU acceleration.
//!
//! [`RuntimeConfigurator::apply`] computes the environment variables the
//! model runtime needs and, for AMD, merges acceleration keys into the
//! runtime's `config.json`. Environment changes are returned as an
//! [`EnvironmentEffects`] value; [`apply_to_process`] is the only place
//! that mutates the process environment.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use stella_core::{CapabilityModel, EnvironmentEffects, GpuType};

/// CPU thread count above which NUMA is enabled in the runtime config.
const NUMA_THREAD_THRESHOLD: usize = 8;

/// Errors writing the runtime configuration file.
#[derive(Debug, Error)]
pub enum ConfiguratorError {
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize runtime config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Computes and persists GPU-specific runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfigurator {
    config_path: PathBuf,
    linux: bool,
}

impl RuntimeConfigurator {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            linux: cfg!(target_os = "linux"),
        }
    }

    /// Treat the host as Linux (or not) regardless of the build target.
    #[must_use]
    pub const fn with_linux(mut self, linux: bool) -> Self {
        self.linux = linux;
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Compute environment effects and persist the config file where needed.
    ///
    /// Never fails: write errors are logged at `warn`.
    pub fn apply(&self, model: &CapabilityModel) -> EnvironmentEffects {
        match model.gpu_type {
            GpuType::Amd => {
                if let Err(e) = self.write_amd_config(model) {
                    warn!(error = %e, "Could not update runtime config");
                }
                amd_effects()
            }
            GpuType::Nvidia if self.linux => {
                EnvironmentEffects::new().with("CUDA_VISIBLE_DEVICES", "0")
            }
            GpuType::Nvidia | GpuType::None => EnvironmentEffects::new(),
        }
    }

    /// Load-merge-write of the runtime config. Unknown keys are preserved.
    pub fn write_amd_config(&self, model: &CapabilityModel) -> Result<(), ConfiguratorError> {
        let mut config = load_config_object(&self.config_path);
        config.insert("gpu".into(), Value::Bool(true));
        config.insert("hipblas".into(), Value::Bool(true));
        config.insert("rocblas".into(), Value::Bool(true));
        config.insert("gpu_layers".into(), Value::from(-1));
        config.insert("f16".into(), Value::Bool(true));
        config.insert(
            "numa".into(),
            Value::Bool(model.cpu_threads > NUMA_THREAD_THRESHOLD),
        );

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfiguratorError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut body = serde_json::to_string_pretty(&Value::Object(config))?;
        body.push('\n');
        fs::write(&self.config_path, body).map_err(|source| ConfiguratorError::Write {
            path: self.config_path.clone(),
            source,
        })?;

        info!(path = %self.config_path.display(), "Runtime config updated for AMD GPU");
        Ok(())
    }
}

fn amd_effects() -> EnvironmentEffects {
    EnvironmentEffects::new()
        .with("HIP_VISIBLE_DEVICES", "0")
        .with("GPU_MAX_HEAP_SIZE", "100%")
        .with("GPU_USE_SYNC_OBJECTS", "1")
        .with("GPU_MAX_ALLOC_PERCENT", "100")
        .with("GPU_SINGLE_ALLOC_PERCENT", "100")
        .with("HSA_ENABLE_SDMA", "0")
}

/// Existing config as a JSON object; anything unreadable counts as `{}`.
fn load_config_object(path: &Path) -> Map<String, Value> {
    let Ok(raw) = fs::read_to_string(path) else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            debug!(path = %path.display(), "Ignoring unreadable runtime config");
            Map::new()
        }
    }
}

/// Export `effects` into the process environment.
///
/// Call once at startup from the composition root, while no other task is
/// in flight.
#[allow(unsafe_code)]
pub fn apply_to_process(effects: &EnvironmentEffects) {
    for (name, value) in effects.iter() {
        debug!(name, value, "Setting environment variable");
        // SAFETY: the CLI runs a current-thread runtime and every earlier
        // blocking task has completed, so nothing reads the environment
        // concurrently.
        unsafe {
            std::env::set_var(name, value);
        }
    }
}
