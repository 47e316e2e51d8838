//! System probe implementation for stella-runtime.
//!
//! [`HardwareProbe`] implements `SystemProbePort` from stella-core on top of
//! a [`CommandRunner`]. Every probe failure is logged at `debug` and
//! downgraded to "absent"; nothing here fails outward.

mod commands;
mod gpu;
mod presence;

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use stella_core::ports::{CommandRunner, ProbeResult, SystemProbePort};
use stella_core::{CapabilityModel, GpuType, HardwareFacts, PerformanceProfile};

pub use commands::{PROBE_TIMEOUT, ProcessCommandRunner, first_output_line};
pub use gpu::{
    parse_amd_memory, parse_amd_usage, parse_card_id, parse_nvidia_memory, parse_rocm_version,
    runtime_config_lacks_gpu,
};
pub use presence::{parse_hid_idle_time, parse_xprintidle};

const OLLAMA: &str = "ollama";

/// Default implementation of `SystemProbePort`.
///
/// Constructed once in the CLI composition root. Tests substitute a
/// scripted [`CommandRunner`] and a fixed CPU count.
pub struct HardwareProbe<R> {
    runner: R,
    logical_cpus: usize,
    runtime_config: Option<PathBuf>,
}

impl HardwareProbe<ProcessCommandRunner> {
    /// Probe the real system.
    pub fn system() -> Self {
        Self::new(ProcessCommandRunner::new())
    }
}

impl<R: CommandRunner> HardwareProbe<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            logical_cpus: num_cpus::get(),
            runtime_config: None,
        }
    }

    /// Runtime config file inspected by the AMD compatibility check.
    #[must_use]
    pub fn with_runtime_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.runtime_config = Some(path.into());
        self
    }

    /// Override the logical CPU count.
    #[must_use]
    pub const fn with_cpu_count(mut self, logical_cpus: usize) -> Self {
        self.logical_cpus = logical_cpus;
        self
    }

    /// Build the capability model for `profile`.
    ///
    /// The low profile uses fixed values and runs no probes.
    pub async fn detect(&self, profile: PerformanceProfile) -> CapabilityModel {
        match profile {
            PerformanceProfile::Low => CapabilityModel::low_memory(),
            PerformanceProfile::Full => {
                let facts = self.detect_facts().await;
                let model = CapabilityModel::from_facts(&facts);
                debug!(
                    gpu = %model.gpu_type,
                    threads = model.cpu_threads,
                    batch = model.batch_size,
                    "Capability model built"
                );
                model
            }
        }
    }

    /// Probe AMD first, NVIDIA only if AMD is absent, then the runtime version.
    pub async fn detect_facts(&self) -> HardwareFacts {
        let gpu = match gpu::probe_amd(&self.runner).await {
            Ok(gpu) => Some(gpu),
            Err(amd) => {
                debug!(error = %amd, "No AMD GPU");
                match gpu::probe_nvidia(&self.runner).await {
                    Ok(gpu) => Some(gpu),
                    Err(nvidia) => {
                        debug!(error = %nvidia, "No NVIDIA GPU");
                        None
                    }
                }
            }
        };

        let runtime_version = match self.runtime_version().await {
            Ok(version) => version,
            Err(e) => {
                debug!(error = %e, "Runtime version unavailable");
                None
            }
        };

        HardwareFacts {
            logical_cpus: self.logical_cpus,
            gpu,
            runtime_version,
        }
    }

    async fn runtime_version(&self) -> ProbeResult<Option<String>> {
        let output = self
            .runner
            .run(OLLAMA, &["--version"])
            .await?
            .require_success(OLLAMA)?;
        Ok(first_output_line(&output))
    }
}

#[async_trait]
impl<R: CommandRunner> SystemProbePort for HardwareProbe<R> {
    async fn detect_hardware(&self) -> HardwareFacts {
        self.detect_facts().await
    }

    async fn idle_seconds(&self) -> u64 {
        presence::idle_seconds(&self.runner).await
    }

    async fn compatibility_issues(&self, gpu_type: GpuType) -> Vec<String> {
        match gpu_type {
            GpuType::Amd => {
                gpu::amd_compatibility_issues(&self.runner, self.runtime_config.as_deref()).await
            }
            GpuType::Nvidia | GpuType::None => Vec::new(),
        }
    }

    async fn gpu_usage(&self, gpu_type: GpuType) -> Vec<String> {
        match gpu_type {
            GpuType::Amd => gpu::amd_usage(&self.runner).await,
            GpuType::Nvidia => gpu::nvidia_usage(&self.runner).await,
            GpuType::None => vec!["No GPU detected".to_string()],
        }
    }
}
