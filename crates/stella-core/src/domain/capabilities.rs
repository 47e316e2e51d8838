//! Hardware capability model and the resource-sizing policy derived from it.
//!
//! A [`CapabilityModel`] is built exactly once per process, either from the
//! [`HardwareFacts`] gathered by a system probe (full profile) or from fixed
//! minimal values (low profile). Downstream components only ever borrow it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound for the inference thread count.
pub const MAX_CPU_THREADS: usize = 32;

/// Context window handed to the runtime. Not derived from hardware.
pub const DEFAULT_CONTEXT_SIZE: u32 = 4096;

/// Batch size used without a GPU or below the lowest memory tier.
pub const CPU_BATCH_SIZE: u32 = 128;

/// GPU memory thresholds (MiB, inclusive) and their batch sizes, highest first.
pub const BATCH_SIZE_TIERS: [(u64, u32); 3] = [(16_000, 512), (8_000, 256), (4_000, 192)];

const LOW_PROFILE_THREADS: usize = 2;
const LOW_PROFILE_BATCH_SIZE: u32 = 32;
const LOW_PROFILE_CONTEXT_SIZE: u32 = 2048;
/// Five exchanges.
const LOW_PROFILE_MAX_LOG_ENTRIES: usize = 10;

/// GPU vendor detected on the machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuType {
    #[default]
    None,
    Amd,
    Nvidia,
}

impl GpuType {
    /// Lowercase identifier (`none`, `amd`, `nvidia`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Amd => "amd",
            Self::Nvidia => "nvidia",
        }
    }

    /// Human-readable vendor label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Amd => "AMD",
            Self::Nvidia => "NVIDIA",
        }
    }
}

impl fmt::Display for GpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit suffix attached to a memory figure in vendor tool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryUnit {
    #[serde(rename = "GB")]
    Gigabytes,
    #[serde(rename = "MB")]
    Megabytes,
    #[serde(rename = "MiB")]
    Mebibytes,
}

impl MemoryUnit {
    /// Parse an exact unit suffix (`GB`, `MB`, `MiB`).
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "GB" => Some(Self::Gigabytes),
            "MB" => Some(Self::Megabytes),
            "MiB" => Some(Self::Mebibytes),
            _ => None,
        }
    }

    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Gigabytes => "GB",
            Self::Megabytes => "MB",
            Self::Mebibytes => "MiB",
        }
    }

    // Vendor tools use GB loosely for GiB and MB for MiB.
    const fn mib_factor(self) -> f64 {
        match self {
            Self::Gigabytes => 1024.0,
            Self::Megabytes | Self::Mebibytes => 1.0,
        }
    }
}

/// A GPU memory quantity exactly as reported, with its unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuMemory {
    pub amount: f64,
    pub unit: MemoryUnit,
}

impl GpuMemory {
    #[must_use]
    pub const fn new(amount: f64, unit: MemoryUnit) -> Self {
        Self { amount, unit }
    }

    /// Normalise to MiB for policy decisions.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_mib(&self) -> u64 {
        (self.amount.max(0.0) * self.unit.mib_factor()).round() as u64
    }
}

impl fmt::Display for GpuMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

/// Resource profile the capability model is built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceProfile {
    /// Probe hardware and use everything available.
    #[default]
    Full,
    /// Fixed minimal footprint for constrained machines. No probing.
    Low,
}

impl PerformanceProfile {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Low => "low",
        }
    }

    /// Cap on the conversation log length, `None` when unbounded.
    #[must_use]
    pub const fn max_log_entries(&self) -> Option<usize> {
        match self {
            Self::Full => None,
            Self::Low => Some(LOW_PROFILE_MAX_LOG_ENTRIES),
        }
    }
}

impl fmt::Display for PerformanceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A GPU found by a vendor probe.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedGpu {
    pub gpu_type: GpuType,
    /// First memory figure found in the probe output.
    pub memory: Option<GpuMemory>,
    /// ROCm runtime version (AMD only).
    pub rocm_version: Option<String>,
    /// Card identification line (AMD only).
    pub device_id: Option<String>,
}

impl DetectedGpu {
    #[must_use]
    pub const fn amd() -> Self {
        Self {
            gpu_type: GpuType::Amd,
            memory: None,
            rocm_version: None,
            device_id: None,
        }
    }

    #[must_use]
    pub const fn nvidia() -> Self {
        Self {
            gpu_type: GpuType::Nvidia,
            memory: None,
            rocm_version: None,
            device_id: None,
        }
    }

    #[must_use]
    pub fn with_memory(mut self, memory: GpuMemory) -> Self {
        self.memory = Some(memory);
        self
    }
}

/// Raw facts gathered by a system probe, before any policy is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardwareFacts {
    /// Logical CPU count as reported by the platform.
    pub logical_cpus: usize,
    pub gpu: Option<DetectedGpu>,
    /// Version string reported by the model runtime binary.
    pub runtime_version: Option<String>,
}

/// Derived, read-only summary of the compute resources available for inference.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityModel {
    pub profile: PerformanceProfile,
    pub cpu_threads: usize,
    pub gpu_available: bool,
    pub gpu_type: GpuType,
    pub gpu_memory: Option<GpuMemory>,
    pub batch_size: u32,
    pub context_size: u32,
    pub rocm_version: Option<String>,
    pub gpu_id: Option<String>,
    pub runtime_version: String,
}

impl CapabilityModel {
    /// Apply the sizing policy to probed hardware facts (full profile).
    #[must_use]
    pub fn from_facts(facts: &HardwareFacts) -> Self {
        let gpu = facts
            .gpu
            .as_ref()
            .filter(|gpu| gpu.gpu_type != GpuType::None);
        let gpu_memory = gpu.and_then(|gpu| gpu.memory.clone());
        let batch_size = if gpu.is_some() {
            batch_size_for_memory(gpu_memory.as_ref())
        } else {
            CPU_BATCH_SIZE
        };

        Self {
            profile: PerformanceProfile::Full,
            cpu_threads: clamp_cpu_threads(facts.logical_cpus),
            gpu_available: gpu.is_some(),
            gpu_type: gpu.map_or(GpuType::None, |gpu| gpu.gpu_type),
            gpu_memory,
            batch_size,
            context_size: DEFAULT_CONTEXT_SIZE,
            rocm_version: gpu.and_then(|gpu| gpu.rocm_version.clone()),
            gpu_id: gpu.and_then(|gpu| gpu.device_id.clone()),
            runtime_version: facts
                .runtime_version
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    /// Fixed minimal capabilities for the low profile.
    #[must_use]
    pub fn low_memory() -> Self {
        Self {
            profile: PerformanceProfile::Low,
            cpu_threads: LOW_PROFILE_THREADS,
            gpu_available: false,
            gpu_type: GpuType::None,
            gpu_memory: None,
            batch_size: LOW_PROFILE_BATCH_SIZE,
            context_size: LOW_PROFILE_CONTEXT_SIZE,
            rocm_version: None,
            gpu_id: None,
            runtime_version: "unknown".to_string(),
        }
    }

    /// Whether slow replies should come with a smaller-model suggestion.
    #[must_use]
    pub const fn suggests_smaller_model(&self) -> bool {
        !self.gpu_available
    }

    /// Summary lines for the system information panel.
    #[must_use]
    pub fn system_info(&self) -> Vec<String> {
        let gpu_line = if self.gpu_available {
            let capacity = self
                .gpu_memory
                .as_ref()
                .map_or_else(|| "Unknown capacity".to_string(), ToString::to_string);
            format!("GPU: {} ({capacity})", self.gpu_type.label())
        } else {
            "GPU: None (CPU only) - Consider using a smaller model for faster responses"
                .to_string()
        };

        vec![
            gpu_line,
            format!("CPU Threads: {}", self.cpu_threads),
            format!("Context Size: {}", self.context_size),
            format!("Batch Size: {}", self.batch_size),
        ]
    }
}

/// Clamp a raw logical CPU count into `1..=MAX_CPU_THREADS`.
#[must_use]
pub fn clamp_cpu_threads(raw: usize) -> usize {
    raw.clamp(1, MAX_CPU_THREADS)
}

/// Step function from GPU memory to batch size.
#[must_use]
pub fn batch_size_for_memory(memory: Option<&GpuMemory>) -> u32 {
    let Some(memory) = memory else {
        return CPU_BATCH_SIZE;
    };
    let mib = memory.as_mib();
    BATCH_SIZE_TIERS
        .iter()
        .find(|(threshold, _)| mib >= *threshold)
        .map_or(CPU_BATCH_SIZE, |(_, batch)| *batch)
}
