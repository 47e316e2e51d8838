//! Inference option types.
//!
//! [`SamplingConfig`] carries the four sampling parameters with optional
//! overrides from settings. [`OptionsBuilder`] turns a [`CapabilityModel`]
//! into the [`InferenceOptions`] sent along with every chat request.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::capabilities::{CapabilityModel, GpuType};

/// Value of `num_gpu` meaning "offload every layer".
pub const GPU_LAYERS_ALL: i32 = -1;

/// Sampling parameters for a chat request.
///
/// All fields are optional so that settings can override a subset and
/// fall back to [`SamplingConfig::with_hardcoded_defaults`] for the rest.
///
/// ```rust
/// use stella_core::SamplingConfig;
///
/// let mut overrides = SamplingConfig {
///     temperature: Some(0.3),
///     ..Default::default()
/// };
/// overrides.merge_with(&SamplingConfig::with_hardcoded_defaults());
/// assert_eq!(overrides.temperature, Some(0.3));
/// assert_eq!(overrides.top_k, Some(40));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SamplingConfig {
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold (0.0 - 1.0).
    pub top_p: Option<f32>,

    /// Top-K sampling limit.
    pub top_k: Option<i32>,

    /// Repetition penalty, typically 1.0 - 1.3.
    pub repeat_penalty: Option<f32>,
}

impl SamplingConfig {
    /// Fill every unset field from `other`.
    pub fn merge_with(&mut self, other: &Self) {
        if self.temperature.is_none() {
            self.temperature = other.temperature;
        }
        if self.top_p.is_none() {
            self.top_p = other.top_p;
        }
        if self.top_k.is_none() {
            self.top_k = other.top_k;
        }
        if self.repeat_penalty.is_none() {
            self.repeat_penalty = other.repeat_penalty;
        }
    }

    /// The fixed sampling defaults.
    #[must_use]
    pub const fn with_hardcoded_defaults() -> Self {
        Self {
            temperature: Some(0.7),
            top_p: Some(0.9),
            top_k: Some(40),
            repeat_penalty: Some(1.1),
        }
    }
}

/// The option set attached to one chat request.
///
/// Field names follow the runtime's option keys. GPU-only keys are omitted
/// from the serialized form when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceOptions {
    pub num_thread: usize,
    pub num_ctx: u32,
    pub num_batch: u32,
    pub seed: i64,
    pub repeat_penalty: f32,
    pub temperature: f32,
    pub top_k: i32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_gpu: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f16_kv: Option<bool>,
}

impl InferenceOptions {
    /// Names of the keys present in this option set, in wire order.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = vec![
            "num_thread",
            "num_ctx",
            "num_batch",
            "seed",
            "repeat_penalty",
            "temperature",
            "top_k",
            "top_p",
        ];
        if self.num_gpu.is_some() {
            keys.push("num_gpu");
        }
        if self.f16_kv.is_some() {
            keys.push("f16_kv");
        }
        keys
    }
}

/// Builds per-request [`InferenceOptions`] from a capability model.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    sampling: SamplingConfig,
    seed: Option<i64>,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sampling: SamplingConfig::with_hardcoded_defaults(),
            seed: None,
        }
    }

    /// Override sampling values; unset fields keep their defaults.
    #[must_use]
    pub fn with_sampling(mut self, overrides: &SamplingConfig) -> Self {
        let mut sampling = overrides.clone();
        sampling.merge_with(&SamplingConfig::with_hardcoded_defaults());
        self.sampling = sampling;
        self
    }

    /// Pin the seed instead of deriving it from the clock.
    #[must_use]
    pub const fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a fresh option set for one request.
    #[must_use]
    pub fn build(&self, model: &CapabilityModel) -> InferenceOptions {
        let defaults = SamplingConfig::with_hardcoded_defaults();
        let pick = |value: Option<f32>, fallback: Option<f32>| {
            value.or(fallback).unwrap_or_default()
        };

        let (num_gpu, f16_kv) = if model.gpu_available {
            let f16 = (model.gpu_type == GpuType::Amd).then_some(true);
            (Some(GPU_LAYERS_ALL), f16)
        } else {
            (None, None)
        };

        InferenceOptions {
            num_thread: model.cpu_threads,
            num_ctx: model.context_size,
            num_batch: model.batch_size,
            seed: self.seed.unwrap_or_else(|| Utc::now().timestamp()),
            repeat_penalty: pick(self.sampling.repeat_penalty, defaults.repeat_penalty),
            temperature: pick(self.sampling.temperature, defaults.temperature),
            top_k: self.sampling.top_k.or(defaults.top_k).unwrap_or_default(),
            top_p: pick(self.sampling.top_p, defaults.top_p),
            num_gpu,
            f16_kv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capabilities::{DetectedGpu, GpuMemory, HardwareFacts, MemoryUnit};

    const FIXED_KEYS: [&str; 8] = [
        "num_thread",
        "num_ctx",
        "num_batch",
        "seed",
        "repeat_penalty",
        "temperature",
        "top_k",
        "top_p",
    ];

    fn caps_with(gpu: Option<DetectedGpu>) -> CapabilityModel {
        CapabilityModel::from_facts(&HardwareFacts {
            logical_cpus: 8,
            gpu,
            runtime_version: None,
        })
    }

    fn serialized_keys(options: &InferenceOptions) -> Vec<String> {
        let value = serde_json::to_value(options).unwrap();
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_cpu_only_options_omit_gpu_keys() {
        let options = OptionsBuilder::new().with_seed(7).build(&caps_with(None));

        assert_eq!(options.keys(), FIXED_KEYS.to_vec());
        let mut wire = serialized_keys(&options);
        wire.sort();
        let mut expected: Vec<String> = FIXED_KEYS.iter().map(ToString::to_string).collect();
        expected.sort();
        assert_eq!(wire, expected);
        assert_eq!(options.num_batch, 128);
        assert_eq!(options.seed, 7);
    }

    #[test]
    fn test_nvidia_options_offload_layers_without_f16() {
        let options = OptionsBuilder::new().build(&caps_with(Some(DetectedGpu::nvidia())));
        assert_eq!(options.num_gpu, Some(GPU_LAYERS_ALL));
        assert_eq!(options.f16_kv, None);
        assert!(options.keys().contains(&"num_gpu"));
        assert!(!options.keys().contains(&"f16_kv"));
    }

    #[test]
    fn test_amd_options_include_half_precision() {
        let gpu = DetectedGpu::amd().with_memory(GpuMemory::new(24.0, MemoryUnit::Gigabytes));
        let options = OptionsBuilder::new().build(&caps_with(Some(gpu)));
        assert_eq!(options.num_gpu, Some(GPU_LAYERS_ALL));
        assert_eq!(options.f16_kv, Some(true));
        assert_eq!(options.num_batch, 512);
        assert_eq!(serialized_keys(&options).len(), FIXED_KEYS.len() + 2);
    }

    #[test]
    fn test_sampling_defaults_are_fixed() {
        let options = OptionsBuilder::new().build(&caps_with(None));
        assert!((options.temperature - 0.7).abs() < f32::EPSILON);
        assert!((options.top_p - 0.9).abs() < f32::EPSILON);
        assert_eq!(options.top_k, 40);
        assert!((options.repeat_penalty - 1.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sampling_overrides_keep_key_set() {
        let overrides = SamplingConfig {
            temperature: Some(0.2),
            top_k: Some(20),
            ..Default::default()
        };
        let options = OptionsBuilder::new()
            .with_sampling(&overrides)
            .build(&caps_with(None));
        assert!((options.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(options.top_k, 20);
        assert!((options.top_p - 0.9).abs() < f32::EPSILON);
        assert_eq!(options.keys(), FIXED_KEYS.to_vec());
    }

    #[test]
    fn test_seed_defaults_to_clock() {
        let before = Utc::now().timestamp();
        let options = OptionsBuilder::new().build(&caps_with(None));
        assert!(options.seed >= before);
    }

    #[test]
    fn test_merge_with_prefers_self() {
        let mut request = SamplingConfig {
            temperature: Some(0.8),
            ..Default::default()
        };
        request.merge_with(&SamplingConfig::with_hardcoded_defaults());
        assert_eq!(request.temperature, Some(0.8));
        assert_eq!(request.top_p, Some(0.9));
        assert_eq!(request.repeat_penalty, Some(1.1));
    }
}
