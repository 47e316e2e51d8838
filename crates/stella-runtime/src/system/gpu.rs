//! GPU detection through vendor diagnostic tools.
//!
//! AMD is probed with `rocm-smi`/`rocminfo`, NVIDIA with `nvidia-smi`.
//! Parsers are plain functions over captured text so they can be tested
//! without the tools installed.

use std::path::Path;

use stella_core::ports::{CommandRunner, ProbeError, ProbeResult};
use stella_core::{DetectedGpu, GpuMemory, MemoryUnit};
use tracing::debug;

const ROCM_SMI: &str = "rocm-smi";
const ROCMINFO: &str = "rocminfo";
const NVIDIA_SMI: &str = "nvidia-smi";
const LDCONFIG: &str = "ldconfig";

/// Libraries the ROCm stack needs at runtime.
const ROCM_LIBRARIES: [&str; 2] = ["librocm", "libhip"];

/// Probe for an AMD GPU.
///
/// Success requires exit 0 and a `GPU` mention in stdout. Version, card id
/// and memory are best effort.
pub async fn probe_amd<R: CommandRunner + ?Sized>(runner: &R) -> ProbeResult<DetectedGpu> {
    let output = runner.run(ROCM_SMI, &[]).await?.require_success(ROCM_SMI)?;
    if !output.stdout.contains("GPU") {
        return Err(ProbeError::Parse {
            command: ROCM_SMI.to_string(),
            reason: "no GPU listed".to_string(),
        });
    }

    let mut gpu = DetectedGpu::amd();
    gpu.memory = parse_amd_memory(&output.stdout);
    gpu.device_id = parse_card_id(&output.stdout);
    gpu.rocm_version = match rocm_version(runner).await {
        Ok(version) => Some(version),
        Err(e) => {
            debug!(error = %e, "ROCm version unavailable");
            None
        }
    };
    Ok(gpu)
}

async fn rocm_version<R: CommandRunner + ?Sized>(runner: &R) -> ProbeResult<String> {
    let output = runner.run(ROCMINFO, &[]).await?;
    parse_rocm_version(&output.stdout).ok_or_else(|| ProbeError::Parse {
        command: ROCMINFO.to_string(),
        reason: "no ROCm Version line".to_string(),
    })
}

/// Probe for an NVIDIA GPU. Success is exit 0.
///
/// Memory comes from the `memory.total` query, falling back to the
/// default table output.
pub async fn probe_nvidia<R: CommandRunner + ?Sized>(runner: &R) -> ProbeResult<DetectedGpu> {
    let output = runner
        .run(NVIDIA_SMI, &[])
        .await?
        .require_success(NVIDIA_SMI)?;

    let mut gpu = DetectedGpu::nvidia();
    gpu.memory = match runner
        .run(
            NVIDIA_SMI,
            &["--query-gpu=memory.total", "--format=csv,noheader"],
        )
        .await
    {
        Ok(query) if query.success() => parse_nvidia_memory(&query.stdout),
        Ok(_) | Err(_) => None,
    }
    .or_else(|| parse_nvidia_memory(&output.stdout));
    Ok(gpu)
}

/// Known problems with the AMD GPU stack.
///
/// `runtime_config` is the model runtime's `config.json`; a file that is
/// missing or not a JSON object is skipped.
pub async fn amd_compatibility_issues<R: CommandRunner + ?Sized>(
    runner: &R,
    runtime_config: Option<&Path>,
) -> Vec<String> {
    let mut issues = Vec::new();

    match runner.run(ROCM_SMI, &["--version"]).await {
        Ok(output) if output.success() => {}
        Ok(_) => issues.push("ROCm not properly installed or detected".to_string()),
        Err(e) if e.is_absent() => {
            issues.push("ROCm tools not found. Please install ROCm".to_string());
        }
        Err(e) => {
            debug!(error = %e, "rocm-smi --version failed");
            issues.push("ROCm not properly installed or detected".to_string());
        }
    }

    if let Some(path) = runtime_config {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) if runtime_config_lacks_gpu(&raw) => {
                issues.push("Ollama config may not have GPU settings".to_string());
            }
            Ok(_) => {}
            Err(e) => debug!(path = %path.display(), error = %e, "Runtime config not readable"),
        }
    }

    if cfg!(target_os = "linux") {
        match runner.run(LDCONFIG, &["-p"]).await {
            Ok(output) => issues.extend(missing_libraries(&output.stdout)),
            Err(e) => debug!(error = %e, "ldconfig unavailable"),
        }
    }

    issues
}

/// Utilisation lines for the detected GPU.
pub async fn amd_usage<R: CommandRunner + ?Sized>(runner: &R) -> Vec<String> {
    match runner.run(ROCM_SMI, &["--showuse"]).await {
        Ok(output) if output.success() => {
            let lines = parse_amd_usage(&output.stdout);
            if lines.is_empty() {
                vec!["GPU usage data not available".to_string()]
            } else {
                lines
            }
        }
        _ => vec!["Failed to get AMD GPU usage".to_string()],
    }
}

pub async fn nvidia_usage<R: CommandRunner + ?Sized>(runner: &R) -> Vec<String> {
    let args = [
        "--query-gpu=utilization.gpu,utilization.memory,memory.used,memory.total",
        "--format=csv,noheader",
    ];
    match runner.run(NVIDIA_SMI, &args).await {
        Ok(output) if output.success() => {
            vec![format!("GPU Utilization: {}", output.stdout.trim())]
        }
        _ => vec!["Failed to get NVIDIA GPU usage".to_string()],
    }
}

/// Memory from `rocm-smi` output: lines mentioning `Memory` with a GB/MB figure.
pub fn parse_amd_memory(output: &str) -> Option<GpuMemory> {
    output
        .lines()
        .filter(|line| line.contains("Memory") && (line.contains("GB") || line.contains("MB")))
        .find_map(|line| memory_in_line(line, &[MemoryUnit::Gigabytes, MemoryUnit::Megabytes]))
}

/// Memory from `nvidia-smi` output: lines mentioning `MiB`.
pub fn parse_nvidia_memory(output: &str) -> Option<GpuMemory> {
    output
        .lines()
        .filter(|line| line.contains("MiB"))
        .find_map(|line| memory_in_line(line, &[MemoryUnit::Mebibytes]))
}

/// First positive amount in `line` carrying one of `units`.
///
/// The amount is either glued to the unit (`24GB`) or the token just
/// before a bare unit token (`24 GB`).
fn memory_in_line(line: &str, units: &[MemoryUnit]) -> Option<GpuMemory> {
    let tokens: Vec<&str> = line
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '.'))
        .collect();

    for (i, token) in tokens.iter().enumerate() {
        let Some(unit) = units
            .iter()
            .copied()
            .find(|unit| token.ends_with(unit.suffix()))
        else {
            continue;
        };

        let glued = &token[..token.len() - unit.suffix().len()];
        let amount = if glued.is_empty() {
            i.checked_sub(1)
                .and_then(|prev| tokens[prev].parse::<f64>().ok())
        } else {
            glued.parse::<f64>().ok()
        };

        if let Some(amount) = amount.filter(|a| *a > 0.0) {
            return Some(GpuMemory::new(amount, unit));
        }
    }
    None
}

/// Text after the colon on the first `ROCm Version` line.
pub fn parse_rocm_version(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("ROCm Version"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, version)| version.trim().to_string())
        .filter(|version| !version.is_empty())
}

/// First line mentioning both `GPU` and `Card`.
pub fn parse_card_id(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("GPU") && line.contains("Card"))
        .map(|line| line.trim().to_string())
}

/// The first `GPU ... %` line of `rocm-smi --showuse` and up to two following lines.
pub fn parse_amd_usage(output: &str) -> Vec<String> {
    let lines: Vec<&str> = output.lines().collect();
    lines
        .iter()
        .position(|line| line.contains("GPU") && line.contains('%'))
        .map(|start| {
            lines[start..]
                .iter()
                .take(3)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// True when `raw` is a JSON object none of whose keys mention `gpu`.
pub fn runtime_config_lacks_gpu(raw: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => {
            !map.keys().any(|key| key.to_lowercase().contains("gpu"))
        }
        _ => false,
    }
}

fn missing_libraries(ldconfig_output: &str) -> Vec<String> {
    ROCM_LIBRARIES
        .iter()
        .filter(|lib| !ldconfig_output.contains(*lib))
        .map(|lib| format!("Required library {lib} may be missing"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROCM_SMI_OUTPUT: &str = "\
========================= ROCm System Management Interface =========================
GPU[0]\t\t: Card series: \t\tRadeon RX 7900 XTX
GPU[0]\t\t: Memory: 24 GB
=================================== End of ROCm SMI Log ============================";

    const NVIDIA_TABLE: &str = "\
| N/A   34C    P8     9W /  70W |      0MiB / 15360MiB |      0%      Default |";

    #[test]
    fn test_amd_memory_spaced_unit() {
        let memory = parse_amd_memory(ROCM_SMI_OUTPUT).unwrap();
        assert_eq!(memory, GpuMemory::new(24.0, MemoryUnit::Gigabytes));
        assert_eq!(memory.to_string(), "24GB");
    }

    #[test]
    fn test_amd_memory_glued_unit() {
        let memory = parse_amd_memory("VRAM Total Memory (B): 16GB").unwrap();
        assert_eq!(memory, GpuMemory::new(16.0, MemoryUnit::Gigabytes));

        let memory = parse_amd_memory("Memory usage 8192MB").unwrap();
        assert_eq!(memory.unit, MemoryUnit::Megabytes);
        assert_eq!(memory.as_mib(), 8192);
    }

    #[test]
    fn test_amd_memory_unparseable_is_none() {
        assert!(parse_amd_memory("Memory: lots of GB").is_none());
        assert!(parse_amd_memory("no figures here").is_none());
    }

    #[test]
    fn test_nvidia_memory_skips_zero_usage() {
        let memory = parse_nvidia_memory(NVIDIA_TABLE).unwrap();
        assert_eq!(memory, GpuMemory::new(15360.0, MemoryUnit::Mebibytes));
    }

    #[test]
    fn test_nvidia_memory_from_query() {
        let memory = parse_nvidia_memory("24576 MiB\n").unwrap();
        assert_eq!(memory.as_mib(), 24576);
    }

    #[test]
    fn test_rocm_version_and_card() {
        let info = "Runtime Version:  1.1\nROCm Version: 6.0.2\nROCm Version: 5.0\n";
        assert_eq!(parse_rocm_version(info).as_deref(), Some("6.0.2"));
        assert_eq!(parse_rocm_version("nothing"), None);

        assert_eq!(
            parse_card_id(ROCM_SMI_OUTPUT).as_deref(),
            Some("GPU[0]\t\t: Card series: \t\tRadeon RX 7900 XTX")
        );
    }

    #[test]
    fn test_amd_usage_window() {
        let out = "header\nGPU[0] : GPU use (%): 12\nGPU[0] : Memory use (%): 40\nfooter\nmore";
        assert_eq!(
            parse_amd_usage(out),
            vec![
                "GPU[0] : GPU use (%): 12",
                "GPU[0] : Memory use (%): 40",
                "footer"
            ]
        );
        assert!(parse_amd_usage("no data").is_empty());
    }

    #[test]
    fn test_runtime_config_gpu_keys() {
        assert!(runtime_config_lacks_gpu(r#"{"models_dir": "/srv/models"}"#));
        assert!(runtime_config_lacks_gpu("{}"));
        assert!(!runtime_config_lacks_gpu(r#"{"GPU_Layers": -1}"#));
        assert!(!runtime_config_lacks_gpu("[1, 2]"));
        assert!(!runtime_config_lacks_gpu("not json"));
    }

    #[test]
    fn test_missing_libraries() {
        assert_eq!(
            missing_libraries("libhip.so.6 (libc6,x86-64) => /opt/rocm/lib/libhip.so.6"),
            vec!["Required library librocm may be missing"]
        );
        assert!(missing_libraries("librocm.so libhip.so").is_empty());
    }
}
