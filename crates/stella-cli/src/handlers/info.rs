//! Info command handler.
//!
//! Prints the capability model plus the GPU diagnostics that the chat
//! session does not show.

use anyhow::Result;

use stella_core::ports::SystemProbePort;
use stella_core::{GpuType, PerformanceProfile};

use crate::bootstrap::CliContext;
use crate::presentation::{print_list, print_system_info, print_warning};

pub async fn execute(ctx: &CliContext, profile: PerformanceProfile) -> Result<()> {
    let capabilities = ctx.probe.detect(profile).await;

    print_system_info(&capabilities.system_info());
    println!("Profile: {}", capabilities.profile);
    println!(
        "ROCm Version: {}",
        capabilities.rocm_version.as_deref().unwrap_or("not detected")
    );
    println!("Runtime Version: {}", capabilities.runtime_version);
    if let Some(id) = &capabilities.gpu_id {
        println!("GPU Device: {id}");
    }
    println!();

    if capabilities.gpu_type == GpuType::Amd {
        let issues = ctx.probe.compatibility_issues(GpuType::Amd).await;
        if issues.is_empty() {
            println!("No GPU compatibility issues found.");
        } else {
            print_warning("GPU compatibility issues:");
            for issue in &issues {
                print_warning(&format!("  • {issue}"));
            }
        }
    }

    let usage = ctx.probe.gpu_usage(capabilities.gpu_type).await;
    print_list("GPU Usage:", &usage);
    Ok(())
}
