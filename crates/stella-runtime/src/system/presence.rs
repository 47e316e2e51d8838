//! User idle-time detection.
//!
//! `xprintidle` (X11, milliseconds) is tried first, then macOS `ioreg`
//! (`HIDIdleTime`, nanoseconds).

use stella_core::ports::{CommandRunner, ProbeError, ProbeResult};

const XPRINTIDLE: &str = "xprintidle";
const IOREG: &str = "ioreg";

/// Seconds since the last input event, 0 when neither tool answers.
pub async fn idle_seconds<R: CommandRunner + ?Sized>(runner: &R) -> u64 {
    match xprintidle(runner).await {
        Ok(secs) => secs,
        Err(e) => {
            tracing::debug!(error = %e, "xprintidle unavailable, trying ioreg");
            ioreg(runner).await.unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Idle time unknown");
                0
            })
        }
    }
}

async fn xprintidle<R: CommandRunner + ?Sized>(runner: &R) -> ProbeResult<u64> {
    let output = runner
        .run(XPRINTIDLE, &[])
        .await?
        .require_success(XPRINTIDLE)?;
    parse_xprintidle(&output.stdout).ok_or_else(|| ProbeError::Parse {
        command: XPRINTIDLE.to_string(),
        reason: format!("not a number: {:?}", output.stdout.trim()),
    })
}

async fn ioreg<R: CommandRunner + ?Sized>(runner: &R) -> ProbeResult<u64> {
    let output = runner
        .run(IOREG, &["-c", "IOHIDSystem"])
        .await?
        .require_success(IOREG)?;
    parse_hid_idle_time(&output.stdout).ok_or_else(|| ProbeError::Parse {
        command: IOREG.to_string(),
        reason: "no HIDIdleTime entry".to_string(),
    })
}

/// Milliseconds on stdout, converted to whole seconds.
pub fn parse_xprintidle(output: &str) -> Option<u64> {
    output.trim().parse::<u64>().ok().map(|ms| ms / 1000)
}

/// `"HIDIdleTime" = <ns>`, converted to whole seconds.
pub fn parse_hid_idle_time(output: &str) -> Option<u64> {
    output
        .lines()
        .find(|line| line.contains("HIDIdleTime"))
        .and_then(|line| line.rsplit('=').next())
        .and_then(|ns| ns.trim().parse::<u64>().ok())
        .map(|ns| ns / 1_000_000_000)
}
