//! Config command handler.

use anyhow::Result;

use stella_core::{Settings, parse_setting};

use crate::bootstrap::CliContext;
use crate::config_commands::ConfigCommand;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let settings = ctx.settings.get().await.map_err(CliError::from)?;
            println!("Current settings ({}):", ctx.paths.settings_path.display());
            for line in settings_lines(&settings) {
                println!("  {line}");
            }
        }
        ConfigCommand::Set { key, value } => {
            let current = ctx.settings.get().await.map_err(CliError::from)?;
            let update = parse_setting(&current, &key, &value).map_err(CliError::from)?;
            ctx.settings.update(update).await.map_err(CliError::from)?;
            println!("✓ {key} set to {value}");
        }
        ConfigCommand::Reset => {
            ctx.settings.reset().await.map_err(CliError::from)?;
            println!("✓ Settings restored to defaults.");
        }
    }
    Ok(())
}

/// `key: value` lines with effective values.
pub fn settings_lines(settings: &Settings) -> Vec<String> {
    let sampling = settings.effective_sampling();
    let show = |value: Option<String>| value.unwrap_or_else(|| "default".to_string());
    vec![
        format!("ollama_host:        {}", settings.effective_ollama_host()),
        format!("chat_timeout_secs:  {}", settings.effective_chat_timeout_secs()),
        format!(
            "candidate_models:   {}",
            settings.effective_candidate_models().join(", ")
        ),
        format!("history_window:     {}", settings.effective_history_window()),
        format!("journal_interval:   {}", settings.effective_journal_interval()),
        format!("slow_response_secs: {}", settings.effective_slow_response_secs()),
        format!("temperature:        {}", show(sampling.temperature.map(|v| v.to_string()))),
        format!("top_p:              {}", show(sampling.top_p.map(|v| v.to_string()))),
        format!("top_k:              {}", show(sampling.top_k.map(|v| v.to_string()))),
        format!(
            "repeat_penalty:     {}",
            show(sampling.repeat_penalty.map(|v| v.to_string()))
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_lines_show_effective_values() {
        let lines = settings_lines(&Settings::with_defaults());
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "ollama_host:        http://127.0.0.1:11434");
        assert_eq!(lines[1], "chat_timeout_secs:  120");
        assert_eq!(lines[6], "temperature:        0.7");
        assert_eq!(lines[8], "top_k:              40");
    }
}
