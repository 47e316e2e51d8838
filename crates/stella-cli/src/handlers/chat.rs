//! Chat command handler: the interactive session loop.
//!
//! Startup detects hardware, applies the runtime configuration and greets
//! the user. Each line is either an in-loop command or a message for the
//! [`Companion`]. Errors from a single turn are printed and the loop goes on.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, Timelike};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use stella_core::ports::{MemoryStore, SystemProbePort};
use stella_core::services::{Companion, CompanionConfig, MemoryService, ModelSelector, TurnOutcome};
use stella_core::{CapabilityModel, OptionsBuilder, PerformanceProfile, greeting_for_hour, idle_status};
use stella_runtime::{RuntimeConfigurator, apply_to_process};

use super::models::fast_installed_models;
use crate::bootstrap::CliContext;
use crate::presentation::{
    BANNER, Thinking, face, print_divider, print_error, print_goodbye, print_info, print_list,
    print_response, print_slowly, print_speed_tips, print_system_info, print_warning,
};

const PROMPT: &str = "You: ";

/// Arguments for the chat command.
#[derive(Debug, Clone, Default)]
pub struct ChatArgs {
    pub profile: PerformanceProfile,
    /// Replaces the configured candidate list when non-empty.
    pub models: Vec<String>,
}

/// What one line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopCommand<'a> {
    Exit,
    SystemInfo,
    CurrentModel,
    Models,
    Message(&'a str),
}

impl<'a> LoopCommand<'a> {
    /// Classify a trimmed, non-empty line. Commands are case-insensitive.
    pub fn parse(line: &'a str) -> Self {
        match line.to_lowercase().as_str() {
            "exit" => Self::Exit,
            "system info" => Self::SystemInfo,
            "current model" | "which model" => Self::CurrentModel,
            "models" => Self::Models,
            _ => Self::Message(line),
        }
    }
}

/// Execute the chat command.
pub async fn execute(ctx: &CliContext, args: ChatArgs) -> Result<()> {
    let capabilities = ctx.probe.detect(args.profile).await;

    let effects = RuntimeConfigurator::new(&ctx.paths.runtime_config_path).apply(&capabilities);
    apply_to_process(&effects);

    let mut companion = build_companion(ctx, &args, capabilities.clone()).await;

    greet(&capabilities).await;

    let mut editor = DefaultEditor::new()?;
    let mut turn = 0usize;
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                print_goodbye("See you soon, okay? 🌼").await;
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        match LoopCommand::parse(input) {
            LoopCommand::Exit => {
                print_goodbye("Take care! See you next time! 🌟").await;
                break;
            }
            LoopCommand::SystemInfo => print_system_info(&companion.capabilities().system_info()),
            LoopCommand::CurrentModel => print_info(&format!(
                "Currently using model: {}",
                companion.confirmed_model().unwrap_or("Unknown")
            )),
            LoopCommand::Models => match fast_installed_models(ctx).await {
                Ok(models) if !models.is_empty() => print_list("Available models:", &models),
                Ok(_) | Err(_) => print_warning("Could not retrieve model list"),
            },
            LoopCommand::Message(text) => {
                let status = idle_status(ctx.probe.idle_seconds().await);
                let thinking = Thinking::start();
                let outcome = companion.respond(text, status).await;
                thinking.finish();

                match outcome {
                    Ok(TurnOutcome::Reply {
                        text,
                        model,
                        newly_confirmed,
                    }) => {
                        if newly_confirmed {
                            print_info(&format!("\n✅ Using model: {model}"));
                        }
                        print_response(face(turn), &text).await;
                        turn += 1;
                    }
                    Ok(TurnOutcome::Unavailable { message }) => {
                        print_response(face(turn), &message).await;
                    }
                    Err(e) => print_error(&e.to_string()),
                }
            }
        }
    }

    Ok(())
}

async fn build_companion(
    ctx: &CliContext,
    args: &ChatArgs,
    capabilities: CapabilityModel,
) -> Companion {
    let settings = &ctx.current;
    let store: Arc<dyn MemoryStore> = ctx.memory_store.clone();
    let memory = MemoryService::load(store, args.profile.max_log_entries()).await;

    let selector = ModelSelector::new(ctx.chat_port()).with_slow_response_hint(
        capabilities.suggests_smaller_model(),
        Duration::from_secs(settings.effective_slow_response_secs()),
    );
    let options = OptionsBuilder::new().with_sampling(&settings.effective_sampling());
    let config = CompanionConfig::from_settings(settings, &args.models);
    debug!(candidates = ?config.candidates, "Chat session configured");

    Companion::new(config, capabilities, options, selector, memory)
}

async fn greet(capabilities: &CapabilityModel) {
    println!("{}", console::style(BANNER).cyan().bold());
    println!("{}", console::style(face(0)).cyan());

    print_system_info(&capabilities.system_info());
    if !capabilities.gpu_available {
        print_speed_tips();
    }

    let greeting = greeting_for_hour(Local::now().hour());
    print_slowly(&format!(
        "\nStella: {greeting}! I'm Stella, your terminal companion. 🌸"
    ))
    .await;
    let mode = match capabilities.profile {
        PerformanceProfile::Full => "       I'm running in FULL POWER mode with enhanced capabilities.",
        PerformanceProfile::Low => "       I'm running in LOW MEMORY mode to keep things light.",
    };
    print_slowly(mode).await;
    print_slowly("       Type something to talk to me or 'exit' to quit.\n").await;
    print_divider();
}
