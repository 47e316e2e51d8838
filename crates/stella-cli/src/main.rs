//! CLI entry point - the composition root.
//!
//! Parses arguments, installs logging, loads `.env` files, bootstraps the
//! `CliContext` and dispatches to a handler.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stella_cli::{Cli, CliConfig, Commands, bootstrap, exit_code_for, handlers};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `.env` in the working directory wins over the one in the data root.
fn load_env_files() {
    dotenvy::dotenv().ok();
    if let Ok(path) = stella_core::paths::env_file_path() {
        dotenvy::from_path(path).ok();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = bootstrap(CliConfig::from_env(cli.data_dir.clone())).await?;
    let command = cli.command_or_default();

    match command {
        Commands::Chat { profile, model } => {
            let args = handlers::chat::ChatArgs {
                profile: profile.into(),
                models: model,
            };
            handlers::chat::execute(&ctx, args).await
        }
        Commands::Info { profile } => handlers::info::execute(&ctx, profile.into()).await,
        Commands::Models => handlers::models::execute(&ctx).await,
        Commands::Config { command } => handlers::config::execute(&ctx, command).await,
        Commands::Paths => handlers::paths::execute(&ctx),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    load_env_files();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", console::style(format!("Error: {e:#}")).red());
            let code = exit_code_for(&e);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
