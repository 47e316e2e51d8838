//! Models command handler.

use anyhow::Result;

use stella_core::ports::ChatPort;
use stella_runtime::fast_models;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_list, print_warning};

/// Installed models small enough to answer quickly, or an error when the
/// runtime cannot be reached.
pub async fn fast_installed_models(ctx: &CliContext) -> Result<Vec<String>, CliError> {
    let installed = ctx.chat.list_models().await?;
    Ok(fast_models(&installed))
}

/// List installed fast models.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let models = fast_installed_models(ctx).await?;
    if models.is_empty() {
        print_warning("No fast models installed. Try: ollama pull llama3.2:3b");
    } else {
        print_list("Available models:", &models);
    }
    Ok(())
}
