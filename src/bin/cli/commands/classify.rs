//! The `classify` command.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde_json::json;

use crate::cli::args::{ClassifyArgs, ClassifyMode};
use crate::cli::commands::config::load_configuration;
use docoracle_rs::{CodeSnippet, ComplianceError, DeclaredMethod, RepairBudget};

/// Classify one diagnostic and print the verdict with its repair action as JSON.
pub async fn classify_command(args: ClassifyArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref()).await?;
    let diagnostic = read_diagnostic(&args.diagnostic).await?;
    let method = DeclaredMethod::builder("", &args.method, Vec::new())?.build();

    let report = match args.mode {
        ClassifyMode::Compilation => {
            let mut snippet = CodeSnippet::new(args.snippet.unwrap_or_default());
            let error = ComplianceError::classify_compilation(&diagnostic, &method, &mut snippet);
            let action = RepairBudget::new(config.run.max_repair_attempts).next_action(&error);
            json!({ "error": error, "action": action, "snippet": snippet })
        }
        ClassifyMode::Oracle => {
            let oracle = args.oracle.unwrap_or_default();
            let error = ComplianceError::classify_oracle(&diagnostic, &method, &oracle);
            let action = RepairBudget::new(config.run.max_repair_attempts).next_action(&error);
            json!({ "error": error, "action": action })
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn read_diagnostic(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read diagnostic from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read diagnostic file: {}", path.display()))
    }
}
