//! The `match` command.

use std::sync::Arc;

use anyhow::Context;
use owo_colors::OwoColorize;
use tracing::info;

use crate::cli::args::{MatchArgs, OutputFormat};
use crate::cli::commands::config::load_configuration;
use crate::cli::output::{print_outcomes_json, print_outcomes_table};
use docoracle_rs::{MatchJob, OracleEngine};

/// Run a batch of match jobs and print the outcomes.
pub async fn match_command(args: MatchArgs) -> anyhow::Result<()> {
    let mut config = load_configuration(args.config.as_deref()).await?;
    if let Some(dir) = args.audit_dir {
        config.audit.enabled = true;
        config.audit.output_dir = dir;
    }

    let content = tokio::fs::read_to_string(&args.jobs)
        .await
        .with_context(|| format!("Failed to read jobs file: {}", args.jobs.display()))?;
    let jobs: Vec<MatchJob> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid jobs file: {}", args.jobs.display()))?;
    info!("Loaded {} match jobs from {}", jobs.len(), args.jobs.display());

    let audit_dir = config.audit.output_dir.clone();
    let engine = Arc::new(OracleEngine::new(config)?);
    let session = Arc::new(engine.session());

    let outcomes = Arc::clone(&engine)
        .run_batch_with_timeout(Arc::clone(&session), Arc::new(jobs))
        .await?;

    match args.format {
        OutputFormat::Json => print_outcomes_json(&outcomes)?,
        OutputFormat::Table => print_outcomes_table(&outcomes),
    }

    if session.audit_enabled() {
        let written = session.audit().flush(&audit_dir)?;
        session.audit().clear();
        for path in written {
            eprintln!("{} {}", "📝 Audit log:".bright_blue(), path.display());
        }
    }

    Ok(())
}
