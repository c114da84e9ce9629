//! CLI Argument Structures
//!
//! All command definitions and value enums used by the docoracle binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Documentation-to-oracle matching and diagnostic triage
#[derive(Parser)]
#[command(name = "docoracle")]
#[command(version = VERSION)]
#[command(about = "DocOracle - match API documentation to executable oracles")]
#[command(long_about = "
Rank candidate code elements against documentation comments and classify the
compiler diagnostics of rejected oracles.

Common Usage:

  # Match a batch of jobs and print a table
  docoracle match --jobs jobs.json

  # Use a pretrained vector table and record audit CSVs
  docoracle match --jobs jobs.json --config docoracle.yml --audit-dir stats/candidates

  # Classify a compiler diagnostic read from stdin
  javac Oracle.java 2>&1 | docoracle classify --diagnostic - --method org.example.Stack.push

  # Write a configuration file to customize
  docoracle init-config
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank candidates for a batch of match jobs
    Match(MatchArgs),

    /// Classify a compiler diagnostic for a rejected oracle
    Classify(ClassifyArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a DocOracle configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

#[derive(Args)]
pub struct MatchArgs {
    /// JSON file holding an array of match jobs
    #[arg(short, long)]
    pub jobs: PathBuf,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Enable the audit log and write it to this directory
    #[arg(long)]
    pub audit_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// File holding the diagnostic text ("-" reads stdin)
    #[arg(short, long)]
    pub diagnostic: PathBuf,

    /// Which compilation produced the diagnostic
    #[arg(long, value_enum, default_value = "compilation")]
    pub mode: ClassifyMode,

    /// Qualified name of the documented method
    #[arg(short, long)]
    pub method: String,

    /// Code snippet that was compiled (compilation mode)
    #[arg(long)]
    pub snippet: Option<String>,

    /// Oracle text that was inserted (oracle mode)
    #[arg(long)]
    pub oracle: Option<String>,

    /// Configuration file (for the repair budget)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = ".docoracle.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    #[arg(short, long, required = true)]
    pub config: PathBuf,

    /// Show detailed configuration breakdown
    #[arg(long)]
    pub details: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Console table
    Table,
    /// JSON array of outcomes
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ClassifyMode {
    /// First compilation of a candidate oracle
    Compilation,
    /// Compilation after inserting the oracle into generated code
    Oracle,
}
