//! Configuration management commands.
//!
//! Loading, initialization, validation, and printing defaults.

use std::path::Path;

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::cli::args::{InitConfigArgs, ValidateConfigArgs};
use docoracle_rs::core::config::EmbeddingBackend;
use docoracle_rs::DocOracleConfig;

/// Load configuration from `path`, or defaults when no path is given.
pub async fn load_configuration(path: Option<&Path>) -> anyhow::Result<DocOracleConfig> {
    let config = match path {
        Some(path) => DocOracleConfig::from_yaml_file(path)?,
        None => DocOracleConfig::default(),
    };
    Ok(config)
}

/// Print default configuration in YAML format
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("# Default docoracle configuration");
    println!("# Save this to a file and customize as needed");
    println!("# Usage: docoracle match --jobs jobs.json --config your-config.yml");
    println!();

    let config = DocOracleConfig::default();
    let yaml_output = serde_yaml::to_string(&config)?;
    println!("{}", yaml_output);

    Ok(())
}

/// Initialize a configuration file with defaults
pub async fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Configuration file already exists: {}. Use --force to overwrite or choose a different name with --output",
            args.output.display()
        ));
    }

    let config = DocOracleConfig::default();
    let yaml_content = serde_yaml::to_string(&config)?;
    tokio::fs::write(&args.output, yaml_content).await?;

    println!(
        "{} {}",
        "✅ Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    println!();
    println!("{}", "🔧 Key settings you can customize:".bright_blue().bold());

    /// Row type for the configuration tips table.
    #[derive(Tabled)]
    struct CustomizationRow {
        setting: String,
        description: String,
    }

    let customization_rows = vec![
        CustomizationRow {
            setting: "matcher.distance_threshold".to_string(),
            description: "Maximum distance for short comments (default: 3.6)".to_string(),
        },
        CustomizationRow {
            setting: "matcher.long_comment_threshold".to_string(),
            description: "Maximum distance for comments of 9+ tokens (default: 6.0)".to_string(),
        },
        CustomizationRow {
            setting: "embedding.backend".to_string(),
            description: "vector_table (default) or fast_embed (thresholds below 2.0)".to_string(),
        },
        CustomizationRow {
            setting: "audit.enabled".to_string(),
            description: "Write per-class audit CSVs (default: false)".to_string(),
        },
        CustomizationRow {
            setting: "run.timeout_seconds".to_string(),
            description: "Wall-clock budget for a batch (default: 600)".to_string(),
        },
    ];

    let mut table = Table::new(customization_rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    Ok(())
}

/// Validate a DocOracle configuration file
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "🔍 Validating configuration:".bright_blue().bold(),
        args.config.display().to_string().cyan()
    );
    println!();

    let config = match load_configuration(Some(&args.config)).await {
        Ok(config) => {
            println!("{}", "✅ Configuration file is valid!".bright_green().bold());
            println!();
            config
        }
        Err(e) => {
            eprintln!("{} {}", "❌ Configuration validation failed:".red(), e);
            println!();
            println!("{}", "🔧 Common issues:".bright_blue().bold());
            println!("   • Check YAML syntax (indentation, colons, quotes)");
            println!("   • Thresholds must be finite and non-negative");
            println!("   • The vector_table backend needs embedding.vectors_path");
            println!();
            println!(
                "{}",
                "💡 Tip: Use 'docoracle print-default-config' to see valid format".dimmed()
            );
            return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
        }
    };

    if args.details {
        /// Row used when printing configuration details.
        #[derive(Tabled)]
        struct DetailRow {
            setting: String,
            value: String,
        }

        let backend = match config.embedding.backend {
            EmbeddingBackend::VectorTable => format!(
                "vector table ({})",
                config
                    .embedding
                    .vectors_path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
            EmbeddingBackend::FastEmbed => {
                format!("fastembed ({})", config.embedding.model.display_name())
            }
        };

        let detail_rows = vec![
            DetailRow {
                setting: "Distance threshold".to_string(),
                value: config.matcher.distance_threshold.to_string(),
            },
            DetailRow {
                setting: "Long comment threshold".to_string(),
                value: format!(
                    "{} (from {} tokens)",
                    config.matcher.long_comment_threshold, config.matcher.long_comment_min_tokens
                ),
            },
            DetailRow {
                setting: "Base stopwords".to_string(),
                value: config.matcher.base_stopwords.len().to_string(),
            },
            DetailRow {
                setting: "Embedding backend".to_string(),
                value: backend,
            },
            DetailRow {
                setting: "Audit output".to_string(),
                value: if config.audit.enabled {
                    config.audit.output_dir.display().to_string()
                } else {
                    "disabled".to_string()
                },
            },
            DetailRow {
                setting: "Repair attempts".to_string(),
                value: config.run.max_repair_attempts.to_string(),
            },
        ];

        let mut table = Table::new(detail_rows);
        table.with(TableStyle::rounded());
        println!("{}", table);
    }

    Ok(())
}
