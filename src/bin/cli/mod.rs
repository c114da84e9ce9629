//! CLI Module Organization
//!
//! - args: CLI argument structures
//! - commands: command execution (matching, classification, configuration)
//! - output: console and JSON rendering of results

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used items for convenience
pub use args::*;
pub use commands::*;
