//! Command implementations for the docoracle CLI.

pub mod classify;
pub mod config;
pub mod matching;

pub use classify::classify_command;
pub use config::{init_config, load_configuration, print_default_config, validate_config};
pub use matching::match_command;
