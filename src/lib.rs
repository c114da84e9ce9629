//! # DocOracle-RS: Documentation-to-Oracle Matching Engine
//!
//! Translates free-text API documentation into executable conditions by
//! matching comment words against candidate code elements, and classifies
//! the compiler diagnostics of rejected oracles so they can be repaired.
//!
//! - **Semantic Matching**: lemmatized comment and identifier tokens compared
//!   by word mover's distance over pretrained word vectors
//! - **Eligibility Rules**: receiver binding, passive voice and getter/setter
//!   complementarity
//! - **Compliance Classification**: missing symbols, reorderable arguments,
//!   incomparable types and unreported exceptions
//! - **Match Auditing**: per-class CSV records of every ranked match
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    API Layer (OracleEngine)                  │
//! ├──────────────────────────────────────────────────────────────┤
//! │   Semantic       │   Compliance      │   Audit    │  Core    │
//! │ • Normalizer     │ • Classifier      │ • Records  │ • Config │
//! │ • Lemmatizer     │ • Generic types   │ • CSV      │ • Errors │
//! │ • WMD distance   │ • Repair budget   │            │ • Model  │
//! │ • Matcher        │                   │            │          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docoracle_rs::{DocOracleConfig, MatchJob, OracleEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = OracleEngine::new(DocOracleConfig::default())?;
//!     let session = engine.session();
//!     let jobs: Vec<MatchJob> = serde_json::from_str(&std::fs::read_to_string("jobs.json")?)?;
//!
//!     for outcome in engine.run_batch(&session, &jobs)? {
//!         println!("{} -> {:?}", outcome.comment, outcome.best);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Memory allocator selection (mutually exclusive)
#[cfg(all(feature = "mimalloc", not(feature = "jemalloc")))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(all(feature = "jemalloc", not(feature = "mimalloc")))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

// Core data model, configuration and errors
pub mod core {
    //! Configuration, errors and the documented-method model.

    pub mod config;
    pub mod errors;
    pub mod model;
}

// Comment-to-candidate matching
pub mod semantic;

// Diagnostic classification for rejected oracles
pub mod compliance;

// Match audit log
pub mod audit;

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
    pub mod results;
}

// Re-export primary types for convenience
pub use api::engine::{MatchSession, OracleEngine};
pub use api::results::{MatchJob, MatchOutcome, RankedEntry};
pub use compliance::{ComplianceError, RepairAction, RepairBudget};
pub use crate::core::config::DocOracleConfig;
pub use crate::core::errors::{DocOracleError, Result, ResultExt};
pub use crate::core::model::{CodeSnippet, DeclaredMethod, Parameter, Proposition, ThrowsTag};
pub use semantic::{Candidate, SemanticMatcher, StopwordSet};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
