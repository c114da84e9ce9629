//! Compiler-diagnostic classification and repair planning for rejected oracles.

pub mod classifier;
pub mod repair;
pub mod types;

pub use classifier::ComplianceError;
pub use repair::{RepairAction, RepairBudget};
pub use types::{is_generic_type, GENERIC_PLACEHOLDER};
