//! Bounded repair planning for rejected oracles.

use serde::{Deserialize, Serialize};

use crate::compliance::classifier::ComplianceError;

/// What to try next for a rejected oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "detail", rename_all = "snake_case")]
pub enum RepairAction {
    /// Reorder the arguments of these methods
    SwapArguments(Vec<String>),
    /// Replace or drop candidates that reference these symbols
    ReplaceSymbols(Vec<String>),
    /// Wrap the oracle so that this exception type is handled
    DeclareException(String),
    /// Rewrite the comparison between incomparable operands
    SimplifyComparison,
    /// No automated repair; discard the candidate
    GiveUp,
}

impl RepairAction {
    /// Repair suggested by a classified diagnostic.
    pub fn from_error(error: &ComplianceError) -> Self {
        if !error.swappable_methods().is_empty() {
            Self::SwapArguments(error.swappable_methods().to_vec())
        } else if !error.missing_symbols().is_empty() {
            Self::ReplaceSymbols(error.missing_symbols().to_vec())
        } else if let Some(exception) = error.unreported_exception().filter(|e| !e.is_empty()) {
            Self::DeclareException(exception.to_string())
        } else if error.is_incompatible_types() {
            Self::SimplifyComparison
        } else {
            Self::GiveUp
        }
    }

    /// Whether this action ends the repair loop.
    pub fn is_give_up(&self) -> bool {
        matches!(self, Self::GiveUp)
    }
}

/// Caps the number of repair attempts for a single oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairBudget {
    max_attempts: usize,
    attempts: usize,
}

impl RepairBudget {
    /// Budget allowing `max_attempts` repairs.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            attempts: 0,
        }
    }

    /// Next action for `error`, consuming one attempt unless the answer is to give up.
    pub fn next_action(&mut self, error: &ComplianceError) -> RepairAction {
        if self.is_exhausted() {
            return RepairAction::GiveUp;
        }
        let action = RepairAction::from_error(error);
        if !action.is_give_up() {
            self.attempts += 1;
        }
        action
    }

    /// Attempts left.
    pub fn remaining(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Whether no attempts are left.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}
