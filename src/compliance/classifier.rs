//! Classification of compiler diagnostics for rejected oracles.
//!
//! The patterns below follow javac's message phrasing. Any change in that
//! phrasing silently turns diagnostics into unclassified errors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compliance::types::normalize_type_token;
use crate::core::model::{CodeSnippet, DeclaredMethod};

const MISSING_SYMBOL_MARKER: &str = "cannot find symbol";
const CANNOT_APPLY_MARKER: &str = "cannot be applied to given types;";
const INCOMPARABLE_TYPES_MARKER: &str = "incomparable types";
const UNREPORTED_EXCEPTION_MARKER: &str = "unreported exception";
const SYMBOL_TOKEN: &str = "symbol:";
const METHOD_TOKEN: &str = "method ";
const REQUIRED_TOKEN: &str = "required:";
const FOUND_TOKEN: &str = "found:";

/// Marker line followed by the `required:` and `found:` lines.
static ARGUMENT_MISMATCH: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"[^\n]*cannot be applied to given types;[^\n]*\n([^\n]*)\n([^\n]*)").ok()
});

/// Verdict on why a generated oracle failed to compile.
///
/// A fresh value is empty and unresolved. An unresolved verdict means no
/// automated repair is known for the diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceError {
    error_solved: bool,
    missing_symbols: Vec<String>,
    unreported_exception: Option<String>,
    incompatible_types: bool,
    swappable_methods: Vec<String>,
}

impl ComplianceError {
    /// Empty, unresolved verdict.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a diagnostic from the first compilation of a candidate oracle.
    ///
    /// Missing symbols, argument mismatches and incomparable types are checked
    /// in that order; the first marker present decides the classification. An
    /// incomparable-types diagnostic marks `snippet` as having a complex
    /// signature.
    pub fn classify_compilation(
        diagnostic: &str,
        method: &DeclaredMethod,
        snippet: &mut CodeSnippet,
    ) -> Self {
        debug!("Classifying compile diagnostic for {}", method.signature());
        let mut error = Self::new();

        if diagnostic.contains(MISSING_SYMBOL_MARKER) {
            error.collect_missing_symbols(diagnostic);
        } else if diagnostic.contains(CANNOT_APPLY_MARKER) {
            if arguments_can_be_swapped(diagnostic) {
                error.collect_swappable_method(diagnostic);
            }
        } else if diagnostic.contains(INCOMPARABLE_TYPES_MARKER) {
            snippet.complex_signature_with_incompatible_types = true;
            error.incompatible_types = true;
            error.error_solved = true;
        }

        error
    }

    /// Classify a diagnostic raised after inserting `oracle` into generated code.
    ///
    /// Neither outcome marks the verdict resolved; the caller decides how to
    /// act on an unreported exception or an incomparable comparison.
    pub fn classify_oracle(diagnostic: &str, method: &DeclaredMethod, oracle: &str) -> Self {
        debug!(
            "Classifying oracle diagnostic for {}: {}",
            method.signature(),
            oracle
        );
        let mut error = Self::new();

        if let Some(start) = diagnostic.find(UNREPORTED_EXCEPTION_MARKER) {
            let rest = &diagnostic[start + UNREPORTED_EXCEPTION_MARKER.len()..];
            let end = rest.find(';').unwrap_or(rest.len());
            error.unreported_exception = Some(rest[..end].trim().to_string());
        } else if diagnostic.contains(INCOMPARABLE_TYPES_MARKER) {
            error.incompatible_types = true;
        }

        error
    }

    fn collect_missing_symbols(&mut self, diagnostic: &str) {
        for segment in diagnostic.split(MISSING_SYMBOL_MARKER) {
            let Some(start) = segment.find(SYMBOL_TOKEN) else {
                continue;
            };
            let detail = &segment[start + SYMBOL_TOKEN.len()..];
            // "symbol: <kind> <name> ..." -> <name>
            let name = detail
                .split(['\n', '\r', ' '])
                .filter(|token| !token.is_empty())
                .nth(1);
            if let Some(name) = name {
                self.missing_symbols.push(name.to_string());
                self.error_solved = true;
            }
        }
    }

    fn collect_swappable_method(&mut self, diagnostic: &str) {
        let Some(start) = diagnostic.find(METHOD_TOKEN) else {
            return;
        };
        let rest = &diagnostic[start + METHOD_TOKEN.len()..];
        let end = rest.find(' ').unwrap_or(rest.len());
        self.swappable_methods.push(rest[..end].to_string());
        self.error_solved = true;
    }

    /// Whether an automated repair applies.
    pub fn is_error_solved(&self) -> bool {
        self.error_solved
    }

    /// Symbols the compiler could not resolve, in diagnostic order.
    pub fn missing_symbols(&self) -> &[String] {
        &self.missing_symbols
    }

    /// Exception type that must be caught or declared, if any.
    pub fn unreported_exception(&self) -> Option<&str> {
        self.unreported_exception.as_deref()
    }

    /// Whether the oracle compares incomparable types.
    pub fn is_incompatible_types(&self) -> bool {
        self.incompatible_types
    }

    /// Methods whose arguments only need reordering.
    pub fn swappable_methods(&self) -> &[String] {
        &self.swappable_methods
    }
}

/// Whether every required argument type also appears among the found types,
/// so that reordering the arguments can satisfy the signature.
fn arguments_can_be_swapped(diagnostic: &str) -> bool {
    let Some(pattern) = ARGUMENT_MISMATCH.as_ref() else {
        return false;
    };
    let Some(captures) = pattern.captures(diagnostic) else {
        return false;
    };

    let required = type_list(&captures[1], REQUIRED_TOKEN);
    let found = type_list(&captures[2], FOUND_TOKEN);
    required.iter().all(|token| found.contains(token))
}

fn type_list(line: &str, label: &str) -> Vec<String> {
    line.replace(label, "")
        .trim()
        .split(',')
        .map(normalize_type_token)
        .collect()
}
