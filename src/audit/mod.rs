//! Match audit log.
//!
//! Every ranked match can be recorded for later review of the candidate
//! search space. Records are grouped by class and appended to
//! `<output_dir>/<class>.csv` as semicolon-separated `label;value` lines.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::errors::{DocOracleError, Result};

/// One audited match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchAuditRecord {
    /// Qualified name of the class under test
    pub class_name: String,
    /// Signature of the documented method
    pub method_name: String,
    /// Comment being translated
    pub comment: String,
    /// Subject phrase that was matched
    pub subject: String,
    /// Predicate phrase that was matched
    pub predicate: String,
    /// Candidates considered for the subject
    pub subject_candidates: usize,
    /// Candidates retained for the predicate
    pub predicate_candidates: usize,
    /// Whether a translation was expected for this comment
    pub match_expected: bool,
    /// Whether the best match was the expected one
    pub success: bool,
}

impl MatchAuditRecord {
    /// Key of the record: `<class>.<method>.<comment>`.
    pub fn id(&self) -> String {
        format!("{}.{}.{}", self.class_name, self.method_name, self.comment)
    }

    /// CSV rendering, terminated by a blank line.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for (label, value) in [
            ("Method", self.method_name.clone()),
            ("Comment", self.comment.clone()),
            ("Subject", self.subject.clone()),
            ("Number of candidates", self.subject_candidates.to_string()),
            ("Predicate", self.predicate.clone()),
            ("Number of candidates", self.predicate_candidates.to_string()),
            ("Is match expected", self.match_expected.to_string()),
            ("Did match succeed", self.success.to_string()),
        ] {
            out.push_str(label);
            out.push(';');
            out.push_str(&value);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

/// Thread-safe store of audit records, keyed by [`MatchAuditRecord::id`].
#[derive(Debug, Default)]
pub struct MatchAuditLog {
    records: DashMap<String, MatchAuditRecord>,
}

impl MatchAuditLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record`, replacing any earlier record with the same id.
    pub fn record(&self, record: MatchAuditRecord) {
        self.records.insert(record.id(), record);
    }

    /// Record stored under `id`.
    pub fn get(&self, id: &str) -> Option<MatchAuditRecord> {
        self.records.get(id).map(|r| r.value().clone())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored records ordered by id.
    pub fn records(&self) -> Vec<MatchAuditRecord> {
        let sorted: BTreeMap<String, MatchAuditRecord> = self
            .records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        sorted.into_values().collect()
    }

    /// Append every record to `<dir>/<class>.csv` and return the files written.
    pub fn flush(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if self.is_empty() {
            debug!("Audit log empty, nothing to flush");
            return Ok(Vec::new());
        }

        fs::create_dir_all(dir).map_err(|e| {
            DocOracleError::io(format!("Failed to create audit directory: {}", dir.display()), e)
        })?;

        let mut by_class: BTreeMap<String, String> = BTreeMap::new();
        for record in self.records() {
            by_class
                .entry(record.class_name.clone())
                .or_default()
                .push_str(&record.to_csv());
        }

        let mut written = Vec::with_capacity(by_class.len());
        for (class_name, content) in by_class {
            let path = dir.join(format!("{class_name}.csv"));
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    DocOracleError::io(format!("Failed to open audit file: {}", path.display()), e)
                })?;
            file.write_all(content.as_bytes()).map_err(|e| {
                DocOracleError::io(format!("Failed to write audit file: {}", path.display()), e)
            })?;
            written.push(path);
        }

        info!("Flushed {} audit records to {} file(s)", self.len(), written.len());
        Ok(written)
    }

    /// Drop every stored record.
    pub fn clear(&self) {
        self.records.clear();
    }
}
