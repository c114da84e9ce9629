//! Job and outcome types exchanged with the oracle engine.

use serde::{Deserialize, Serialize};

use crate::core::model::{DeclaredMethod, Proposition};
use crate::semantic::candidate::Candidate;
use crate::semantic::matcher::{MatchRequest, RankedCandidates};

/// One comment to match against a candidate pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchJob {
    /// Documented method the comment belongs to
    pub method: DeclaredMethod,
    /// Comment text
    pub comment: String,
    /// Proposition extracted from the comment
    pub proposition: Proposition,
    /// Candidate resolved for the proposition's subject
    pub subject: Candidate,
    /// Candidate pool
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Display form of the candidate expected to rank first, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_match: Option<String>,
}

impl MatchJob {
    /// `<class>.<method signature>.<comment>`.
    pub fn key(&self) -> String {
        format!(
            "{}.{}.{}",
            self.method.containing_class(),
            self.method.signature(),
            self.comment
        )
    }

    /// Borrowed matcher input for this job.
    pub fn request(&self) -> MatchRequest<'_> {
        MatchRequest {
            candidates: &self.candidates,
            method: &self.method,
            subject: &self.subject,
            proposition: &self.proposition,
            comment: &self.comment,
        }
    }
}

/// A retained candidate and its distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Candidate display form
    pub candidate: String,
    /// Distance to the comment
    pub distance: f64,
}

/// Result of matching one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Job key
    pub key: String,
    /// Method signature
    pub method: String,
    /// Comment text
    pub comment: String,
    /// Retained candidates, closest first
    pub ranked: Vec<RankedEntry>,
    /// Display form of the closest candidate
    pub best: Option<String>,
    /// Threshold that was applied
    pub threshold: f64,
    /// Whether the long-comment threshold was applied
    pub threshold_raised: bool,
}

impl MatchOutcome {
    /// Summarize a ranking for `job`.
    pub fn from_ranking(job: &MatchJob, ranked: &RankedCandidates<'_>) -> Self {
        Self {
            key: job.key(),
            method: job.method.signature().to_string(),
            comment: job.comment.clone(),
            ranked: ranked
                .iter()
                .map(|(candidate, distance)| RankedEntry {
                    candidate: candidate.display_form(),
                    distance,
                })
                .collect(),
            best: ranked.best().map(|(candidate, _)| candidate.display_form()),
            threshold: ranked.threshold(),
            threshold_raised: ranked.threshold_raised(),
        }
    }

    /// Whether at least one candidate was retained.
    pub fn is_matched(&self) -> bool {
        self.best.is_some()
    }
}
