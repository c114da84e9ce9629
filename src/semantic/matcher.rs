//! Semantic ranking of code-element candidates against a comment.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::config::MatcherConfig;
use crate::core::model::{DeclaredMethod, Proposition};
use crate::semantic::candidate::Candidate;
use crate::semantic::complementary::is_complementary;
use crate::semantic::distance::WordDistance;
use crate::semantic::lemmatizer::Lemmatizer;
use crate::semantic::lexical::{LexicalNormalizer, StopwordSet};

/// Everything the matcher needs to rank one comment.
#[derive(Debug, Clone, Copy)]
pub struct MatchRequest<'a> {
    /// Candidate pool
    pub candidates: &'a [Candidate],
    /// Method whose documentation contains the comment
    pub method: &'a DeclaredMethod,
    /// Candidate already resolved for the proposition's subject
    pub subject: &'a Candidate,
    /// Proposition the comment was extracted from
    pub proposition: &'a Proposition,
    /// Comment text to match
    pub comment: &'a str,
}

/// Candidates within the distance threshold, closest first.
#[derive(Debug, Clone)]
pub struct RankedCandidates<'a> {
    entries: IndexMap<&'a Candidate, f64>,
    comment_tokens: Vec<String>,
    threshold: f64,
    long_comment: bool,
}

impl<'a> RankedCandidates<'a> {
    /// Number of retained candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no candidate was retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closest candidate, if any.
    pub fn best(&self) -> Option<(&'a Candidate, f64)> {
        self.entries.first().map(|(c, d)| (*c, *d))
    }

    /// Distance recorded for `candidate`, if retained.
    pub fn distance(&self, candidate: &Candidate) -> Option<f64> {
        self.entries.get(candidate).copied()
    }

    /// Retained candidates with their distances, in ascending distance order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Candidate, f64)> + '_ {
        self.entries.iter().map(|(c, d)| (*c, *d))
    }

    /// Normalized comment tokens the candidates were compared against.
    pub fn comment_tokens(&self) -> &[String] {
        &self.comment_tokens
    }

    /// Threshold that was applied.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether the long-comment threshold was applied.
    pub fn threshold_raised(&self) -> bool {
        self.long_comment
    }
}

/// Ranks candidates by word mover's distance between their name and a comment.
pub struct SemanticMatcher {
    config: MatcherConfig,
    normalizer: LexicalNormalizer,
    distance: Arc<dyn WordDistance>,
}

impl SemanticMatcher {
    /// Create a matcher. `distance` must already be usable: lookup failures
    /// are absorbed per candidate.
    pub fn new(
        config: MatcherConfig,
        lemmatizer: Arc<dyn Lemmatizer>,
        distance: Arc<dyn WordDistance>,
    ) -> Self {
        Self {
            config,
            normalizer: LexicalNormalizer::new(lemmatizer),
            distance,
        }
    }

    /// Matcher configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Text normalizer used for comments and identifiers.
    pub fn normalizer(&self) -> &LexicalNormalizer {
        &self.normalizer
    }

    /// Rank the eligible candidates of `request` by semantic closeness to its comment.
    ///
    /// The simple name of the method's declaring class joins `stopwords` for
    /// the rest of the session.
    pub fn rank<'a>(
        &self,
        stopwords: &StopwordSet,
        request: &MatchRequest<'a>,
    ) -> RankedCandidates<'a> {
        stopwords.insert(&request.method.containing_class_simple_name().to_lowercase());

        let comment_tokens = self.normalizer.normalize(request.comment, stopwords);
        let parsed_comment = comment_tokens.join(" ");
        debug!("Normalized comment: '{}'", parsed_comment);

        let mut entries: IndexMap<&'a Candidate, f64> = IndexMap::new();
        for candidate in request.candidates {
            if !self.is_eligible(candidate, request) {
                continue;
            }

            let tokens = stopwords.remove_from(
                self.normalizer
                    .split_identifier(candidate.match_name()),
            );
            let parsed_candidate = tokens.join(" ");

            let distance = match self.distance.distance(&parsed_comment, &parsed_candidate) {
                Ok(distance) => distance,
                Err(err) => {
                    debug!(
                        "Distance lookup failed for {}: {}",
                        candidate.display_form(),
                        err
                    );
                    self.config.failed_lookup_distance
                }
            };
            debug!(
                "Distance '{}' <-> '{}' ({}): {:.4}",
                parsed_comment,
                parsed_candidate,
                candidate.display_form(),
                distance
            );
            entries.insert(candidate, distance);
        }

        let threshold = self.config.threshold_for(comment_tokens.len());
        entries.retain(|_, distance| *distance <= threshold);
        entries.sort_by(|_, a, _, b| a.total_cmp(b));

        RankedCandidates {
            entries,
            long_comment: comment_tokens.len() >= self.config.long_comment_min_tokens,
            comment_tokens,
            threshold,
        }
    }

    /// Whether `candidate` may be matched for `request`.
    ///
    /// Complementary getters are never eligible. A call on the object under
    /// test is only eligible when the proposition is passive or its subject
    /// itself denotes the object under test.
    pub fn is_eligible(&self, candidate: &Candidate, request: &MatchRequest<'_>) -> bool {
        match candidate {
            Candidate::BoundCall(call) => {
                if is_complementary(candidate, request.method) {
                    return false;
                }
                if call.receiver() == self.config.target_receiver {
                    request.proposition.is_passive()
                        || request.subject.denotes_receiver(&self.config.target_receiver)
                } else {
                    true
                }
            }
            Candidate::General(_) => true,
        }
    }
}
