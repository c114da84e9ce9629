//! Oracle engine: runs match jobs against a shared distance resource.

use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::api::results::{MatchJob, MatchOutcome};
use crate::audit::{MatchAuditLog, MatchAuditRecord};
use crate::core::config::DocOracleConfig;
use crate::core::errors::{DocOracleError, Result};
use crate::semantic::distance::{SharedDistance, WordDistance};
use crate::semantic::lemmatizer::{Lemmatizer, RuleLemmatizer};
use crate::semantic::lexical::StopwordSet;
use crate::semantic::matcher::SemanticMatcher;

/// Per-run state shared by every match of a run.
///
/// The stopword set only grows: each processed method adds its declaring
/// type's simple name. Create one session per run and drop it afterwards.
#[derive(Debug)]
pub struct MatchSession {
    stopwords: StopwordSet,
    audit: MatchAuditLog,
    audit_enabled: bool,
}

impl MatchSession {
    /// Fresh session seeded with the configured base stopwords.
    pub fn new(config: &DocOracleConfig) -> Self {
        Self {
            stopwords: StopwordSet::from_config(&config.matcher),
            audit: MatchAuditLog::new(),
            audit_enabled: config.audit.enabled,
        }
    }

    /// Accumulated stopwords.
    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Audit records collected so far.
    pub fn audit(&self) -> &MatchAuditLog {
        &self.audit
    }

    /// Whether matches are recorded in the audit log.
    pub fn audit_enabled(&self) -> bool {
        self.audit_enabled
    }
}

/// Runs match jobs.
pub struct OracleEngine {
    config: Arc<DocOracleConfig>,
    distance: Arc<SharedDistance>,
    matcher: SemanticMatcher,
    pool: Option<rayon::ThreadPool>,
}

impl OracleEngine {
    /// Create an engine with the built-in lemmatizer and a lazily loaded distance resource.
    pub fn new(config: DocOracleConfig) -> Result<Self> {
        let distance = Arc::new(SharedDistance::new(config.embedding.clone()));
        Self::with_services(config, Arc::new(RuleLemmatizer::new()), distance)
    }

    /// Create an engine over explicit services.
    pub fn with_services(
        config: DocOracleConfig,
        lemmatizer: Arc<dyn Lemmatizer>,
        distance: Arc<SharedDistance>,
    ) -> Result<Self> {
        config.validate()?;
        info!("Initializing oracle engine");

        let pool = match config.run.worker_threads {
            0 => None,
            threads => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        DocOracleError::internal(format!("Failed to build worker pool: {e}"))
                    })?,
            ),
        };

        let shared: Arc<dyn WordDistance> = distance.clone();
        let matcher = SemanticMatcher::new(config.matcher.clone(), lemmatizer, shared);

        Ok(Self {
            config: Arc::new(config),
            distance,
            matcher,
            pool,
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &DocOracleConfig {
        &self.config
    }

    /// New session for a run.
    pub fn session(&self) -> MatchSession {
        MatchSession::new(&self.config)
    }

    /// Load the distance resource if it is not loaded yet.
    ///
    /// Fails with [`DocOracleError::EmbeddingInit`] when the resource cannot be
    /// loaded; that failure aborts the run.
    pub fn ensure_ready(&self) -> Result<()> {
        self.distance.get().map(|_| ())
    }

    /// Match a single job.
    pub fn run_job(&self, session: &MatchSession, job: &MatchJob) -> Result<MatchOutcome> {
        self.ensure_ready()?;
        Ok(self.rank_job(session, job))
    }

    /// Match every job in parallel. Outcomes are returned in job order.
    pub fn run_batch(&self, session: &MatchSession, jobs: &[MatchJob]) -> Result<Vec<MatchOutcome>> {
        self.ensure_ready()?;
        info!("Matching {} jobs", jobs.len());

        let run = || -> Vec<MatchOutcome> {
            jobs.par_iter()
                .map(|job| self.rank_job(session, job))
                .collect()
        };
        let outcomes = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let matched = outcomes.iter().filter(|o| o.is_matched()).count();
        info!("Matched {}/{} comments", matched, outcomes.len());
        Ok(outcomes)
    }

    /// [`run_batch`](Self::run_batch) under the configured run timeout.
    ///
    /// On timeout the batch keeps running on its blocking thread but its
    /// results are discarded.
    pub async fn run_batch_with_timeout(
        self: Arc<Self>,
        session: Arc<MatchSession>,
        jobs: Arc<Vec<MatchJob>>,
    ) -> Result<Vec<MatchOutcome>> {
        let seconds = self.config.run.timeout_seconds;
        let engine = Arc::clone(&self);
        let handle =
            tokio::task::spawn_blocking(move || engine.run_batch(&session, jobs.as_slice()));

        match tokio::time::timeout(Duration::from_secs(seconds), handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(DocOracleError::internal(format!(
                "Match batch task failed: {join_error}"
            ))),
            Err(_) => Err(DocOracleError::Timeout { seconds }),
        }
    }

    fn rank_job(&self, session: &MatchSession, job: &MatchJob) -> MatchOutcome {
        let ranked = self.matcher.rank(session.stopwords(), &job.request());
        let outcome = MatchOutcome::from_ranking(job, &ranked);
        debug!(
            "{}: {} candidate(s) retained, best {:?}",
            outcome.key,
            ranked.len(),
            outcome.best
        );

        if session.audit_enabled() {
            let success = match (&job.expected_match, &outcome.best) {
                (Some(expected), Some(best)) => expected == best,
                _ => false,
            };
            session.audit().record(MatchAuditRecord {
                class_name: job.method.containing_class().to_string(),
                method_name: job.method.signature().to_string(),
                comment: job.comment.clone(),
                subject: job.proposition.subject.text.clone(),
                predicate: job.proposition.predicate.clone(),
                subject_candidates: job.candidates.len(),
                predicate_candidates: ranked.len(),
                match_expected: job.expected_match.is_some(),
                success,
            });
        }

        outcome
    }
}
