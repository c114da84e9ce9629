//! Configuration types and management for docoracle-rs.
//!
//! Configuration is loaded from YAML and validated section by section before a
//! run starts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{DocOracleError, Result};

/// Base stopwords removed from every comment and identifier.
pub const BASE_STOPWORDS: &[&str] = &[
    "true", "false", "the", "a", "if", "either", "whether", "else", "otherwise", "for", "be",
    "have", "this", "do", "not", "of", "can", "in", "null", "only", "already", "specify",
];

/// Word-vector table loaded when no other path is configured.
pub const DEFAULT_VECTORS_PATH: &str = "resources/word2vec.txt";

/// Largest Euclidean distance between two unit vectors. fastembed vectors are
/// normalized, so no word mover's distance over them can exceed this.
pub const UNIT_VECTOR_MAX_DISTANCE: f64 = 2.0;

/// Main configuration for a docoracle run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocOracleConfig {
    /// Semantic matcher settings
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Word-embedding resource settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Match audit log settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Batch execution settings
    #[serde(default)]
    pub run: RunConfig,
}

impl DocOracleConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DocOracleError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            DocOracleError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.matcher.validate()?;
        self.embedding.validate()?;
        self.audit.validate()?;
        self.run.validate()?;

        if self.embedding.backend == EmbeddingBackend::FastEmbed {
            for (field, value) in [
                ("matcher.distance_threshold", self.matcher.distance_threshold),
                ("matcher.long_comment_threshold", self.matcher.long_comment_threshold),
            ] {
                if value >= UNIT_VECTOR_MAX_DISTANCE {
                    return Err(DocOracleError::config_field(
                        format!(
                            "must be below {UNIT_VECTOR_MAX_DISTANCE} with the fast_embed backend, \
                             otherwise every candidate is retained (got {value})"
                        ),
                        field,
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Semantic matcher thresholds and vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Maximum accepted distance for ordinary comments
    pub distance_threshold: f64,
    /// Maximum accepted distance once a comment is considered long
    pub long_comment_threshold: f64,
    /// Normalized token count at which a comment is considered long
    pub long_comment_min_tokens: usize,
    /// Distance recorded when the embedding service cannot score a candidate
    pub failed_lookup_distance: f64,
    /// Stopwords every session starts with
    pub base_stopwords: Vec<String>,
    /// Receiver tag denoting the object under test
    pub target_receiver: String,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 3.6,
            long_comment_threshold: 6.0,
            long_comment_min_tokens: 9,
            failed_lookup_distance: 10.0,
            base_stopwords: BASE_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            target_receiver: "target".to_string(),
        }
    }
}

impl MatcherConfig {
    /// Threshold that applies to a comment of `comment_tokens` normalized tokens
    pub fn threshold_for(&self, comment_tokens: usize) -> f64 {
        if comment_tokens >= self.long_comment_min_tokens {
            self.long_comment_threshold
        } else {
            self.distance_threshold
        }
    }

    /// Validate matcher configuration
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("matcher.distance_threshold", self.distance_threshold),
            ("matcher.long_comment_threshold", self.long_comment_threshold),
            ("matcher.failed_lookup_distance", self.failed_lookup_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DocOracleError::config_field(
                    format!("must be a finite, non-negative number (got {value})"),
                    field,
                ));
            }
        }

        if self.long_comment_threshold < self.distance_threshold {
            return Err(DocOracleError::config_field(
                "must not be below matcher.distance_threshold",
                "matcher.long_comment_threshold",
            ));
        }

        if self.long_comment_min_tokens == 0 {
            return Err(DocOracleError::config_field(
                "must be at least 1",
                "matcher.long_comment_min_tokens",
            ));
        }

        if self.target_receiver.trim().is_empty() {
            return Err(DocOracleError::config_field(
                "must not be empty",
                "matcher.target_receiver",
            ));
        }

        Ok(())
    }
}

/// Where word vectors come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Pretrained word2vec/GloVe text table; unknown words fail the lookup
    VectorTable,
    /// fastembed sentence model applied per word
    FastEmbed,
}

/// Available fastembed models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddingModel {
    /// BGE Small EN v1.5 - 384 dim, very fast
    BGESmallENV15,
    /// BGE Small EN v1.5 Quantized - 384 dim, fastest
    BGESmallENV15Q,
    /// All-MiniLM-L6-v2 - 384 dim, fast and lightweight
    AllMiniLML6V2,
    /// All-MiniLM-L6-v2 Quantized - 384 dim, very fast
    AllMiniLML6V2Q,
    /// Nomic Embed Text v1.5 - 768 dim
    NomicEmbedTextV15,
}

impl EmbeddingModel {
    /// Get the embedding dimension for this model
    pub fn dimension(&self) -> usize {
        match self {
            EmbeddingModel::BGESmallENV15 | EmbeddingModel::BGESmallENV15Q => 384,
            EmbeddingModel::AllMiniLML6V2 | EmbeddingModel::AllMiniLML6V2Q => 384,
            EmbeddingModel::NomicEmbedTextV15 => 768,
        }
    }

    /// Get a human-readable name for this model
    pub fn display_name(&self) -> &'static str {
        match self {
            EmbeddingModel::BGESmallENV15 => "BGE-small-en-v1.5",
            EmbeddingModel::BGESmallENV15Q => "BGE-small-en-v1.5 (quantized)",
            EmbeddingModel::AllMiniLML6V2 => "all-MiniLM-L6-v2",
            EmbeddingModel::AllMiniLML6V2Q => "all-MiniLM-L6-v2 (quantized)",
            EmbeddingModel::NomicEmbedTextV15 => "nomic-embed-text-v1.5",
        }
    }
}

/// Configuration for the word-embedding distance resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Vector source
    pub backend: EmbeddingBackend,
    /// Path of the vector table (required for `vector_table`)
    pub vectors_path: Option<PathBuf>,
    /// fastembed model (used by `fast_embed`)
    pub model: EmbeddingModel,
    /// Cache directory for fastembed model files
    pub cache_dir: Option<PathBuf>,
    /// Whether to show download progress for model files
    pub show_download_progress: bool,
    /// Largest bag expansion solved exactly before falling back to the relaxed bound
    pub max_assignment_size: usize,
    /// Maximum number of cached word vectors
    pub max_cached_vectors: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::VectorTable,
            vectors_path: Some(PathBuf::from(DEFAULT_VECTORS_PATH)),
            model: EmbeddingModel::AllMiniLML6V2,
            cache_dir: dirs::cache_dir().map(|dir| dir.join("docoracle").join("models")),
            show_download_progress: false,
            max_assignment_size: 128,
            max_cached_vectors: 50_000,
        }
    }
}

impl EmbeddingConfig {
    /// Validate embedding configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend == EmbeddingBackend::VectorTable && self.vectors_path.is_none() {
            return Err(DocOracleError::config_field(
                "a vector table path is required for the vector_table backend",
                "embedding.vectors_path",
            ));
        }

        if self.max_assignment_size == 0 {
            return Err(DocOracleError::config_field(
                "must be at least 1",
                "embedding.max_assignment_size",
            ));
        }

        if self.max_cached_vectors == 0 {
            return Err(DocOracleError::config_field(
                "must be at least 1",
                "embedding.max_cached_vectors",
            ));
        }

        Ok(())
    }
}

/// Configuration for the match audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Record one audit entry per match
    pub enabled: bool,
    /// Directory receiving `<class>.csv` files
    pub output_dir: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: PathBuf::from("stats").join("candidates"),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.output_dir.as_os_str().is_empty() {
            return Err(DocOracleError::config_field(
                "must not be empty when auditing is enabled",
                "audit.output_dir",
            ));
        }
        Ok(())
    }
}

/// Batch execution limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Wall-clock budget for a whole batch, in seconds
    pub timeout_seconds: u64,
    /// Repair attempts allowed per rejected oracle
    pub max_repair_attempts: usize,
    /// Worker threads for batch matching (0 = one per core)
    pub worker_threads: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 600,
            max_repair_attempts: 3,
            worker_threads: 0,
        }
    }
}

impl RunConfig {
    /// Validate run configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(DocOracleError::config_field(
                "must be at least 1 second",
                "run.timeout_seconds",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DocOracleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.matcher.base_stopwords.len(), BASE_STOPWORDS.len());
    }

    #[test]
    fn default_backend_is_vector_table() {
        let embedding = EmbeddingConfig::default();
        assert_eq!(embedding.backend, EmbeddingBackend::VectorTable);
        assert_eq!(
            embedding.vectors_path.as_deref(),
            Some(std::path::Path::new(DEFAULT_VECTORS_PATH))
        );
    }

    #[test]
    fn fast_embed_needs_thresholds_below_unit_distance() {
        let mut config = DocOracleConfig::default();
        config.embedding.backend = EmbeddingBackend::FastEmbed;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DocOracleError::Config { field: Some(ref f), .. } if f == "matcher.distance_threshold"));

        config.matcher.distance_threshold = 0.8;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DocOracleError::Config { field: Some(ref f), .. } if f == "matcher.long_comment_threshold"));

        config.matcher.long_comment_threshold = 1.2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn threshold_switches_above_eight_tokens() {
        let matcher = MatcherConfig::default();
        assert_eq!(matcher.threshold_for(8), matcher.distance_threshold);
        assert_eq!(matcher.threshold_for(9), 6.0);
        assert_eq!(matcher.threshold_for(30), 6.0);
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let config = MatcherConfig {
            distance_threshold: -1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DocOracleError::Config { field: Some(ref f), .. } if f == "matcher.distance_threshold"));
    }

    #[test]
    fn vector_table_requires_path() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::VectorTable,
            vectors_path: None,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config: DocOracleConfig =
            serde_yaml::from_str("matcher:\n  distance_threshold: 2.5\n").unwrap();
        assert_eq!(config.matcher.distance_threshold, 2.5);
        assert_eq!(config.matcher.long_comment_threshold, 6.0);
        assert_eq!(config.run.max_repair_attempts, 3);
    }

    #[test]
    fn model_dimensions() {
        assert_eq!(EmbeddingModel::AllMiniLML6V2.dimension(), 384);
        assert_eq!(EmbeddingModel::NomicEmbedTextV15.dimension(), 768);
    }
}
