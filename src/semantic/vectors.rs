//! Word-vector sources for the distance computation.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::core::config::{EmbeddingConfig, EmbeddingModel};
use crate::core::errors::{DocOracleError, Result};

/// Shared, immutable word vector.
pub type WordVector = Arc<[f32]>;

/// Lookup of a dense vector per word.
pub trait WordVectors: Send + Sync {
    /// Vector for `word`, or an embedding error if the word cannot be embedded.
    fn vector(&self, word: &str) -> Result<WordVector>;

    /// Dimension of every vector returned.
    fn dimension(&self) -> usize;
}

/// Pretrained vectors loaded from a word2vec/GloVe text file.
///
/// Each line is a word followed by its components. A leading
/// `<count> <dimension>` header line is accepted and skipped.
#[derive(Debug, Clone, Default)]
pub struct VectorTable {
    vectors: HashMap<String, WordVector>,
    dimension: usize,
}

impl VectorTable {
    /// Load a table from a text file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            DocOracleError::io(format!("Failed to open vector table: {}", path.display()), e)
        })?;
        let table = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} word vectors of dimension {} from {}",
            table.len(),
            table.dimension,
            path.display()
        );
        Ok(table)
    }

    /// Parse a table from any buffered reader.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut table = Self::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let rest: Vec<&str> = fields.collect();

            if index == 0 && rest.len() == 1 && word.parse::<usize>().is_ok() {
                if let Ok(dimension) = rest[0].parse::<usize>() {
                    table.dimension = dimension;
                    continue;
                }
            }

            let components = rest
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| {
                    DocOracleError::validation_field(
                        format!("line {}: invalid vector component: {e}", index + 1),
                        "vectors_path",
                    )
                })?;
            table.push(word, components).map_err(|e| match e {
                DocOracleError::Validation { message, field } => DocOracleError::Validation {
                    message: format!("line {}: {message}", index + 1),
                    field,
                },
                other => other,
            })?;
        }

        if table.vectors.is_empty() {
            return Err(DocOracleError::validation_field(
                "vector table contains no vectors",
                "vectors_path",
            ));
        }
        Ok(table)
    }

    /// Build a table from in-memory entries.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (word, components) in entries {
            table.push(word, components)?;
        }
        Ok(table)
    }

    fn push(&mut self, word: impl Into<String>, components: Vec<f32>) -> Result<()> {
        if components.is_empty() {
            return Err(DocOracleError::validation("vector has no components"));
        }
        if self.dimension == 0 {
            self.dimension = components.len();
        } else if components.len() != self.dimension {
            return Err(DocOracleError::validation(format!(
                "expected {} components, found {}",
                self.dimension,
                components.len()
            )));
        }
        self.vectors.insert(word.into(), components.into());
        Ok(())
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the table has no words.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl WordVectors for VectorTable {
    fn vector(&self, word: &str) -> Result<WordVector> {
        self.vectors
            .get(word)
            .cloned()
            .ok_or_else(|| DocOracleError::out_of_vocabulary(word))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// In-memory cache for word vectors (hash -> vector)
struct VectorCache {
    entries: HashMap<u64, WordVector>,
    max_entries: usize,
    hits: usize,
    misses: usize,
}

impl VectorCache {
    fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
            hits: 0,
            misses: 0,
        }
    }

    fn get(&mut self, hash: u64) -> Option<WordVector> {
        if let Some(vector) = self.entries.get(&hash) {
            self.hits += 1;
            Some(Arc::clone(vector))
        } else {
            self.misses += 1;
            None
        }
    }

    fn insert(&mut self, hash: u64, vector: WordVector) {
        // At capacity: drop half the entries
        if self.entries.len() >= self.max_entries {
            let to_remove: Vec<u64> = self
                .entries
                .keys()
                .take(self.max_entries.div_ceil(2))
                .copied()
                .collect();
            for key in to_remove {
                self.entries.remove(&key);
            }
        }
        self.entries.insert(hash, vector);
    }

    fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Word vectors produced by a fastembed model, one word per inference.
pub struct FastEmbedVectors {
    model: Mutex<TextEmbedding>,
    dimension: usize,
    cache: Mutex<VectorCache>,
}

impl FastEmbedVectors {
    /// Load the configured model, downloading it into the cache directory if needed.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let mut init_options = InitOptions::new(config.model.to_fastembed_model())
            .with_show_download_progress(config.show_download_progress);

        if let Some(ref cache_dir) = config.cache_dir {
            init_options = init_options.with_cache_dir(cache_dir.into());
        }

        let model = TextEmbedding::try_new(init_options).map_err(|e| {
            DocOracleError::embedding_init(format!(
                "Failed to initialize {}: {}",
                config.model.display_name(),
                e
            ))
        })?;

        Ok(Self {
            model: Mutex::new(model),
            dimension: config.model.dimension(),
            cache: Mutex::new(VectorCache::new(config.max_cached_vectors)),
        })
    }

    /// Cached vector count and hit rate.
    pub fn cache_stats(&self) -> (usize, f64) {
        let cache = self.cache.lock();
        (cache.entries.len(), cache.hit_rate())
    }

    fn hash_word(word: &str) -> u64 {
        use xxhash_rust::xxh3::xxh3_64;
        xxh3_64(word.as_bytes())
    }
}

impl WordVectors for FastEmbedVectors {
    fn vector(&self, word: &str) -> Result<WordVector> {
        let hash = Self::hash_word(word);
        if let Some(vector) = self.cache.lock().get(hash) {
            return Ok(vector);
        }

        let embeddings = self
            .model
            .lock()
            .embed(vec![word], None)
            .map_err(|e| DocOracleError::Embedding {
                message: format!("Embedding generation failed: {e}"),
                word: Some(word.to_string()),
            })?;

        let vector: WordVector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| DocOracleError::out_of_vocabulary(word))?
            .into();

        self.cache.lock().insert(hash, Arc::clone(&vector));
        let (cached, hit_rate) = self.cache_stats();
        debug!(
            "Embedded '{}' ({} cached, hit rate {:.2})",
            word, cached, hit_rate
        );
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

impl EmbeddingModel {
    /// Convert to fastembed model enum.
    pub fn to_fastembed_model(&self) -> FastEmbedModel {
        match self {
            EmbeddingModel::BGESmallENV15 => FastEmbedModel::BGESmallENV15,
            EmbeddingModel::BGESmallENV15Q => FastEmbedModel::BGESmallENV15Q,
            EmbeddingModel::AllMiniLML6V2 => FastEmbedModel::AllMiniLML6V2,
            EmbeddingModel::AllMiniLML6V2Q => FastEmbedModel::AllMiniLML6V2Q,
            EmbeddingModel::NomicEmbedTextV15 => FastEmbedModel::NomicEmbedTextV15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_glove_and_word2vec_headers() {
        let glove = "stack 0.5 1.0\nqueue 0.25 -1.0\n";
        let table = VectorTable::from_reader(glove.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dimension(), 2);
        assert_eq!(&*table.vector("queue").unwrap(), &[0.25, -1.0]);

        let word2vec = "2 3\nempty 1 2 3\nfull 3 2 1\n";
        let table = VectorTable::from_reader(word2vec.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dimension(), 3);
    }

    #[test]
    fn unknown_word_is_embedding_error() {
        let table = VectorTable::from_entries([("size", vec![1.0])]).unwrap();
        let err = table.vector("capacity").unwrap_err();
        assert!(matches!(err, DocOracleError::Embedding { word: Some(ref w), .. } if w == "capacity"));
    }

    #[test]
    fn mismatched_dimension_is_rejected() {
        let text = "a 1 2\nb 1 2 3\n";
        let err = VectorTable::from_reader(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(VectorTable::from_reader("\n\n".as_bytes()).is_err());
    }

    #[test]
    fn vector_cache_evicts_half_at_capacity() {
        let mut cache = VectorCache::new(10);
        assert!(cache.get(1).is_none());
        for i in 0..10 {
            cache.insert(i, vec![i as f32].into());
        }
        assert_eq!(cache.entries.len(), 10);

        cache.insert(100, vec![100.0].into());
        assert!(cache.entries.len() <= 6);
        assert!(cache.get(100).is_some());
        assert!(cache.hit_rate() > 0.0);
    }

    #[test]
    fn hash_word_is_deterministic() {
        assert_eq!(
            FastEmbedVectors::hash_word("stack"),
            FastEmbedVectors::hash_word("stack")
        );
        assert_ne!(
            FastEmbedVectors::hash_word("stack"),
            FastEmbedVectors::hash_word("stacks")
        );
    }
}
