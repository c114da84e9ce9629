//! Word mover's distance between short documents.
//!
//! Documents are whitespace-separated word lists with uniform word weights.
//! The transport problem between two bags of `n` and `m` words is solved
//! exactly as an assignment problem over `lcm(n, m)` replicated slots. When
//! that expansion would exceed the configured size, the relaxed lower bound
//! (the larger of the two nearest-neighbour transports) is returned instead.

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;
use tracing::{debug, info};

use crate::core::config::{EmbeddingBackend, EmbeddingConfig};
use crate::core::errors::{DocOracleError, Result};
use crate::semantic::vectors::{FastEmbedVectors, VectorTable, WordVector, WordVectors};

/// Fixed-point scale applied to ground costs before solving the assignment.
const COST_SCALE: f64 = 1_000_000.0;

/// Semantic distance between two space-separated documents.
pub trait WordDistance: Send + Sync {
    /// Non-negative distance; `0` for identical documents. Fails when either
    /// document is empty or contains a word that cannot be embedded.
    fn distance(&self, left: &str, right: &str) -> Result<f64>;
}

/// Word mover's distance over a word-vector source.
pub struct WordMoversDistance<V> {
    vectors: V,
    max_assignment_size: usize,
}

impl<V: WordVectors> WordMoversDistance<V> {
    /// Create a distance over `vectors`, solving exactly up to `max_assignment_size` slots.
    pub fn new(vectors: V, max_assignment_size: usize) -> Self {
        Self {
            vectors,
            max_assignment_size: max_assignment_size.max(1),
        }
    }

    fn embed_document(&self, document: &str) -> Result<Vec<WordVector>> {
        let words: Vec<&str> = document.split_whitespace().collect();
        if words.is_empty() {
            return Err(DocOracleError::embedding("cannot compare an empty document"));
        }
        let dimension = self.vectors.dimension();
        words
            .into_iter()
            .map(|word| {
                let vector = self.vectors.vector(word)?;
                if vector.len() != dimension {
                    return Err(DocOracleError::embedding(format!(
                        "vector for '{word}' has {} components, expected {dimension}",
                        vector.len()
                    )));
                }
                Ok(vector)
            })
            .collect()
    }
}

impl<V: WordVectors> WordDistance for WordMoversDistance<V> {
    fn distance(&self, left: &str, right: &str) -> Result<f64> {
        let left = self.embed_document(left)?;
        let right = self.embed_document(right)?;

        let costs: Vec<Vec<f64>> = left
            .iter()
            .map(|l| right.iter().map(|r| euclidean(l, r)).collect())
            .collect();

        let slots = lcm(left.len(), right.len());
        if slots <= self.max_assignment_size {
            exact_transport(&costs, slots)
        } else {
            debug!(
                "{} assignment slots exceed the limit of {}, using the relaxed bound",
                slots, self.max_assignment_size
            );
            Ok(relaxed_transport(&costs))
        }
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}

/// Optimal transport with uniform weights, as a minimum-cost assignment
/// between `slots` replicas of each side.
fn exact_transport(costs: &[Vec<f64>], slots: usize) -> Result<f64> {
    let rows = costs.len();
    let cols = costs.first().map_or(0, Vec::len);
    let row_repeat = slots / rows;
    let col_repeat = slots / cols;

    let mut weights = Vec::with_capacity(slots * slots);
    for i in 0..slots {
        for j in 0..slots {
            let cost = costs[i / row_repeat][j / col_repeat];
            weights.push((cost * COST_SCALE).round() as i64);
        }
    }

    let matrix = Matrix::from_vec(slots, slots, weights)
        .map_err(|e| DocOracleError::internal(format!("Invalid assignment matrix: {e}")))?;
    let (total, _) = kuhn_munkres_min(&matrix);

    Ok(total as f64 / COST_SCALE / slots as f64)
}

/// Relaxed word mover's distance: each word travels to its nearest
/// counterpart, in both directions, and the tighter bound is kept.
fn relaxed_transport(costs: &[Vec<f64>]) -> f64 {
    let rows = costs.len();
    let cols = costs.first().map_or(0, Vec::len);

    let forward = costs
        .iter()
        .map(|row| row.iter().copied().fold(f64::INFINITY, f64::min))
        .sum::<f64>()
        / rows as f64;

    let backward = (0..cols)
        .map(|j| costs.iter().map(|row| row[j]).fold(f64::INFINITY, f64::min))
        .sum::<f64>()
        / cols as f64;

    forward.max(backward)
}

/// Process-wide distance resource, loaded once on first use.
///
/// Initialization happens at most once even under concurrent first access.
/// A failed initialization is reported as [`DocOracleError::EmbeddingInit`]
/// and retried on the next call.
pub struct SharedDistance {
    config: EmbeddingConfig,
    resource: OnceCell<Arc<dyn WordDistance>>,
}

impl SharedDistance {
    /// Lazily load the resource described by `config`.
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            config,
            resource: OnceCell::new(),
        }
    }

    /// Wrap an already-loaded distance.
    pub fn preloaded(distance: Arc<dyn WordDistance>) -> Self {
        Self {
            config: EmbeddingConfig::default(),
            resource: OnceCell::with_value(distance),
        }
    }

    /// The loaded resource, initializing it if necessary.
    pub fn get(&self) -> Result<&Arc<dyn WordDistance>> {
        self.resource.get_or_try_init(|| load_distance(&self.config))
    }

    /// Whether the resource has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.resource.get().is_some()
    }
}

impl WordDistance for SharedDistance {
    fn distance(&self, left: &str, right: &str) -> Result<f64> {
        self.get()?.distance(left, right)
    }
}

fn load_distance(config: &EmbeddingConfig) -> Result<Arc<dyn WordDistance>> {
    let start = Instant::now();
    let distance: Arc<dyn WordDistance> = match config.backend {
        EmbeddingBackend::VectorTable => {
            let path = config.vectors_path.as_deref().ok_or_else(|| {
                DocOracleError::embedding_init("no vector table path configured")
            })?;
            let table = VectorTable::from_path(path)
                .map_err(|e| DocOracleError::embedding_init(e.to_string()))?;
            Arc::new(WordMoversDistance::new(table, config.max_assignment_size))
        }
        EmbeddingBackend::FastEmbed => {
            let vectors = FastEmbedVectors::new(config)?;
            Arc::new(WordMoversDistance::new(vectors, config.max_assignment_size))
        }
    };
    info!("Word distance resource ready in {:.2?}", start.elapsed());
    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> VectorTable {
        VectorTable::from_entries([
            ("stack", vec![0.0, 0.0]),
            ("empty", vec![3.0, 4.0]),
            ("size", vec![1.0, 0.0]),
            ("zero", vec![0.0, 2.0]),
        ])
        .unwrap()
    }

    #[test]
    fn identical_documents_have_zero_distance() {
        let wmd = WordMoversDistance::new(table(), 64);
        assert_relative_eq!(wmd.distance("stack empty", "stack empty").unwrap(), 0.0);
        assert_relative_eq!(wmd.distance("stack empty", "empty stack").unwrap(), 0.0);
    }

    #[test]
    fn single_words_use_euclidean_cost() {
        let wmd = WordMoversDistance::new(table(), 64);
        assert_relative_eq!(wmd.distance("stack", "empty").unwrap(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn uneven_bags_split_mass() {
        let wmd = WordMoversDistance::new(table(), 64);
        // "size" sends half its mass to each of "stack" (1.0) and "zero" (sqrt 5)
        let expected = (1.0 + 5.0_f64.sqrt()) / 2.0;
        assert_relative_eq!(
            wmd.distance("size", "stack zero").unwrap(),
            expected,
            epsilon = 1e-5
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let wmd = WordMoversDistance::new(table(), 64);
        let a = wmd.distance("stack size", "empty zero size").unwrap();
        let b = wmd.distance("empty zero size", "stack size").unwrap();
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }

    #[test]
    fn relaxed_bound_never_exceeds_exact() {
        let exact = WordMoversDistance::new(table(), 64);
        let relaxed = WordMoversDistance::new(table(), 1);
        let a = exact.distance("stack size", "empty zero size").unwrap();
        let b = relaxed.distance("stack size", "empty zero size").unwrap();
        assert!(b <= a + 1e-6);
        assert!(b > 0.0);
    }

    #[test]
    fn empty_or_unknown_words_fail() {
        let wmd = WordMoversDistance::new(table(), 64);
        assert!(wmd.distance("", "stack").is_err());
        assert!(wmd.distance("stack", "   ").is_err());
        assert!(matches!(
            wmd.distance("stack", "frobnicate"),
            Err(DocOracleError::Embedding { .. })
        ));
    }

    #[test]
    fn relaxed_bound_used_past_assignment_limit() {
        // 2 x 3 words need 6 slots; a limit of 5 forces the relaxed bound
        let relaxed = WordMoversDistance::new(table(), 5);
        let nearest = WordMoversDistance::new(table(), 6);
        let a = relaxed.distance("stack size", "empty zero size").unwrap();
        let b = nearest.distance("stack size", "empty zero size").unwrap();
        assert!(a < b);
    }

    /// Claims two components but returns three for "wide".
    struct RaggedVectors;

    impl WordVectors for RaggedVectors {
        fn vector(&self, word: &str) -> Result<WordVector> {
            match word {
                "wide" => Ok(Arc::from(vec![1.0, 2.0, 3.0])),
                _ => Ok(Arc::from(vec![0.0, 1.0])),
            }
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[test]
    fn vectors_of_wrong_dimension_fail() {
        let wmd = WordMoversDistance::new(RaggedVectors, 64);
        assert_relative_eq!(wmd.distance("narrow", "narrow").unwrap(), 0.0);
        assert!(matches!(
            wmd.distance("narrow", "wide"),
            Err(DocOracleError::Embedding { .. })
        ));
    }

    #[test]
    fn shared_distance_reports_init_failure() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::VectorTable,
            vectors_path: Some("/nonexistent/vectors.txt".into()),
            ..Default::default()
        };
        let shared = SharedDistance::new(config);
        let err = shared.distance("a", "b").unwrap_err();
        assert!(matches!(err, DocOracleError::EmbeddingInit { .. }));
        assert!(!shared.is_initialized());
    }

    #[test]
    fn shared_distance_delegates_once_loaded() {
        let shared = SharedDistance::preloaded(Arc::new(WordMoversDistance::new(table(), 64)));
        assert!(shared.is_initialized());
        assert_relative_eq!(shared.distance("stack", "size").unwrap(), 1.0, epsilon = 1e-6);
    }
}
