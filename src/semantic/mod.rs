//! Semantic matching of comment text to code-element candidates.
//!
//! Comments and candidate names are reduced to lemma tokens by
//! [`lexical::LexicalNormalizer`], compared with a word mover's distance over
//! word vectors, and filtered by a length-dependent threshold.

pub mod candidate;
pub mod complementary;
pub mod distance;
pub mod lemmatizer;
pub mod lexical;
pub mod matcher;
pub mod vectors;

pub use candidate::{BoundCallCandidate, Candidate, GeneralCandidate, InvocableMember};
pub use complementary::is_complementary;
pub use distance::{SharedDistance, WordDistance, WordMoversDistance};
pub use lemmatizer::{Lemmatizer, PassthroughLemmatizer, RuleLemmatizer};
pub use lexical::{LexicalNormalizer, StopwordSet};
pub use matcher::{MatchRequest, RankedCandidates, SemanticMatcher};
pub use vectors::{FastEmbedVectors, VectorTable, WordVectors};
