//! Text normalization shared by comment and identifier tokenization.

use std::sync::Arc;

use dashmap::DashSet;
use tracing::warn;

use crate::core::config::MatcherConfig;
use crate::semantic::lemmatizer::Lemmatizer;

/// Session-scoped stopword vocabulary.
///
/// Starts from the configured base words and grows as the matcher adds the
/// simple names of the classes it processes. Lookups are case-insensitive.
#[derive(Debug, Default)]
pub struct StopwordSet {
    words: DashSet<String>,
}

impl StopwordSet {
    /// Create a set holding `base`.
    pub fn new<I, S>(base: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = Self::default();
        for word in base {
            set.insert(word.as_ref());
        }
        set
    }

    /// Create a set from the matcher's base stopwords.
    pub fn from_config(config: &MatcherConfig) -> Self {
        Self::new(&config.base_stopwords)
    }

    /// Add a word. Returns `true` if it was not already present.
    pub fn insert(&self, word: &str) -> bool {
        self.words.insert(word.to_lowercase())
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Number of distinct stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Blank every stopword in place, then drop all empty tokens.
    pub fn remove_from(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .map(|token| if self.contains(&token) { String::new() } else { token })
            .filter(|token| !token.is_empty())
            .collect()
    }
}

/// Turns comments and identifier names into lemma token lists.
#[derive(Clone)]
pub struct LexicalNormalizer {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl std::fmt::Debug for LexicalNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalNormalizer").finish_non_exhaustive()
    }
}

impl LexicalNormalizer {
    /// Create a normalizer backed by `lemmatizer`.
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self { lemmatizer }
    }

    /// Comment tokens: punctuation removed, lowercased, lemmatized, stopwords removed.
    pub fn normalize(&self, text: &str, stopwords: &StopwordSet) -> Vec<String> {
        stopwords.remove_from(self.lemmatized_tokens(text))
    }

    /// Comment tokens before stopword removal.
    pub fn lemmatized_tokens(&self, text: &str) -> Vec<String> {
        let cleaned = strip_punctuation(text).to_lowercase();
        let tokens: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
        self.apply_lemmas(tokens)
    }

    /// Identifier tokens: split at camel-case boundaries, lowercased and
    /// lemmatized. Stopwords are left for the caller to remove.
    pub fn split_identifier(&self, name: &str) -> Vec<String> {
        let tokens: Vec<String> = split_camel_case(name)
            .into_iter()
            .map(|part| part.to_lowercase())
            .collect();
        self.apply_lemmas(tokens)
    }

    fn apply_lemmas(&self, tokens: Vec<String>) -> Vec<String> {
        if tokens.is_empty() {
            return tokens;
        }
        match self.lemmatizer.lemmatize(&tokens.join(" ")) {
            Ok(lemmas) => substitute_lemmas(tokens, lemmas),
            Err(err) => {
                warn!("Lemmatization failed, keeping surface forms: {}", err);
                tokens
            }
        }
    }
}

/// Replace tokens with lemmas by position. Surplus lemmas are appended and
/// tokens without a lemma keep their surface form.
pub fn substitute_lemmas(mut tokens: Vec<String>, lemmas: Vec<String>) -> Vec<String> {
    for (index, lemma) in lemmas.into_iter().enumerate() {
        let lemma = lemma.to_lowercase();
        if index < tokens.len() {
            tokens[index] = lemma;
        } else {
            tokens.push(lemma);
        }
    }
    tokens
}

/// Keep ASCII letters, digits and spaces. Tabs and line breaks are dropped
/// like any other character, so a word wrapped across lines joins up.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// Split an identifier where a lowercase letter is followed by an uppercase one.
pub fn split_camel_case(name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for c in name.chars() {
        if previous.is_some_and(char::is_lowercase) && c.is_uppercase() {
            parts.push(std::mem::take(&mut current));
        }
        current.push(c);
        previous = Some(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{DocOracleError, Result};
    use crate::semantic::lemmatizer::{PassthroughLemmatizer, RuleLemmatizer};

    struct FailingLemmatizer;

    impl Lemmatizer for FailingLemmatizer {
        fn lemmatize(&self, _text: &str) -> Result<Vec<String>> {
            Err(DocOracleError::lemmatizer("service unavailable"))
        }
    }

    struct MergingLemmatizer;

    impl Lemmatizer for MergingLemmatizer {
        fn lemmatize(&self, _text: &str) -> Result<Vec<String>> {
            Ok(vec!["merged".to_string()])
        }
    }

    fn stopwords() -> StopwordSet {
        StopwordSet::from_config(&MatcherConfig::default())
    }

    #[test]
    fn camel_case_splits_only_lower_to_upper() {
        assert_eq!(split_camel_case("getMaxValue"), vec!["get", "Max", "Value"]);
        assert_eq!(split_camel_case("parseURL"), vec!["parse", "URL"]);
        assert_eq!(split_camel_case("URLParser"), vec!["URLParser"]);
        assert_eq!(split_camel_case("a1B"), vec!["a1B"]);
        assert!(split_camel_case("").is_empty());
    }

    #[test]
    fn punctuation_is_removed() {
        assert_eq!(strip_punctuation("if `size` < 0, throw!"), "if size  0 throw");
        assert_eq!(strip_punctuation("a\tb\nc"), "abc");
    }

    #[test]
    fn line_breaks_join_words() {
        let normalizer = LexicalNormalizer::new(Arc::new(PassthroughLemmatizer));
        let tokens = normalizer.normalize("value\nis\tnegative", &StopwordSet::default());
        assert_eq!(tokens, vec!["valueisnegative"]);
    }

    #[test]
    fn normalize_comment() {
        let normalizer = LexicalNormalizer::new(Arc::new(RuleLemmatizer::new()));
        let tokens = normalizer.normalize("if the elements are null", &stopwords());
        assert_eq!(tokens, vec!["element"]);

        let tokens = normalizer.normalize("the stack is empty.", &stopwords());
        assert_eq!(tokens, vec!["stack", "empty"]);
    }

    #[test]
    fn identifier_keeps_stopwords() {
        let normalizer = LexicalNormalizer::new(Arc::new(RuleLemmatizer::new()));
        assert_eq!(normalizer.split_identifier("isEmpty"), vec!["be", "empty"]);
        assert_eq!(
            stopwords().remove_from(normalizer.split_identifier("isEmpty")),
            vec!["empty"]
        );
    }

    #[test]
    fn lemmatizer_failure_keeps_tokens() {
        let normalizer = LexicalNormalizer::new(Arc::new(FailingLemmatizer));
        assert_eq!(
            normalizer.lemmatized_tokens("Items Are Sorted"),
            vec!["items", "are", "sorted"]
        );
    }

    #[test]
    fn fewer_lemmas_than_tokens_keep_tail() {
        let normalizer = LexicalNormalizer::new(Arc::new(MergingLemmatizer));
        assert_eq!(
            normalizer.lemmatized_tokens("one two three"),
            vec!["merged", "two", "three"]
        );
    }

    #[test]
    fn surplus_lemmas_are_appended() {
        let tokens = substitute_lemmas(
            vec!["cannot".to_string()],
            vec!["can".to_string(), "not".to_string()],
        );
        assert_eq!(tokens, vec!["can", "not"]);
    }

    #[test]
    fn stopwords_are_case_insensitive_and_grow() {
        let set = stopwords();
        assert!(set.contains("The"));
        assert!(!set.contains("stack"));
        assert!(set.insert("Stack"));
        assert!(!set.insert("stack"));
        assert!(set.contains("STACK"));
        assert_eq!(set.len(), MatcherConfig::default().base_stopwords.len() + 1);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        let normalizer = LexicalNormalizer::new(Arc::new(PassthroughLemmatizer));
        assert!(normalizer.normalize("  ,;  ", &stopwords()).is_empty());
    }
}
