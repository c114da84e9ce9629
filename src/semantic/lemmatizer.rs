//! Lemmatization of comment text and identifier fragments.
//!
//! The matcher only depends on the [`Lemmatizer`] trait. [`RuleLemmatizer`] is
//! the built-in implementation: an irregular-form table plus suffix rules,
//! which is enough for the short, technical sentences found in API comments.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::core::errors::Result;

/// Produces base forms for the whitespace-separated words of a text.
pub trait Lemmatizer: Send + Sync {
    /// Lemmas of `text`, in order. Implementations may return more or fewer
    /// lemmas than `text` has words; callers align them by position.
    fn lemmatize(&self, text: &str) -> Result<Vec<String>>;
}

/// Returns every word unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughLemmatizer;

impl Lemmatizer for PassthroughLemmatizer {
    fn lemmatize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}

static IRREGULAR_FORMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("am", "be"),
        ("is", "be"),
        ("are", "be"),
        ("was", "be"),
        ("were", "be"),
        ("been", "be"),
        ("being", "be"),
        ("has", "have"),
        ("had", "have"),
        ("having", "have"),
        ("does", "do"),
        ("did", "do"),
        ("done", "do"),
        ("doing", "do"),
        ("goes", "go"),
        ("went", "go"),
        ("gone", "go"),
        ("an", "a"),
        ("made", "make"),
        ("got", "get"),
        ("gotten", "get"),
        ("gave", "give"),
        ("given", "give"),
        ("took", "take"),
        ("taken", "take"),
        ("threw", "throw"),
        ("thrown", "throw"),
        ("wrote", "write"),
        ("written", "write"),
        ("found", "find"),
        ("said", "say"),
        ("saw", "see"),
        ("seen", "see"),
        ("sent", "send"),
        ("built", "build"),
        ("kept", "keep"),
        ("lost", "lose"),
        ("held", "hold"),
        ("began", "begin"),
        ("begun", "begin"),
        ("chose", "choose"),
        ("chosen", "choose"),
        ("knew", "know"),
        ("known", "know"),
        ("shown", "show"),
        ("thought", "think"),
        ("told", "tell"),
        ("sold", "sell"),
        ("paid", "pay"),
        ("laid", "lay"),
        ("led", "lead"),
        ("children", "child"),
        ("people", "person"),
        ("men", "man"),
        ("women", "woman"),
        ("indices", "index"),
        ("matrices", "matrix"),
        ("vertices", "vertex"),
        ("criteria", "criterion"),
        ("analyses", "analysis"),
        ("caches", "cache"),
        ("agreed", "agree"),
        ("freed", "free"),
        ("guaranteed", "guarantee"),
    ]
    .into_iter()
    .collect()
});

static INVARIANT_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "always", "perhaps", "whereas", "series", "species", "news", "alias", "canvas", "bias",
        "atlas", "lens", "during", "nothing", "something", "anything", "everything", "string",
        "thing", "morning", "evening", "sibling", "embed", "shed", "hundred", "sacred", "naked",
    ]
    .into_iter()
    .collect()
});

/// Verb stems that regain a trailing `e` once `-ed`/`-ing` is removed.
static E_STEMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "us", "clos", "caus", "releas", "increas", "decreas", "rais", "pos", "compar", "declar",
        "prepar", "stor", "ignor", "stat", "writ", "tak", "mak", "giv", "nam", "typ", "tim",
        "sav", "delet", "complet", "compil", "chang", "arrang", "rang", "combin", "defin",
        "determin", "examin", "imagin", "outlin", "refin", "escap", "scop", "shap", "cop",
    ]
    .into_iter()
    .collect()
});

/// Endings after which a stripped verb stem regains a trailing `e`.
const E_ENDINGS: &[&str] = &[
    "at", "iz", "v", "uc", "ac", "nc", "rc", "ud", "od", "ut", "ir", "ur", "rs", "dg", "u",
];

/// Dictionary-free lemmatizer for English API prose.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleLemmatizer;

impl RuleLemmatizer {
    /// Create the lemmatizer.
    pub fn new() -> Self {
        Self
    }

    /// Base form of a single lowercase word.
    pub fn lemma(&self, word: &str) -> String {
        if let Some(base) = IRREGULAR_FORMS.get(word) {
            return (*base).to_string();
        }
        if word.len() <= 3
            || !word.chars().all(|c| c.is_ascii_alphabetic())
            || INVARIANT_WORDS.contains(word)
            || word.ends_with("eed")
        {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix("ies").filter(|s| s.len() >= 2) {
            return format!("{stem}y");
        }
        if let Some(stem) = word.strip_suffix("ied").filter(|s| s.len() >= 2) {
            return format!("{stem}y");
        }
        if let Some(stem) = word.strip_suffix("ing").filter(|s| is_verb_stem(s)) {
            return restore_stem(stem);
        }
        if let Some(stem) = word.strip_suffix("ed").filter(|s| is_verb_stem(s)) {
            return restore_stem(stem);
        }
        for ending in ["sses", "ches", "shes", "xes", "zzes"] {
            if word.ends_with(ending) {
                return word[..word.len() - 2].to_string();
            }
        }
        if word.ends_with('s') && !["ss", "us", "is"].iter().any(|end| word.ends_with(end)) {
            return word[..word.len() - 1].to_string();
        }

        word.to_string()
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .split_whitespace()
            .map(|word| self.lemma(&word.to_lowercase()))
            .collect())
    }
}

fn is_verb_stem(stem: &str) -> bool {
    stem.len() >= 2 && stem.chars().any(|c| "aeiouy".contains(c))
}

fn restore_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n > 3 && bytes[n - 1] == bytes[n - 2] && is_consonant(bytes[n - 1]) && !b"lsz".contains(&bytes[n - 1])
    {
        return stem[..n - 1].to_string();
    }

    if E_STEMS.contains(stem) || E_ENDINGS.iter().any(|end| stem.ends_with(end)) {
        return format!("{stem}e");
    }

    // provid-e, decid-e but not avoid
    if stem.ends_with("id") && !stem.ends_with("oid") {
        return format!("{stem}e");
    }

    // handl-e, sampl-e, toggl-e
    if n >= 2 && bytes[n - 1] == b'l' && is_consonant(bytes[n - 2]) && bytes[n - 2] != b'l' {
        return format!("{stem}e");
    }

    stem.to_string()
}

fn is_consonant(byte: u8) -> bool {
    byte.is_ascii_alphabetic() && !b"aeiou".contains(&byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str) -> String {
        RuleLemmatizer::new().lemma(word)
    }

    #[test]
    fn irregular_forms() {
        assert_eq!(lemma("is"), "be");
        assert_eq!(lemma("has"), "have");
        assert_eq!(lemma("thrown"), "throw");
        assert_eq!(lemma("an"), "a");
        assert_eq!(lemma("indices"), "index");
    }

    #[test]
    fn plural_nouns() {
        assert_eq!(lemma("elements"), "element");
        assert_eq!(lemma("entries"), "entry");
        assert_eq!(lemma("matches"), "match");
        assert_eq!(lemma("values"), "value");
        assert_eq!(lemma("status"), "status");
        assert_eq!(lemma("class"), "class");
        assert_eq!(lemma("analysis"), "analysis");
    }

    #[test]
    fn verb_inflections() {
        assert_eq!(lemma("created"), "create");
        assert_eq!(lemma("using"), "use");
        assert_eq!(lemma("used"), "use");
        assert_eq!(lemma("setting"), "set");
        assert_eq!(lemma("calling"), "call");
        assert_eq!(lemma("removed"), "remove");
        assert_eq!(lemma("provided"), "provide");
        assert_eq!(lemma("avoided"), "avoid");
        assert_eq!(lemma("specified"), "specify");
        assert_eq!(lemma("handled"), "handle");
        assert_eq!(lemma("contained"), "contain");
        assert_eq!(lemma("needed"), "need");
        assert_eq!(lemma("exceeded"), "exceed");
    }

    #[test]
    fn invariant_words() {
        for word in ["always", "string", "thing", "need", "exceed", "during", "embed"] {
            assert_eq!(lemma(word), word);
        }
    }

    #[test]
    fn lemmas_are_stable() {
        for word in [
            "elements", "created", "using", "entries", "values", "returns", "contains",
            "removed", "empty", "size", "capacity", "negative", "throws",
        ] {
            let once = lemma(word);
            assert_eq!(lemma(&once), once, "{word}");
        }
    }

    #[test]
    fn lemmatize_lowercases_and_keeps_positions() {
        let lemmas = RuleLemmatizer::new().lemmatize("The Stack IS empty").unwrap();
        assert_eq!(lemmas, vec!["the", "stack", "be", "empty"]);
    }

    #[test]
    fn passthrough_splits_on_whitespace() {
        let lemmas = PassthroughLemmatizer.lemmatize("  a   b ").unwrap();
        assert_eq!(lemmas, vec!["a", "b"]);
    }
}
