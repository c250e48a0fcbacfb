//! # Text Processing Module
//!
//! This module turns free-form recipe text into sets of canonical ingredient
//! names that the consistency checks can compare.
//!
//! ## Pipeline
//!
//! Tokenization is deliberately two-phase:
//!
//! 1. [`candidate_phrases`] finds alphabetic runs of three or more letters and
//!    emits every 1, 2 and 3 word window over consecutive runs, so both
//!    "sweet potato" and "potato" are candidates from the same text.
//! 2. [`IngredientNormalizer::resolve_candidates`] drops stopwords, short
//!    tokens and function words, resolves aliases and discards anything whose
//!    canonical form is itself ignored.
//!
//! Ingredient lists get extra treatment in
//! [`IngredientNormalizer::extract_ingredient_names`]: forbidden terms are
//! picked up from the raw line before quantities and units are stripped.

use crate::audit_patterns::{ALPHA_RUN_REGEX, QUANTITY_REGEX, UNIT_REGEX};
use crate::canonical_tables::CanonicalTables;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Longest candidate window, in words
pub const MAX_WINDOW_WORDS: usize = 3;

/// Shortest alphabetic run or phrase considered an ingredient candidate
pub const MIN_TOKEN_LEN: usize = 3;

/// An overlapping candidate phrase produced by the first tokenization phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePhrase {
    /// The phrase text, words joined by single spaces
    pub text: String,
    /// Index of the whitespace-separated chain of runs the phrase came from
    pub chain: usize,
    /// Position of the first word within its chain
    pub start: usize,
    /// Number of words in the phrase
    pub len: usize,
}

impl CandidatePhrase {
    /// True when `other` lies strictly inside this phrase's span
    fn covers(&self, other: &CandidatePhrase) -> bool {
        self.chain == other.chain
            && other.len < self.len
            && other.start >= self.start
            && other.start + other.len <= self.start + self.len
    }
}

/// A word-boundary hit of a forbidden term in lowercased text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenMatch {
    pub category: &'static str,
    pub term: &'static str,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset one past the match end
    pub end: usize,
}

/// Lowercase and trim free text
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Generate overlapping 1-3 word candidate phrases from text
///
/// Runs shorter than three letters, and any separator other than whitespace,
/// break the chain of consecutive runs.
pub fn candidate_phrases(text: &str) -> Vec<CandidatePhrase> {
    let normalized = normalize_text(text);
    let mut chains: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut last_end = 0;

    for run in ALPHA_RUN_REGEX.find_iter(&normalized) {
        let gap = &normalized[last_end..run.start()];
        let joined = !gap.is_empty() && gap.chars().all(char::is_whitespace);
        if !joined && !current.is_empty() {
            chains.push(std::mem::take(&mut current));
        }
        if run.as_str().chars().count() >= MIN_TOKEN_LEN {
            current.push(run.as_str());
        } else if !current.is_empty() {
            chains.push(std::mem::take(&mut current));
        }
        last_end = run.end();
    }
    if !current.is_empty() {
        chains.push(current);
    }

    let mut candidates = Vec::new();
    for (chain_index, words) in chains.iter().enumerate() {
        for start in 0..words.len() {
            for len in 1..=MAX_WINDOW_WORDS {
                if start + len > words.len() {
                    break;
                }
                candidates.push(CandidatePhrase {
                    text: words[start..start + len].join(" "),
                    chain: chain_index,
                    start,
                    len,
                });
            }
        }
    }

    trace!(
        "Generated {} candidate phrases from {} chains",
        candidates.len(),
        chains.len()
    );
    candidates
}

/// Maps recipe text onto canonical ingredient names using the shared tables
#[derive(Debug, Clone, Copy)]
pub struct IngredientNormalizer<'t> {
    tables: &'t CanonicalTables,
}

impl<'t> IngredientNormalizer<'t> {
    pub fn new(tables: &'t CanonicalTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'t CanonicalTables {
        self.tables
    }

    /// Check if a word or phrase is likely a food ingredient rather than descriptive text
    pub fn is_food_ingredient(&self, phrase: &str) -> bool {
        !self.tables.is_ignored(phrase)
            && phrase.chars().count() >= MIN_TOKEN_LEN
            && !self.tables.is_function_word(phrase)
    }

    /// Second tokenization phase: filter candidates and resolve them to canonical names
    ///
    /// A multi-word candidate that is an alias variant suppresses the shorter
    /// candidates inside it, so "garbanzo beans" yields only "chickpea".
    pub fn resolve_candidates(&self, candidates: &[CandidatePhrase]) -> BTreeSet<String> {
        let survivors: Vec<(&CandidatePhrase, &str)> = candidates
            .iter()
            .filter(|candidate| self.is_food_ingredient(&candidate.text))
            .map(|candidate| (candidate, self.tables.resolve_alias(&candidate.text)))
            .filter(|(_, canonical)| !self.tables.is_ignored(canonical))
            .collect();

        let variant_spans: Vec<&CandidatePhrase> = survivors
            .iter()
            .filter(|(candidate, _)| {
                candidate.len > 1 && self.tables.is_alias_variant(&candidate.text)
            })
            .map(|(candidate, _)| *candidate)
            .collect();

        survivors
            .into_iter()
            .filter(|(candidate, _)| !variant_spans.iter().any(|span| span.covers(candidate)))
            .map(|(_, canonical)| canonical.to_string())
            .collect()
    }

    /// Extract canonical ingredient names mentioned anywhere in free text
    pub fn tokenize(&self, text: &str) -> BTreeSet<String> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }
        self.resolve_candidates(&candidate_phrases(text))
    }

    /// Find every word-boundary occurrence of a forbidden term in lowercased text
    pub fn find_forbidden_terms(&self, lowercase_text: &str) -> Vec<ForbiddenMatch> {
        self.tables
            .forbidden_terms()
            .iter()
            .flat_map(|forbidden| {
                forbidden
                    .pattern
                    .find_iter(lowercase_text)
                    .map(move |m| ForbiddenMatch {
                        category: forbidden.category,
                        term: forbidden.term,
                        start: m.start(),
                        end: m.end(),
                    })
            })
            .collect()
    }

    /// Extract canonical ingredient names from an ingredient list
    ///
    /// Forbidden terms found in the raw line are always kept, even when the
    /// general tokenizer would filter them out (e.g. "sugar" is an ignore word).
    pub fn extract_ingredient_names(&self, lines: &[String]) -> BTreeSet<String> {
        let mut names = BTreeSet::new();

        for line in lines.iter().filter(|line| !line.trim().is_empty()) {
            let lowered = normalize_text(line);
            for hit in self.find_forbidden_terms(&lowered) {
                names.insert(hit.term.to_string());
            }

            let without_quantities = QUANTITY_REGEX.replace_all(line, "");
            let without_units = UNIT_REGEX.replace_all(&without_quantities, "");
            names.extend(self.tokenize(&without_units));
        }

        debug!(
            "Extracted {} ingredient names from {} lines",
            names.len(),
            lines.len()
        );
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> IngredientNormalizer<'static> {
        IngredientNormalizer::new(CanonicalTables::standard())
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_candidate_windows_overlap() {
        let texts: Vec<String> = candidate_phrases("Sweet Potato mash")
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(
            texts,
            vec![
                "sweet",
                "sweet potato",
                "sweet potato mash",
                "potato",
                "potato mash",
                "mash"
            ]
        );
    }

    #[test]
    fn test_short_words_and_punctuation_break_chains() {
        let candidates = candidate_phrases("rice, to the pot");
        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["rice", "the", "the pot", "pot"]);
        assert_eq!(candidates[0].chain, 0);
        assert_eq!(candidates[1].chain, 1);
    }

    #[test]
    fn test_accented_words_are_single_candidates() {
        let texts: Vec<String> = candidate_phrases("Jalapeño purée")
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["jalapeño", "jalapeño purée", "purée"]);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(candidate_phrases("").is_empty());
        assert!(normalizer().tokenize("   ").is_empty());
    }

    #[test]
    fn test_is_food_ingredient() {
        let n = normalizer();
        assert!(n.is_food_ingredient("cauliflower"));
        assert!(!n.is_food_ingredient("salt"));
        assert!(!n.is_food_ingredient("add"));
        assert!(!n.is_food_ingredient("ab"));
    }

    #[test]
    fn test_tokenize_filters_and_resolves() {
        let tokens = normalizer().tokenize("Add the courgette");
        assert!(tokens.contains("zucchini"));
        assert!(!tokens.contains("add"));
        assert!(!tokens.contains("the"));
        assert!(!tokens.contains("courgette"));
    }

    #[test]
    fn test_variant_window_suppresses_inner_words() {
        assert_eq!(normalizer().tokenize("garbanzo beans"), names(&["chickpea"]));
        assert_eq!(normalizer().tokenize("green onions"), names(&["scallion"]));
    }

    #[test]
    fn test_canonical_phrase_keeps_inner_words() {
        let tokens = normalizer().tokenize("sweet potato");
        assert!(tokens.contains("sweet potato"));
        assert!(tokens.contains("potato"));
    }

    #[test]
    fn test_find_forbidden_terms_word_boundary() {
        let n = normalizer();
        let hits = n.find_forbidden_terms("rolled oats and a bread roll");
        let terms: Vec<&str> = hits.iter().map(|h| h.term).collect();
        assert!(terms.contains(&"roll"));
        assert!(terms.contains(&"bread"));
        assert_eq!(terms.iter().filter(|t| **t == "roll").count(), 1);
    }

    #[test]
    fn test_extract_ingredient_names_keeps_forbidden_terms() {
        let lines = vec!["1 cup Sugar".to_string(), "2 tbsp almond flour".to_string()];
        let extracted = normalizer().extract_ingredient_names(&lines);
        assert!(extracted.contains("sugar"));
        assert!(extracted.contains("almond flour"));
        assert!(!extracted.contains("cup"));
        assert!(!extracted.contains("tbsp"));
    }

    #[test]
    fn test_extract_ingredient_names_skips_blank_lines() {
        let lines = vec![String::new(), "   ".to_string()];
        assert!(normalizer().extract_ingredient_names(&lines).is_empty());
    }
}
