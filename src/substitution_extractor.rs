//! # Substitution Extractor
//!
//! Pulls claimed ingredient substitutions ("use X instead of Y") out of a
//! recipe description. Checks depend only on the [`SubstitutionExtractor`]
//! trait so the regex strategy below can be replaced without touching them.

use crate::audit_patterns::{INSTEAD_OF_REGEX, REPLACE_WITH_REGEX, USE_INSTEAD_REGEX};
use crate::canonical_tables::CanonicalTables;
use crate::text_processing::{normalize_text, MIN_TOKEN_LEN};
use regex::Regex;
use tracing::{debug, trace};

/// A claimed substitution: `new_item` replaces `old_item`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubstitutionClaim {
    pub new_item: String,
    pub old_item: String,
}

impl SubstitutionClaim {
    pub fn new(new_item: &str, old_item: &str) -> Self {
        Self {
            new_item: new_item.to_string(),
            old_item: old_item.to_string(),
        }
    }
}

pub trait SubstitutionExtractor {
    /// Extract (new, old) pairs in pattern order; duplicates across patterns are kept
    fn extract_substitutions(&self, description: &str) -> Vec<SubstitutionClaim>;
}

/// One phrase pattern and which capture group holds each side of the claim
struct ClaimPattern {
    regex: &'static Regex,
    new_group: usize,
    old_group: usize,
}

/// Regex-driven extractor over the three supported phrasings
#[derive(Debug, Clone, Copy)]
pub struct PatternSubstitutionExtractor<'t> {
    tables: &'t CanonicalTables,
}

impl<'t> PatternSubstitutionExtractor<'t> {
    pub fn new(tables: &'t CanonicalTables) -> Self {
        Self { tables }
    }

    fn patterns() -> [ClaimPattern; 3] {
        [
            ClaimPattern {
                regex: &USE_INSTEAD_REGEX,
                new_group: 1,
                old_group: 2,
            },
            ClaimPattern {
                regex: &INSTEAD_OF_REGEX,
                new_group: 1,
                old_group: 2,
            },
            ClaimPattern {
                regex: &REPLACE_WITH_REGEX,
                new_group: 2,
                old_group: 1,
            },
        ]
    }

    /// Drop function words and short words, rejoin, then resolve the alias
    ///
    /// Ignore-list words are kept here: "sugar" is an ignore word but a valid claim side.
    fn clean_side(&self, raw: &str) -> String {
        let words: Vec<&str> = raw
            .split_whitespace()
            .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
            .filter(|word| !self.tables.is_function_word(word))
            .collect();
        self.tables.resolve_alias(&words.join(" ")).to_string()
    }

    /// Loose admission filter: keeps a pair unless both sides are plain ignore words
    fn admits(&self, new_item: &str, old_item: &str) -> bool {
        self.tables.is_critical(new_item)
            || self.tables.is_critical(old_item)
            || !self.tables.is_ignored(new_item)
            || !self.tables.is_ignored(old_item)
    }
}

impl SubstitutionExtractor for PatternSubstitutionExtractor<'_> {
    fn extract_substitutions(&self, description: &str) -> Vec<SubstitutionClaim> {
        let text = normalize_text(description);
        if text.is_empty() {
            return Vec::new();
        }

        let mut claims = Vec::new();
        for pattern in Self::patterns() {
            for caps in pattern.regex.captures_iter(&text) {
                let (Some(new_raw), Some(old_raw)) =
                    (caps.get(pattern.new_group), caps.get(pattern.old_group))
                else {
                    continue;
                };

                let new_item = self.clean_side(new_raw.as_str());
                let old_item = self.clean_side(old_raw.as_str());
                if new_item.chars().count() < MIN_TOKEN_LEN
                    || old_item.chars().count() < MIN_TOKEN_LEN
                {
                    trace!(
                        "Discarding substitution with empty side: '{}' / '{}'",
                        new_raw.as_str(),
                        old_raw.as_str()
                    );
                    continue;
                }

                if self.admits(&new_item, &old_item) {
                    claims.push(SubstitutionClaim { new_item, old_item });
                }
            }
        }

        debug!("Extracted {} substitution claims", claims.len());
        claims
    }
}
