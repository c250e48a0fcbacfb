//! # Audit Patterns Module
//!
//! This module contains the regex patterns used by the normalizer, the
//! substitution extractor and the image check.

use lazy_static::lazy_static;
use regex::Regex;

// "use X instead of Y", "substitute X for Y"
pub const USE_INSTEAD_PATTERN: &str = r"(?i)\b(?:use|using|substitute|swap|replace)\s+([\p{Alphabetic}\s-]+?)\s+(?:instead\s+of|for)\s+([\p{Alphabetic}\s-]+?)(?:\s|,|\.|;|$)";

// "X instead of Y"
pub const INSTEAD_OF_PATTERN: &str =
    r"(?i)\b([\p{Alphabetic}\s-]+?)\s+instead\s+of\s+([\p{Alphabetic}\s-]+?)(?:\s|,|\.|;|$)";

// "replace Y with X"
pub const REPLACE_WITH_PATTERN: &str =
    r"(?i)\breplace\s+([\p{Alphabetic}\s-]+?)\s+with\s+([\p{Alphabetic}\s-]+?)(?:\s|,|\.|;|$)";

// Integers, decimals and simple fractions ("2", "1.5", "1/2")
pub const QUANTITY_PATTERN: &str = r"\d+(?:\.\d+)?(?:/\d+)?";

pub const UNIT_PATTERN: &str = r"(?i)\b(?:cup|tbsp|tsp|oz|lb|gram|ml|kg)s?\b";

// Whole words, accented letters included, so "jalapeño" is never cut short
pub const ALPHA_RUN_PATTERN: &str = r"\p{Alphabetic}+";

// Auto-generated image names such as "image_1700000000_2"
pub const GENERIC_IMAGE_NAME_PATTERN: &str = r"^image_[0-9_]*[0-9][0-9_]*$";

lazy_static! {
    pub static ref USE_INSTEAD_REGEX: Regex =
        Regex::new(USE_INSTEAD_PATTERN).expect("Use-instead pattern should be valid");
    pub static ref INSTEAD_OF_REGEX: Regex =
        Regex::new(INSTEAD_OF_PATTERN).expect("Instead-of pattern should be valid");
    pub static ref REPLACE_WITH_REGEX: Regex =
        Regex::new(REPLACE_WITH_PATTERN).expect("Replace-with pattern should be valid");
    pub static ref QUANTITY_REGEX: Regex =
        Regex::new(QUANTITY_PATTERN).expect("Quantity pattern should be valid");
    pub static ref UNIT_REGEX: Regex = Regex::new(UNIT_PATTERN).expect("Unit pattern should be valid");
    pub static ref ALPHA_RUN_REGEX: Regex =
        Regex::new(ALPHA_RUN_PATTERN).expect("Alphabetic run pattern should be valid");
    pub static ref GENERIC_IMAGE_NAME_REGEX: Regex = Regex::new(GENERIC_IMAGE_NAME_PATTERN)
        .expect("Generic image name pattern should be valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_image_names() {
        assert!(GENERIC_IMAGE_NAME_REGEX.is_match("image_1700000000"));
        assert!(GENERIC_IMAGE_NAME_REGEX.is_match("image_1700000000_2"));
        assert!(!GENERIC_IMAGE_NAME_REGEX.is_match("image_"));
        assert!(!GENERIC_IMAGE_NAME_REGEX.is_match("image___"));
        assert!(!GENERIC_IMAGE_NAME_REGEX.is_match("image_salad"));
        assert!(!GENERIC_IMAGE_NAME_REGEX.is_match("potato_salad"));
    }

    #[test]
    fn test_unit_pattern_respects_word_boundaries() {
        assert_eq!(UNIT_REGEX.replace_all("2 Cups flour", ""), "2  flour");
        assert_eq!(UNIT_REGEX.replace_all("cupboard", ""), "cupboard");
        assert_eq!(UNIT_REGEX.replace_all("3 tbsp oil", ""), "3  oil");
    }

    #[test]
    fn test_quantity_pattern() {
        assert_eq!(QUANTITY_REGEX.replace_all("1/2 cup and 2.5 kg", ""), " cup and  kg");
    }

    #[test]
    fn test_use_instead_captures() {
        let caps = USE_INSTEAD_REGEX
            .captures("use monk fruit extract instead of sugar")
            .unwrap();
        assert_eq!(&caps[1], "monk fruit extract");
        assert_eq!(&caps[2], "sugar");
    }

    #[test]
    fn test_alpha_runs_keep_accented_words_whole() {
        let runs: Vec<&str> = ALPHA_RUN_REGEX
            .find_iter("jalapeño purée_2x")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(runs, vec!["jalapeño", "purée", "x"]);
    }

    #[test]
    fn test_use_instead_captures_accented_words() {
        let caps = USE_INSTEAD_REGEX
            .captures("use crème fraîche instead of cream.")
            .unwrap();
        assert_eq!(&caps[1], "crème fraîche");
        assert_eq!(&caps[2], "cream");
    }

    #[test]
    fn test_replace_with_captures() {
        let caps = REPLACE_WITH_REGEX
            .captures("replace rice with cauliflower.")
            .unwrap();
        assert_eq!(&caps[1], "rice");
        assert_eq!(&caps[2], "cauliflower");
    }
}
