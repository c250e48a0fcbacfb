//! # Canonicalization Tables
//!
//! Fixed lookup data shared by every audit check: the ingredient alias map,
//! the ignore list, non-food function words, the critical high-GI set, the
//! low-GI substitution rules, protected medical phrases and the image
//! filename conflict pairs.
//!
//! The tables are built once per process (see [`CanonicalTables::standard`])
//! and only ever read afterwards.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// A low-GI dietary rule: forbidden high-GI items and their preferred replacements
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionRule {
    /// Category label used in findings (e.g. "sweetener")
    pub category: &'static str,
    /// Preferred replacements, most preferred first
    pub allowed: &'static [&'static str],
    /// Terms that must not appear in committed recipe content
    pub forbidden: &'static [&'static str],
}

/// A pair of word groups where a high-GI word in an image filename
/// conflicts with a low-GI ingredient actually used by the recipe
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConflict {
    pub high_gi: &'static [&'static str],
    pub low_gi: &'static [&'static str],
}

/// A forbidden term with its compiled word-boundary matcher
#[derive(Debug, Clone)]
pub struct ForbiddenTerm {
    pub category: &'static str,
    pub term: &'static str,
    pub pattern: Regex,
}

const SUBSTITUTION_RULES: &[SubstitutionRule] = &[
    SubstitutionRule {
        category: "sweetener",
        allowed: &["monk fruit extract", "100% monk fruit extract", "monk fruit"],
        forbidden: &[
            "sugar",
            "cane sugar",
            "brown sugar",
            "honey",
            "maple syrup",
            "agave",
            "agave nectar",
        ],
    },
    SubstitutionRule {
        category: "potato",
        allowed: &["sweet potato", "sweet potatoes"],
        forbidden: &[
            "potato",
            "white potato",
            "russet potato",
            "yukon gold",
            "red potato",
            "potatoes",
        ],
    },
    SubstitutionRule {
        category: "flour",
        allowed: &["almond flour", "oat flour", "coconut flour"],
        forbidden: &[
            "wheat flour",
            "white flour",
            "all-purpose flour",
            "bread flour",
            "all purpose flour",
        ],
    },
    SubstitutionRule {
        category: "bread",
        allowed: &["flatbread", "lentil flatbread", "almond flatbread", "oat flatbread"],
        forbidden: &[
            "bread", "bun", "buns", "roll", "rolls", "loaf", "loaves", "baguette", "bagel",
            "toast",
        ],
    },
];

// canonical name -> surface variants
const INGREDIENT_ALIASES: &[(&str, &[&str])] = &[
    ("zucchini", &["courgette", "zucchinis"]),
    ("potato", &["potatoes", "white potato"]),
    ("sweet potato", &["yam", "yams", "sweet potatoes", "sweetpotato"]),
    ("chickpea", &["garbanzo", "garbanzo beans", "chickpeas", "garbanzos"]),
    (
        "bell pepper",
        &[
            "capsicum",
            "red pepper",
            "green pepper",
            "yellow pepper",
            "bell peppers",
            "sweet pepper",
        ],
    ),
    (
        "scallion",
        &[
            "green onion",
            "spring onion",
            "scallions",
            "green onions",
            "spring onions",
        ],
    ),
    ("coriander", &["cilantro", "fresh cilantro", "coriander leaves"]),
    ("aubergine", &["eggplant"]),
    ("oatmeal", &["rolled oats", "porridge oats", "oats"]),
    ("quinoa", &["quinua"]),
    ("tomato", &["tomatoes"]),
    ("onion", &["onions"]),
    ("garlic", &["garlic cloves", "clove garlic", "garlic clove"]),
    ("olive oil", &["virgin olive oil", "evoo"]),
    ("chicken", &["chicken breast", "chicken breasts", "chicken thighs"]),
    ("salmon", &["salmon fillet", "salmon fillets"]),
    ("lemon", &["lemons", "lemon juice"]),
    ("lime", &["limes", "lime juice"]),
];

const IGNORE_ITEMS: &[&str] = &[
    // Staples not worth tracking
    "water", "salt", "pepper", "black pepper", "sea salt", "kosher salt", "oil", "cooking spray",
    // Descriptors and modifiers
    "fresh", "dried", "optional", "to taste", "chopped", "sliced", "ground", "organic", "raw",
    "cooked", "minced", "diced", "small", "medium", "large", "frozen", "canned",
    // Articles and prepositions
    "and", "or", "the", "a", "an", "in", "to", "for", "with", "on", "at", "from", "by",
    // Units
    "cup", "cups", "tablespoon", "tablespoons", "teaspoon", "teaspoons", "tbsp", "tsp", "oz",
    "lb", "lbs", "gram", "grams", "ml", "kg", "pinch", "dash", "handful", "slice", "slices",
    "piece", "pieces",
    // Health vocabulary
    "blood", "sugar", "glucose", "insulin", "diabetes", "glycemic", "carbohydrate",
    "carbohydrates", "protein", "fiber", "nutrients", "metabolism", "health", "healthy",
    "nutrition", "nutritional", "benefits", "compounds", "antioxidants", "vitamins", "minerals",
    // Cooking vocabulary
    "baking", "cooking", "roasting", "grilling", "sauteing", "boiling", "method", "methods",
    "technique", "techniques", "preparation",
    // Marketing adjectives
    "traditional", "classic", "authentic", "delicious", "perfect", "excellent", "superior",
    "optimal", "quality", "premium",
];

const FUNCTION_WORDS: &[&str] = &[
    "which", "while", "where", "when", "what", "that", "this", "these", "those", "them", "their",
    "there", "here", "have", "has", "had", "instead", "use", "using", "used", "substitute",
    "swap", "replace", "make", "makes", "made", "add", "adds", "serve", "serves", "serving",
    "cook", "cooks", "cooking", "provides", "supports", "reduces", "helps", "maintains",
];

const CRITICAL_INGREDIENTS: &[&str] = &[
    "potato",
    "potatoes",
    "rice",
    "pasta",
    "bread",
    "cream",
    "butter",
    "cheese",
    "sugar",
    "honey",
    "maple syrup",
];

const PROTECTED_CONTEXTS: &[&str] = &[
    "blood sugar",
    "blood sugar stabilization",
    "blood sugar levels",
    "blood sugar control",
    "blood sugar spike",
    "blood sugar management",
];

const IMAGE_CONFLICTS: &[ImageConflict] = &[
    ImageConflict {
        high_gi: &["potato", "potatoes"],
        low_gi: &["zucchini", "cauliflower"],
    },
    ImageConflict {
        high_gi: &["rice"],
        low_gi: &["cauliflower", "quinoa"],
    },
    ImageConflict {
        high_gi: &["pasta"],
        low_gi: &["zucchini", "spaghetti"],
    },
    ImageConflict {
        high_gi: &["bread"],
        low_gi: &["lettuce", "almond"],
    },
];

lazy_static! {
    static ref STANDARD_TABLES: CanonicalTables = CanonicalTables::build();
}

/// Immutable lookup tables consulted by the normalizer, the extractor and the checks
#[derive(Debug)]
pub struct CanonicalTables {
    aliases: HashMap<&'static str, &'static str>,
    ignore: HashSet<&'static str>,
    function_words: HashSet<&'static str>,
    critical: HashSet<&'static str>,
    forbidden_terms: Vec<ForbiddenTerm>,
}

impl CanonicalTables {
    /// The process-wide table set, built on first use
    pub fn standard() -> &'static CanonicalTables {
        &STANDARD_TABLES
    }

    fn build() -> Self {
        let mut aliases = HashMap::new();
        for (canonical, variants) in INGREDIENT_ALIASES {
            aliases.insert(*canonical, *canonical);
            for variant in *variants {
                aliases.insert(*variant, *canonical);
            }
        }

        let forbidden_terms = SUBSTITUTION_RULES
            .iter()
            .flat_map(|rule| {
                rule.forbidden.iter().map(move |term| ForbiddenTerm {
                    category: rule.category,
                    term: *term,
                    pattern: Regex::new(&format!(r"\b{}\b", regex::escape(term)))
                        .expect("Escaped forbidden term should be a valid pattern"),
                })
            })
            .collect();

        Self {
            aliases,
            ignore: IGNORE_ITEMS.iter().copied().collect(),
            function_words: FUNCTION_WORDS.iter().copied().collect(),
            critical: CRITICAL_INGREDIENTS.iter().copied().collect(),
            forbidden_terms,
        }
    }

    /// Single-hop alias lookup; unmapped phrases are their own canonical form
    pub fn resolve_alias<'p>(&self, phrase: &'p str) -> &'p str {
        self.aliases.get(phrase).copied().unwrap_or(phrase)
    }

    /// True when the phrase is a surface variant mapping onto a different canonical name
    pub fn is_alias_variant(&self, phrase: &str) -> bool {
        matches!(self.aliases.get(phrase), Some(canonical) if *canonical != phrase)
    }

    /// All (variant, canonical) pairs, canonical self-entries excluded
    pub fn alias_variants(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.aliases
            .iter()
            .filter(|(variant, canonical)| variant != canonical)
            .map(|(variant, canonical)| (*variant, *canonical))
    }

    pub fn is_ignored(&self, phrase: &str) -> bool {
        self.ignore.contains(phrase)
    }

    pub fn is_function_word(&self, word: &str) -> bool {
        self.function_words.contains(word)
    }

    pub fn is_critical(&self, name: &str) -> bool {
        self.critical.contains(name)
    }

    pub fn substitution_rules(&self) -> &'static [SubstitutionRule] {
        SUBSTITUTION_RULES
    }

    /// Forbidden terms of every category, in rule order
    pub fn forbidden_terms(&self) -> &[ForbiddenTerm] {
        &self.forbidden_terms
    }

    pub fn protected_contexts(&self) -> &'static [&'static str] {
        PROTECTED_CONTEXTS
    }

    pub fn image_conflicts(&self) -> &'static [ImageConflict] {
        IMAGE_CONFLICTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolution_is_single_hop() {
        let tables = CanonicalTables::standard();
        for (_, canonical) in tables.alias_variants() {
            assert_eq!(tables.resolve_alias(canonical), canonical);
        }
    }

    #[test]
    fn test_unmapped_phrase_is_its_own_canonical() {
        let tables = CanonicalTables::standard();
        assert_eq!(tables.resolve_alias("cauliflower"), "cauliflower");
        assert_eq!(tables.resolve_alias("courgette"), "zucchini");
        assert!(tables.is_alias_variant("courgette"));
        assert!(!tables.is_alias_variant("zucchini"));
    }

    #[test]
    fn test_forbidden_and_allowed_are_disjoint() {
        for rule in CanonicalTables::standard().substitution_rules() {
            for allowed in rule.allowed {
                assert!(
                    !rule.forbidden.contains(allowed),
                    "'{}' is both allowed and forbidden in {}",
                    allowed,
                    rule.category
                );
            }
        }
    }

    #[test]
    fn test_canonical_names_are_not_ignored() {
        let tables = CanonicalTables::standard();
        for (variant, canonical) in tables.alias_variants() {
            assert!(!tables.is_ignored(canonical), "{variant} -> {canonical}");
            assert!(variant.split_whitespace().count() <= 3, "{variant}");
        }
    }

    #[test]
    fn test_forbidden_terms_cover_every_rule() {
        let tables = CanonicalTables::standard();
        let expected: usize = tables
            .substitution_rules()
            .iter()
            .map(|rule| rule.forbidden.len())
            .sum();
        assert_eq!(tables.forbidden_terms().len(), expected);
    }
}
