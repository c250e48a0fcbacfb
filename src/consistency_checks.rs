//! # Consistency Checks
//!
//! Four independent rule evaluators. Each takes a recipe plus the shared
//! normalizer and returns zero or more findings; none of them mutates the
//! recipe or keeps state between calls.

use crate::audit_config::AuditConfig;
use crate::audit_patterns::{ALPHA_RUN_REGEX, GENERIC_IMAGE_NAME_REGEX};
use crate::recipe_model::{Finding, IssueCode, Recipe};
use crate::substitution_extractor::SubstitutionExtractor;
use crate::text_processing::{normalize_text, IngredientNormalizer};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Description ↔ Ingredients: a claimed substitution the ingredient list contradicts
pub fn check_description_ingredients<E>(
    recipe: &Recipe,
    normalizer: &IngredientNormalizer<'_>,
    extractor: &E,
) -> Vec<Finding>
where
    E: SubstitutionExtractor + ?Sized,
{
    let mut findings = Vec::new();
    if recipe.description.trim().is_empty() {
        return findings;
    }

    let tables = normalizer.tables();
    let ingredient_names = normalizer.extract_ingredient_names(&recipe.ingredients);
    let mut seen = HashSet::new();

    for claim in extractor.extract_substitutions(&recipe.description) {
        if !seen.insert(claim.clone()) {
            continue;
        }
        if !tables.is_critical(&claim.new_item) && !tables.is_critical(&claim.old_item) {
            continue;
        }

        let has_new = ingredient_names.contains(&claim.new_item);
        let has_old = ingredient_names.contains(&claim.old_item);
        if has_old && !has_new {
            findings.push(Finding::new(
                IssueCode::DescSubConflict,
                "description+ingredients",
                &format!(
                    "Description says '{} instead of {}' but ingredients still contain '{}'",
                    claim.new_item, claim.old_item, claim.old_item
                ),
                &format!(
                    "Replace {} with {} in ingredients list",
                    claim.old_item, claim.new_item
                ),
            ));
        }
    }

    findings
}

/// Ingredients ↔ Instructions: ghost critical ingredients and unused ingredients
pub fn check_ingredients_instructions(
    recipe: &Recipe,
    normalizer: &IngredientNormalizer<'_>,
    config: &AuditConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let has_ingredients = recipe.ingredients.iter().any(|line| !line.trim().is_empty());
    if !has_ingredients || recipe.instructions.trim().is_empty() {
        return findings;
    }

    let tables = normalizer.tables();
    let ingredient_names = normalizer.extract_ingredient_names(&recipe.ingredients);
    let instruction_mentions = normalizer.tokenize(&recipe.instructions);

    let ghosts: Vec<&str> = instruction_mentions
        .difference(&ingredient_names)
        .map(String::as_str)
        .filter(|name| tables.is_critical(name))
        .collect();
    if !ghosts.is_empty() {
        let listed = ghosts.join(", ");
        findings.push(Finding::new(
            IssueCode::StepGhostIng,
            "instructions",
            &format!("Instructions mention '{listed}' not in ingredients"),
            &format!("Add {listed} to ingredients or remove from instructions"),
        ));
    }

    let unused: Vec<&str> = ingredient_names
        .difference(&instruction_mentions)
        .map(String::as_str)
        .filter(|name| !tables.is_ignored(name))
        .filter(|name| name.chars().count() > config.unused_min_name_len)
        .collect();
    if !unused.is_empty() && unused.len() <= config.unused_max_items {
        let listed = unused.join(", ");
        findings.push(Finding::new(
            IssueCode::IngUnused,
            "ingredients+instructions",
            &format!("Ingredients possibly not used in instructions: {listed}"),
            &format!("Verify {listed} is used in instructions or remove from ingredients"),
        ));
    } else if unused.len() > config.unused_max_items {
        trace!(
            "Suppressing {} unused ingredient names as normalizer noise",
            unused.len()
        );
    }

    findings
}

/// Split an image reference into its lowercased file name and the name without extension
///
/// Query strings and fragments are dropped first, so
/// `https://cdn/x/Potato_Salad.jpg?v=2` gives `("potato_salad.jpg", "potato_salad")`.
pub fn image_file_name(image_url: &str) -> (String, String) {
    let without_query = image_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let file_name = without_query
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.clone(),
    };
    (file_name, stem)
}

/// Image ↔ Recipe: missing image, auto-generated file name, filename/ingredient conflicts
pub fn check_image_recipe(recipe: &Recipe, normalizer: &IngredientNormalizer<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    if recipe.image_url.trim().is_empty() {
        findings.push(Finding::new(
            IssueCode::ImgMissing,
            "image",
            "No image URL",
            "Add image for recipe",
        ));
        return findings;
    }

    let (file_name, stem) = image_file_name(&recipe.image_url);
    if GENERIC_IMAGE_NAME_REGEX.is_match(&stem) {
        findings.push(Finding::new(
            IssueCode::ImgGenericName,
            "image",
            &format!("Generic image filename: {file_name}"),
            "Verify image matches recipe visually",
        ));
    }

    let ingredient_names = normalizer.extract_ingredient_names(&recipe.ingredients);
    let filename_words: HashSet<&str> = ALPHA_RUN_REGEX
        .find_iter(&stem)
        .map(|m| m.as_str())
        .collect();

    for conflict in normalizer.tables().image_conflicts() {
        let high_in_filename = conflict.high_gi.iter().any(|word| filename_words.contains(word));
        let high_in_ingredients = conflict
            .high_gi
            .iter()
            .any(|word| ingredient_names.contains(*word));
        let low_used: Vec<&str> = conflict
            .low_gi
            .iter()
            .copied()
            .filter(|word| ingredient_names.contains(*word))
            .collect();

        if high_in_filename && !low_used.is_empty() && !high_in_ingredients {
            let high = conflict.high_gi.join(", ");
            let low = low_used.join(", ");
            findings.push(Finding::new(
                IssueCode::ImgMetaMismatch,
                "image",
                &format!("Image filename suggests '{high}' but recipe uses '{low}'"),
                &format!("Replace image - should show {low} not {high}"),
            ));
        }
    }

    findings
}

/// Slice `radius` characters on each side of a byte range, respecting char boundaries
fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(index, _)| index);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(index, _)| end + index);
    &text[from..to]
}

/// Critical substitutions: forbidden high-GI terms in ingredients or instructions
///
/// Descriptions are never searched. Matches near a protected medical phrase
/// such as "blood sugar levels" are ignored.
pub fn check_critical_substitutions(
    recipe: &Recipe,
    normalizer: &IngredientNormalizer<'_>,
    config: &AuditConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let tables = normalizer.tables();
    let search_text = normalize_text(&format!(
        "{} {}",
        recipe.ingredients.join(" "),
        recipe.instructions
    ));
    let matches = normalizer.find_forbidden_terms(&search_text);

    for rule in tables.substitution_rules() {
        let mut found: Vec<&str> = Vec::new();
        for hit in matches.iter().filter(|hit| hit.category == rule.category) {
            let context = context_window(
                &search_text,
                hit.start,
                hit.end,
                config.protected_context_radius,
            );
            if tables
                .protected_contexts()
                .iter()
                .any(|phrase| context.contains(phrase))
            {
                trace!("Forbidden term '{}' in protected context", hit.term);
                continue;
            }
            if !found.contains(&hit.term) {
                found.push(hit.term);
            }
        }

        if found.is_empty() {
            continue;
        }

        let alternatives: Vec<&str> = rule
            .allowed
            .iter()
            .copied()
            .take(config.max_alternatives)
            .collect();
        findings.push(Finding::new(
            IssueCode::ForbiddenIngredient,
            &format!("ingredients+instructions ({})", rule.category),
            &format!(
                "Recipe contains forbidden {}: {}",
                rule.category,
                found.join(", ")
            ),
            &format!(
                "Replace with low-GI alternative: {}",
                alternatives.join(", ")
            ),
        ));
    }

    debug!(
        "Compliance check found {} forbidden categories for recipe {}",
        findings.len(),
        recipe.id
    );
    findings
}

/// Names of every check, in execution order
pub const CHECK_NAMES: [&str; 4] = [
    "Description ↔ Ingredients",
    "Ingredients ↔ Instructions",
    "Image ↔ Recipe content",
    "Critical substitutions (low-GI compliance)",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical_tables::CanonicalTables;

    fn normalizer() -> IngredientNormalizer<'static> {
        IngredientNormalizer::new(CanonicalTables::standard())
    }

    #[test]
    fn test_image_file_name_strips_path_query_and_extension() {
        assert_eq!(
            image_file_name("https://cdn.example.com/img/Potato_Salad.JPG?v=2#top"),
            ("potato_salad.jpg".to_string(), "potato_salad".to_string())
        );
        assert_eq!(
            image_file_name("C:\\images\\soup.png"),
            ("soup.png".to_string(), "soup".to_string())
        );
        assert_eq!(
            image_file_name("no_extension"),
            ("no_extension".to_string(), "no_extension".to_string())
        );
    }

    #[test]
    fn test_context_window_handles_multibyte_text() {
        let text = "sauté élan sugar crème brûlée";
        let start = text.find("sugar").unwrap();
        let window = context_window(text, start, start + 5, 3);
        assert_eq!(window, "an sugar cr");
    }

    #[test]
    fn test_context_window_clamps_at_edges() {
        let text = "sugar";
        assert_eq!(context_window(text, 0, 5, 50), "sugar");
    }

    #[test]
    fn test_generic_image_name() {
        let recipe = Recipe::new("1", "Soup")
            .with_image_url("/uploads/image_1712345678_1.png")
            .with_ingredients(&["1 cup lentils"]);
        let findings = check_image_recipe(&recipe, &normalizer());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, IssueCode::ImgGenericName);
        assert_eq!(
            findings[0].evidence,
            "Generic image filename: image_1712345678_1.png"
        );
    }

    #[test]
    fn test_unused_ingredients_are_capped() {
        let recipe = Recipe::new("1", "Big Salad")
            .with_ingredients(&[
                "1 head romaine",
                "1 cucumber",
                "2 radishes",
                "1 fennel bulb",
            ])
            .with_instructions("Toss everything.");
        let findings = check_ingredients_instructions(&recipe, &normalizer(), &AuditConfig::default());
        assert!(findings.iter().all(|f| f.code != IssueCode::IngUnused));
    }
}
