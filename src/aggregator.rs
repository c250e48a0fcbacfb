//! # Finding Aggregator
//!
//! Runs every consistency check against a recipe, in a fixed order, and
//! stamps the results with recipe metadata and the audit timestamp.

use crate::audit_config::AuditConfig;
use crate::canonical_tables::CanonicalTables;
use crate::consistency_checks::{
    check_critical_substitutions, check_description_ingredients, check_image_recipe,
    check_ingredients_instructions,
};
use crate::recipe_model::{AuditedFinding, Finding, Recipe};
use crate::substitution_extractor::{PatternSubstitutionExtractor, SubstitutionExtractor};
use crate::text_processing::IngredientNormalizer;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Audits recipes against one table set and configuration
///
/// # Examples
///
/// ```rust
/// use recipe_audit::aggregator::RecipeAuditor;
/// use recipe_audit::audit_config::AuditConfig;
/// use recipe_audit::canonical_tables::CanonicalTables;
/// use recipe_audit::recipe_model::{IssueCode, Recipe};
///
/// let auditor = RecipeAuditor::new(CanonicalTables::standard(), AuditConfig::default());
/// let recipe = Recipe::new("1", "Untitled");
/// let findings = auditor.run_checks(&recipe);
/// assert_eq!(findings.len(), 1);
/// assert_eq!(findings[0].code, IssueCode::ImgMissing);
/// ```
pub struct RecipeAuditor<'t, E = PatternSubstitutionExtractor<'t>> {
    normalizer: IngredientNormalizer<'t>,
    extractor: E,
    config: AuditConfig,
}

impl<'t> RecipeAuditor<'t> {
    /// Create an auditor using the regex substitution extractor
    pub fn new(tables: &'t CanonicalTables, config: AuditConfig) -> Self {
        Self::with_extractor(tables, config, PatternSubstitutionExtractor::new(tables))
    }
}

impl<'t, E: SubstitutionExtractor> RecipeAuditor<'t, E> {
    pub fn with_extractor(tables: &'t CanonicalTables, config: AuditConfig, extractor: E) -> Self {
        Self {
            normalizer: IngredientNormalizer::new(tables),
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run the four checks and concatenate their findings, without deduplication
    pub fn run_checks(&self, recipe: &Recipe) -> Vec<Finding> {
        let mut findings = check_description_ingredients(recipe, &self.normalizer, &self.extractor);
        findings.extend(check_ingredients_instructions(
            recipe,
            &self.normalizer,
            &self.config,
        ));
        findings.extend(check_image_recipe(recipe, &self.normalizer));
        findings.extend(check_critical_substitutions(
            recipe,
            &self.normalizer,
            &self.config,
        ));

        debug!(
            "Recipe {} ('{}') produced {} findings",
            recipe.id,
            recipe.name,
            findings.len()
        );
        findings
    }

    /// Run all checks and attach recipe metadata and the given timestamp
    pub fn audit_recipe(&self, recipe: &Recipe, audited_at: DateTime<Utc>) -> Vec<AuditedFinding> {
        self.run_checks(recipe)
            .into_iter()
            .map(|finding| AuditedFinding::new(recipe, finding, audited_at))
            .collect()
    }

    /// Audit every recipe in order, stamping each with the time its checks ran
    pub fn audit_recipes(&self, recipes: &[Recipe]) -> Vec<AuditedFinding> {
        let findings: Vec<AuditedFinding> = recipes
            .iter()
            .flat_map(|recipe| self.audit_recipe(recipe, Utc::now()))
            .collect();

        info!(
            "Audited {} recipes, {} findings",
            recipes.len(),
            findings.len()
        );
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::IssueCode;
    use crate::substitution_extractor::SubstitutionClaim;

    struct FixedExtractor(Vec<SubstitutionClaim>);

    impl SubstitutionExtractor for FixedExtractor {
        fn extract_substitutions(&self, _description: &str) -> Vec<SubstitutionClaim> {
            self.0.clone()
        }
    }

    #[test]
    fn test_checks_run_in_fixed_order() {
        let auditor = RecipeAuditor::new(CanonicalTables::standard(), AuditConfig::default());
        let recipe = Recipe::new("9", "Loaded Potato")
            .with_description("Use cauliflower instead of potato.")
            .with_ingredients(&["1 potato"])
            .with_instructions("Boil the potatoes with rice.");

        let codes: Vec<IssueCode> = auditor.run_checks(&recipe).iter().map(|f| f.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::DescSubConflict,
                IssueCode::StepGhostIng,
                IssueCode::ImgMissing,
                IssueCode::ForbiddenIngredient,
            ]
        );
    }

    #[test]
    fn test_custom_extractor_is_used() {
        let extractor = FixedExtractor(vec![SubstitutionClaim::new("cauliflower", "rice")]);
        let auditor = RecipeAuditor::with_extractor(
            CanonicalTables::standard(),
            AuditConfig::default(),
            extractor,
        );
        let recipe = Recipe::new("3", "Fried Rice")
            .with_description("anything")
            .with_ingredients(&["1 cup rice"])
            .with_image_url("fried_rice.jpg");

        let findings = auditor.run_checks(&recipe);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, IssueCode::DescSubConflict);
    }

    #[test]
    fn test_audit_recipe_stamps_metadata() {
        let auditor = RecipeAuditor::new(CanonicalTables::standard(), AuditConfig::default());
        let recipe = Recipe::new("5", "Green Bowl").with_category("lunch");
        let at = Utc::now();

        let findings = auditor.audit_recipe(&recipe, at);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].recipe_id, "5");
        assert_eq!(findings[0].title, "Green Bowl");
        assert_eq!(findings[0].category, "lunch");
        assert_eq!(findings[0].updated_at, at);
    }
}
