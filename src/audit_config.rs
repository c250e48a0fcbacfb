//! # Audit Configuration Module
//!
//! Thresholds used by the checks and the console summary. The unused-ingredient
//! limits are empirically tuned noise filters; keep the defaults unless the
//! normalizer changes.
//!
//! "olive oil" is a tracked ingredient rather than an ignore word, so a recipe
//! that lists olive oil but only says "the oil" in its steps can be reported
//! as `ING_UNUSED`.

use crate::audit_errors::AuditError;

// Constants for audit configuration
pub const DEFAULT_UNUSED_MAX_ITEMS: usize = 3;
pub const DEFAULT_UNUSED_MIN_NAME_LEN: usize = 4; // names must be strictly longer
pub const DEFAULT_PROTECTED_CONTEXT_RADIUS: usize = 50; // chars on each side of a match
pub const DEFAULT_MAX_ALTERNATIVES: usize = 2;
pub const DEFAULT_SUMMARY_MAX_LISTED: usize = 15;
pub const DEFAULT_SUMMARY_MAX_GHOSTS: usize = 10;
pub const DEFAULT_REPORT_PATH: &str = "scripts/audit_reports/recipe_consistency_report.csv";

/// Tunable thresholds for an audit run
#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    /// Unused-ingredient findings are suppressed above this many names
    pub unused_max_items: usize,
    /// Ingredient names this short or shorter never count as unused
    pub unused_min_name_len: usize,
    /// Characters inspected on each side of a forbidden-term match
    pub protected_context_radius: usize,
    /// Allowed alternatives suggested per forbidden-ingredient finding
    pub max_alternatives: usize,
    /// Forbidden-ingredient findings listed in the console summary
    pub summary_max_listed: usize,
    /// Ghost-ingredient findings are listed only up to this count
    pub summary_max_ghosts: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            unused_max_items: DEFAULT_UNUSED_MAX_ITEMS,
            unused_min_name_len: DEFAULT_UNUSED_MIN_NAME_LEN,
            protected_context_radius: DEFAULT_PROTECTED_CONTEXT_RADIUS,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            summary_max_listed: DEFAULT_SUMMARY_MAX_LISTED,
            summary_max_ghosts: DEFAULT_SUMMARY_MAX_GHOSTS,
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration parameters
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.unused_max_items == 0 {
            return Err(AuditError::Config(
                "unused_max_items must be greater than 0".to_string(),
            ));
        }
        if self.unused_min_name_len == 0 {
            return Err(AuditError::Config(
                "unused_min_name_len must be greater than 0".to_string(),
            ));
        }
        if self.max_alternatives == 0 {
            return Err(AuditError::Config(
                "max_alternatives must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
