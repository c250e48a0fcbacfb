//! # Recipe and Finding Data Model
//!
//! This module defines the recipe record audited by the checks and the
//! findings they produce.
//!
//! ## Core Concepts
//!
//! - **Recipe**: A read-only record supplied by storage; absent fields are empty
//! - **Finding**: One inconsistency reported by a check (code, severity, evidence, fix)
//! - **AuditedFinding**: A finding stamped with recipe metadata and the audit time
//!
//! ## Usage
//!
//! ```rust
//! use recipe_audit::recipe_model::{Finding, IssueCode, Recipe, Severity};
//!
//! let recipe = Recipe::new("42", "Cauliflower Mash")
//!     .with_ingredients(&["2 cups cauliflower"])
//!     .with_image_url("cauliflower_mash.jpg");
//!
//! let finding = Finding::new(IssueCode::ImgMissing, "image", "No image URL", "Add image for recipe");
//! assert_eq!(finding.severity, Severity::P1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A recipe record as supplied by the storage layer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Recipe {
    /// Opaque unique key; numeric keys from table dumps are kept as text
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Free-text ingredient lines, in recipe order
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    /// Image URL or path
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
}

/// Treat an explicit `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a key written as a JSON string or number
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match Key::deserialize(deserializer)? {
        Key::Text(text) => text,
        Key::Unsigned(n) => n.to_string(),
        Key::Signed(n) => n.to_string(),
        Key::Float(n) => n.to_string(),
    })
}

/// Finding priority; `P0` sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Critical: contradicts the recipe or violates the low-GI policy
    P0,
    /// High: missing or probably stale content
    P1,
    /// Medium: worth a manual look
    P2,
}

/// Fixed set of issue codes emitted by the checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    DescSubConflict,
    StepGhostIng,
    IngUnused,
    ImgMissing,
    ImgGenericName,
    ImgMetaMismatch,
    ForbiddenIngredient,
}

/// A single inconsistency reported by a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub code: IssueCode,
    pub severity: Severity,
    /// Which recipe fields were involved (e.g. "description+ingredients")
    pub location: String,
    pub evidence: String,
    pub fix: String,
}

/// A finding with the recipe metadata attached by the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct AuditedFinding {
    pub recipe_id: String,
    pub title: String,
    pub category: String,
    pub finding: Finding,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a recipe with only its identity set
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_ingredients(mut self, ingredients: &[&str]) -> Self {
        self.ingredients = ingredients.iter().map(|line| line.to_string()).collect();
        self
    }

    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.instructions = instructions.to_string();
        self
    }

    pub fn with_image_url(mut self, image_url: &str) -> Self {
        self.image_url = image_url.to_string();
        self
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::P0 => "P0",
            Severity::P1 => "P1",
            Severity::P2 => "P2",
        }
    }
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::DescSubConflict => "DESC_SUB_CONFLICT",
            IssueCode::StepGhostIng => "STEP_GHOST_ING",
            IssueCode::IngUnused => "ING_UNUSED",
            IssueCode::ImgMissing => "IMG_MISSING",
            IssueCode::ImgGenericName => "IMG_GENERIC_NAME",
            IssueCode::ImgMetaMismatch => "IMG_META_MISMATCH",
            IssueCode::ForbiddenIngredient => "FORBIDDEN_INGREDIENT",
        }
    }

    /// The severity every finding with this code is reported at
    pub fn severity(&self) -> Severity {
        match self {
            IssueCode::DescSubConflict
            | IssueCode::StepGhostIng
            | IssueCode::ImgMetaMismatch
            | IssueCode::ForbiddenIngredient => Severity::P0,
            IssueCode::IngUnused | IssueCode::ImgMissing => Severity::P1,
            IssueCode::ImgGenericName => Severity::P2,
        }
    }
}

impl Finding {
    /// Create a finding at the code's standard severity
    pub fn new(code: IssueCode, location: &str, evidence: &str, fix: &str) -> Self {
        Self {
            code,
            severity: code.severity(),
            location: location.to_string(),
            evidence: evidence.to_string(),
            fix: fix.to_string(),
        }
    }
}

impl AuditedFinding {
    pub fn new(recipe: &Recipe, finding: Finding, updated_at: DateTime<Utc>) -> Self {
        Self {
            recipe_id: recipe.id.clone(),
            title: recipe.name.clone(),
            category: recipe.category.clone(),
            finding,
            updated_at,
        }
    }

    pub fn severity(&self) -> Severity {
        self.finding.severity
    }

    pub fn code(&self) -> IssueCode {
        self.finding.code
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity, self.code, self.location, self.evidence
        )
    }
}
