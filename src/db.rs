//! Read-only access to recipe records.
//!
//! Recipes come either from the `meals` table in PostgreSQL or from a JSON
//! export with the same fields. Nothing here writes.

use crate::audit_errors::AuditError;
use crate::recipe_model::Recipe;
use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::path::Path;
use tracing::info;

const FETCH_RECIPES_SQL: &str = "SELECT id::text AS id, name, description, category::text AS category, \
     ingredients, instructions, image_url FROM meals ORDER BY name";

/// A `meals` row; every column but the key and name may be NULL
#[derive(Debug, sqlx::FromRow)]
struct MealRow {
    id: String,
    name: String,
    description: Option<String>,
    category: Option<String>,
    ingredients: Option<Vec<String>>,
    instructions: Option<String>,
    image_url: Option<String>,
}

impl From<MealRow> for Recipe {
    fn from(row: MealRow) -> Self {
        Recipe {
            id: row.id,
            name: row.name,
            category: row.category.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            ingredients: row.ingredients.unwrap_or_default(),
            instructions: row.instructions.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
        }
    }
}

/// Open a small connection pool; the audit issues a single query
pub async fn connect(database_url: &str) -> Result<PgPool> {
    info!("Connecting to recipe database");
    PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await
        .context("Failed to connect to recipe database")
}

/// Fetch every recipe ordered by name
pub async fn fetch_recipes(pool: &PgPool) -> Result<Vec<Recipe>> {
    info!("Fetching recipes from database...");

    let rows: Vec<MealRow> = sqlx::query_as(FETCH_RECIPES_SQL)
        .fetch_all(pool)
        .await
        .map_err(|e| AuditError::Storage(e.to_string()))
        .context("Failed to fetch recipes from meals table")?;

    let recipes: Vec<Recipe> = rows.into_iter().map(Recipe::from).collect();
    info!("Found {} recipes", recipes.len());
    Ok(recipes)
}

/// Parse recipes from a JSON array of records
pub fn parse_recipes_json(json: &str) -> Result<Vec<Recipe>, AuditError> {
    Ok(serde_json::from_str(json)?)
}

/// Load recipes from a JSON export file
pub fn load_recipes_file(path: &Path) -> Result<Vec<Recipe>> {
    info!("Loading recipes from {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe file '{}'", path.display()))?;
    let recipes = parse_recipes_json(&content)
        .with_context(|| format!("Failed to parse recipe file '{}'", path.display()))?;

    info!("Found {} recipes", recipes.len());
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_meal_row_nulls_become_empty() {
        let row = MealRow {
            id: "abc".to_string(),
            name: "Herb Omelette".to_string(),
            description: None,
            category: Some("breakfast".to_string()),
            ingredients: None,
            instructions: None,
            image_url: None,
        };
        let recipe = Recipe::from(row);
        assert_eq!(recipe.id, "abc");
        assert_eq!(recipe.category, "breakfast");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.image_url.is_empty());
    }

    #[test]
    fn test_parse_recipes_json() -> Result<()> {
        let recipes = parse_recipes_json(
            r#"[
                {"id": "1", "name": "Lentil Soup", "ingredients": ["1 cup lentils"]},
                {"id": "2", "name": "Cauliflower Rice", "image_url": null}
            ]"#,
        )?;
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].ingredients, vec!["1 cup lentils".to_string()]);
        assert!(recipes[1].image_url.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_recipes_json_accepts_numeric_ids() -> Result<()> {
        let recipes = parse_recipes_json(
            r#"[{"id": 5, "name": "Chickpea Curry"}, {"id": "a-7", "name": "Dal"}]"#,
        )?;
        assert_eq!(recipes[0].id, "5");
        assert_eq!(recipes[1].id, "a-7");
        Ok(())
    }

    #[test]
    fn test_parse_recipes_json_requires_identity() {
        let err = parse_recipes_json(r#"[{"name": "No Id"}]"#).unwrap_err();
        assert!(matches!(err, AuditError::Storage(_)));
    }

    #[test]
    fn test_load_recipes_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"[{{"id": "1", "name": "Salmon Bowl"}}]"#)?;

        let recipes = load_recipes_file(file.path())?;
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Salmon Bowl");
        Ok(())
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_recipes_file(Path::new("/nonexistent/recipes.json")).is_err());
    }
}
