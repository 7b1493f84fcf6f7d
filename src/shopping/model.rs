use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One parsed mention of an ingredient from one meal. Created transiently
/// during parsing and consumed by the aggregator; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIngredient {
    pub name: String,
    /// Defaults to 1 when no quantity could be extracted.
    pub quantity: f64,
    /// Empty string means "count".
    pub unit: String,
}

impl RawIngredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

/// The persisted, user-facing shopping list line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSource {
    Catalog,
    UserRecipe,
    Ai,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMeal {
    #[serde(default)]
    pub name: Option<String>,
    pub source: MealSource,
    #[serde(default)]
    pub recipe_catalog_id: Option<Uuid>,
    #[serde(default)]
    pub user_recipe_id: Option<Uuid>,
    #[serde(default)]
    pub ingredients_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDay {
    pub meals: Vec<PlanMeal>,
}

/// Structured ingredient row as stored on catalog and user recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}
