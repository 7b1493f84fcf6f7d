use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::ShoppingList;

#[derive(Debug, Deserialize)]
pub struct GenerateListBody {
    pub meal_plan_id: Uuid,
}

/// Direct item submission: each entry is free text, parsed with the same
/// heuristic as meal summaries ("2 cups flour" or just "flour").
#[derive(Debug, Deserialize)]
pub struct CreateListBody {
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleItemBody {
    pub checked: bool,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListSummary {
    pub id: Uuid,
    pub meal_plan_id: Option<Uuid>,
    pub item_count: usize,
    pub total_cost: Option<f64>,
    pub is_completed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<ShoppingList> for ShoppingListSummary {
    fn from(list: ShoppingList) -> Self {
        Self {
            id: list.id,
            meal_plan_id: list.meal_plan_id,
            item_count: list.items.0.len(),
            total_cost: list.total_cost,
            is_completed: list.is_completed,
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}
