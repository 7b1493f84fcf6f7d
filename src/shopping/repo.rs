use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::ShoppingListItem;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShoppingList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_plan_id: Option<Uuid>,
    pub items: Json<Vec<ShoppingListItem>>,
    pub total_cost: Option<f64>,
    pub is_completed: bool,
    pub completed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, meal_plan_id, items, total_cost, is_completed, completed_at, created_at, updated_at";

impl ShoppingList {
    pub async fn find_for_user(
        db: &PgPool,
        user_id: Uuid,
        list_id: Uuid,
    ) -> anyhow::Result<Option<ShoppingList>> {
        let row = sqlx::query_as::<_, ShoppingList>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM shopping_lists
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<ShoppingList>> {
        let rows = sqlx::query_as::<_, ShoppingList>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM shopping_lists
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// One list per (user, plan): a single conditional write against the
    /// partial unique index. Regeneration replaces items and cost in place
    /// and resets completion state; last write wins under concurrency.
    pub async fn upsert_for_plan(
        db: &PgPool,
        user_id: Uuid,
        meal_plan_id: Uuid,
        items: &[ShoppingListItem],
        total_cost: Option<f64>,
    ) -> anyhow::Result<ShoppingList> {
        let row = sqlx::query_as::<_, ShoppingList>(&format!(
            r#"
            INSERT INTO shopping_lists (user_id, meal_plan_id, items, total_cost)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, meal_plan_id) WHERE meal_plan_id IS NOT NULL
            DO UPDATE SET
                items = EXCLUDED.items,
                total_cost = EXCLUDED.total_cost,
                is_completed = FALSE,
                completed_at = NULL,
                updated_at = now()
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(meal_plan_id)
        .bind(Json(items))
        .bind(total_cost)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Freestanding list (no owning meal plan) from direct item submission.
    pub async fn insert_freestanding(
        db: &PgPool,
        user_id: Uuid,
        items: &[ShoppingListItem],
        total_cost: Option<f64>,
    ) -> anyhow::Result<ShoppingList> {
        let row = sqlx::query_as::<_, ShoppingList>(&format!(
            r#"
            INSERT INTO shopping_lists (user_id, meal_plan_id, items, total_cost)
            VALUES ($1, NULL, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(items))
        .bind(total_cost)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Replace the item array and completion state after a toggle.
    pub async fn replace_items(
        db: &PgPool,
        list_id: Uuid,
        items: &[ShoppingListItem],
        is_completed: bool,
        completed_at: Option<OffsetDateTime>,
    ) -> anyhow::Result<ShoppingList> {
        let row = sqlx::query_as::<_, ShoppingList>(&format!(
            r#"
            UPDATE shopping_lists
            SET items = $2, is_completed = $3, completed_at = $4, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(list_id)
        .bind(Json(items))
        .bind(is_completed)
        .bind(completed_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}
