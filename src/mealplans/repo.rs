use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::shopping::model::PlanDay;

/// A stored meal plan. `days` stays an untyped JSON value on the row so
/// malformed structure surfaces as `InvalidInput` at the point of use,
/// not as a decode failure deep inside sqlx.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub days: serde_json::Value,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, title, days, created_at, updated_at";

impl MealPlan {
    /// Validate the day/meal structure at the boundary.
    pub fn parsed_days(&self) -> Result<Vec<PlanDay>, AppError> {
        serde_json::from_value(self.days.clone())
            .map_err(|e| AppError::InvalidInput(format!("malformed meal plan structure: {e}")))
    }

    pub async fn find_for_user(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM meal_plans
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn update_days(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        title: Option<&str>,
        days: &serde_json::Value,
    ) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(&format!(
            r#"
            UPDATE meal_plans
            SET days = $3, title = COALESCE($4, title), updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(plan_id)
        .bind(user_id)
        .bind(days)
        .bind(title)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
