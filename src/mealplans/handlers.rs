use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cache::keys;
use crate::error::AppError;
use crate::shopping::model::PlanDay;
use crate::state::AppState;

use super::repo::MealPlan;

pub fn routes() -> Router<AppState> {
    Router::new().route("/meal-plans/:id", get(get_meal_plan).put(update_meal_plan))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealPlanBody {
    pub title: Option<String>,
    pub days: serde_json::Value,
}

#[instrument(skip(state))]
async fn get_meal_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealPlan>, AppError> {
    let key = keys::meal_plan(user_id, id);
    let ttl = state.config.cache_ttl.meal_plan;
    let db = state.db.clone();

    let plan = state
        .cache
        .with_cache(&key, ttl, || async move {
            MealPlan::find_for_user(&db, user_id, id)
                .await?
                .ok_or_else(|| AppError::NotFound("meal plan not found".into()))
        })
        .await?;

    Ok(Json(plan))
}

/// Write path: persist the new structure, then invalidate everything the
/// write can affect, including the per-plan derived keys this writer
/// cannot enumerate.
#[instrument(skip(state, body))]
async fn update_meal_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMealPlanBody>,
) -> Result<Json<MealPlan>, AppError> {
    // Reject malformed structure before writing anything.
    serde_json::from_value::<Vec<PlanDay>>(body.days.clone())
        .map_err(|e| AppError::InvalidInput(format!("malformed meal plan structure: {e}")))?;

    let plan = MealPlan::update_days(&state.db, user_id, id, body.title.as_deref(), &body.days)
        .await?
        .ok_or_else(|| AppError::NotFound("meal plan not found".into()))?;

    state.cache.del(&[keys::meal_plan(user_id, id)]).await;
    state
        .cache
        .del_pattern(&keys::meal_plan_prefix(user_id))
        .await;
    state
        .cache
        .del_pattern(&keys::shopping_lists_prefix(user_id))
        .await;

    Ok(Json(plan))
}
