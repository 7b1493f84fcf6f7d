use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cache::keys;
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{
    CreateListBody, GenerateListBody, Pagination, ShoppingListSummary, ToggleItemBody,
};
use super::repo::ShoppingList;
use super::service;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/shopping-lists", get(list_lists))
        .route("/shopping-lists/:id", get(get_list))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/shopping-lists/generate", post(generate_list))
        .route("/shopping-lists", post(create_list))
        .route("/shopping-lists/:id/items/:index", patch(toggle_item))
}

#[instrument(skip(state))]
async fn list_lists(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ShoppingListSummary>>, AppError> {
    let key = keys::shopping_lists_page(user_id, p.limit, p.offset);
    let ttl = state.config.cache_ttl.shopping_list;
    let db = state.db.clone();

    let summaries = state
        .cache
        .with_cache(&key, ttl, || async move {
            let lists = ShoppingList::list_by_user(&db, user_id, p.limit, p.offset).await?;
            Ok(lists
                .into_iter()
                .map(ShoppingListSummary::from)
                .collect::<Vec<_>>())
        })
        .await?;

    Ok(Json(summaries))
}

#[instrument(skip(state))]
async fn get_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ShoppingList>, AppError> {
    let key = keys::shopping_list(user_id, id);
    let ttl = state.config.cache_ttl.shopping_list;
    let db = state.db.clone();

    let list = state
        .cache
        .with_cache(&key, ttl, || async move {
            ShoppingList::find_for_user(&db, user_id, id)
                .await?
                .ok_or_else(|| AppError::NotFound("shopping list not found".into()))
        })
        .await?;

    Ok(Json(list))
}

#[instrument(skip(state))]
async fn generate_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GenerateListBody>,
) -> Result<Json<ShoppingList>, AppError> {
    let list = service::generate(&state, user_id, body.meal_plan_id).await?;
    Ok(Json(list))
}

#[instrument(skip(state, body))]
async fn create_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateListBody>,
) -> Result<Json<ShoppingList>, AppError> {
    let list = service::create_from_entries(&state, user_id, &body.items).await?;
    Ok(Json(list))
}

#[instrument(skip(state))]
async fn toggle_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(body): Json<ToggleItemBody>,
) -> Result<Json<ShoppingList>, AppError> {
    let list = service::toggle_item(&state, user_id, id, index, body.checked).await?;
    Ok(Json(list))
}
