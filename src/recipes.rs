//! Batch ingredient lookups for the two structured recipe stores.
//!
//! Both return a map keyed by recipe id; ids with no matching row are
//! simply absent, which the builder treats as "fall back to free text".

use std::collections::HashMap;

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::cache::keys;
use crate::shopping::model::RecipeIngredient;
use crate::state::AppState;

/// Cache-aside wrapper over the catalog lookup: largely static data, so
/// hits skip the database entirely and misses are backfilled off the
/// request path.
pub async fn catalog_ingredients_cached(
    state: &AppState,
    ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<RecipeIngredient>>> {
    let mut resolved: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    let mut misses: Vec<Uuid> = Vec::new();

    for &id in ids {
        if resolved.contains_key(&id) || misses.contains(&id) {
            continue;
        }
        match state
            .cache
            .get_json::<Vec<RecipeIngredient>>(&keys::catalog_recipe(id))
            .await
        {
            Some(rows) => {
                resolved.insert(id, rows);
            }
            None => misses.push(id),
        }
    }

    let fetched = catalog_ingredients_by_ids(&state.db, &misses).await?;

    if state.cache.is_enabled() {
        let ttl = state.config.cache_ttl.catalog_recipe;
        for (id, rows) in &fetched {
            let cache = state.cache.clone();
            let key = keys::catalog_recipe(*id);
            let snapshot = rows.clone();
            tokio::spawn(async move {
                cache.set_json(&key, &snapshot, ttl).await;
            });
        }
    }

    resolved.extend(fetched);
    Ok(resolved)
}

pub async fn catalog_ingredients_by_ids(
    db: &PgPool,
    ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<RecipeIngredient>>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, Json<Vec<RecipeIngredient>>)> = sqlx::query_as(
        r#"
        SELECT id, ingredients
        FROM recipe_catalog
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(id, json)| (id, json.0)).collect())
}

/// Scoped to the owning user; other users' recipes never resolve.
pub async fn user_recipe_ingredients_by_ids(
    db: &PgPool,
    user_id: Uuid,
    ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<RecipeIngredient>>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, Json<Vec<RecipeIngredient>>)> = sqlx::query_as(
        r#"
        SELECT id, ingredients
        FROM user_recipes
        WHERE user_id = $1 AND id = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(ids)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(id, json)| (id, json.0)).collect())
}
