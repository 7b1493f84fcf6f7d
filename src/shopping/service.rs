//! The shopping-list builder: turns a meal plan's meals into a persisted,
//! aggregated, categorized list. All fallibility lives here at the
//! boundary (fetch, validate, persist); parsing and aggregation below it
//! never fail.

use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::cache::keys;
use crate::error::AppError;
use crate::mealplans::repo::MealPlan;
use crate::recipes;
use crate::state::AppState;

use super::aggregate::{aggregate, round2};
use super::aisles;
use super::model::{MealSource, PlanMeal, RawIngredient, RecipeIngredient, ShoppingListItem};
use super::parser::{canonical_unit, parse_ingredients_summary};
use super::repo::ShoppingList;

/// Generate (or regenerate in place) the shopping list for a meal plan.
pub async fn generate(
    state: &AppState,
    user_id: Uuid,
    meal_plan_id: Uuid,
) -> Result<ShoppingList, AppError> {
    let plan = MealPlan::find_for_user(&state.db, user_id, meal_plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound("meal plan not found".into()))?;
    let days = plan.parsed_days()?;

    let meals: Vec<PlanMeal> = days.into_iter().flat_map(|d| d.meals).collect();
    if meals.is_empty() {
        // structurally valid, just nothing planned
        return Err(AppError::NoIngredients);
    }

    let catalog_ids: Vec<Uuid> = meals
        .iter()
        .filter(|m| m.source == MealSource::Catalog)
        .filter_map(|m| m.recipe_catalog_id)
        .collect();
    let user_recipe_ids: Vec<Uuid> = meals
        .iter()
        .filter(|m| m.source == MealSource::UserRecipe)
        .filter_map(|m| m.user_recipe_id)
        .collect();

    // The two structured lookups are independent; run them concurrently.
    let (catalog, user_recipes) = tokio::try_join!(
        recipes::catalog_ingredients_cached(state, &catalog_ids),
        recipes::user_recipe_ingredients_by_ids(&state.db, user_id, &user_recipe_ids),
    )?;

    let raws = resolve_ingredients(&meals, &catalog, &user_recipes);
    if raws.is_empty() {
        return Err(AppError::NoIngredients);
    }

    let items = build_items(&raws);
    let total = total_cost(&items);

    let list =
        ShoppingList::upsert_for_plan(&state.db, user_id, meal_plan_id, &items, total).await?;

    // The persisted list changed; derived read models are stale.
    state
        .cache
        .del(&[keys::shopping_list(user_id, list.id)])
        .await;
    state
        .cache
        .del_pattern(&keys::shopping_lists_prefix(user_id))
        .await;

    Ok(list)
}

/// Freestanding list from directly submitted free-text entries.
pub async fn create_from_entries(
    state: &AppState,
    user_id: Uuid,
    entries: &[String],
) -> Result<ShoppingList, AppError> {
    let raws: Vec<RawIngredient> = entries
        .iter()
        .flat_map(|e| parse_ingredients_summary(e))
        .collect();
    if raws.is_empty() {
        return Err(AppError::InvalidInput("no parsable items submitted".into()));
    }

    let items = build_items(&raws);
    let total = total_cost(&items);
    let list = ShoppingList::insert_freestanding(&state.db, user_id, &items, total).await?;

    state
        .cache
        .del_pattern(&keys::shopping_lists_prefix(user_id))
        .await;

    Ok(list)
}

/// Toggle one item's checked flag and recompute the list-level completion
/// state in a single read-modify-write.
pub async fn toggle_item(
    state: &AppState,
    user_id: Uuid,
    list_id: Uuid,
    index: usize,
    checked: bool,
) -> Result<ShoppingList, AppError> {
    let list = ShoppingList::find_for_user(&state.db, user_id, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound("shopping list not found".into()))?;

    let mut items = list.items.0;
    if index >= items.len() {
        return Err(AppError::InvalidInput(format!(
            "item index {index} out of range (list has {} items)",
            items.len()
        )));
    }
    items[index].checked = checked;

    let (is_completed, completed_at) = completion_state(&items, list.completed_at);
    let updated =
        ShoppingList::replace_items(&state.db, list.id, &items, is_completed, completed_at)
            .await?;

    state
        .cache
        .del(&[keys::shopping_list(user_id, list.id)])
        .await;
    state
        .cache
        .del_pattern(&keys::shopping_lists_prefix(user_id))
        .await;

    Ok(updated)
}

fn build_items(raws: &[RawIngredient]) -> Vec<ShoppingListItem> {
    let mut items = aggregate(raws);
    aisles::classify_items(&mut items);
    aisles::sort_items(&mut items);
    items
}

/// Per-meal ingredient resolution: structured rows where a recipe resolved
/// to a non-empty list, free-text summary otherwise.
fn resolve_ingredients(
    meals: &[PlanMeal],
    catalog: &HashMap<Uuid, Vec<RecipeIngredient>>,
    user_recipes: &HashMap<Uuid, Vec<RecipeIngredient>>,
) -> Vec<RawIngredient> {
    let mut raws = Vec::new();
    for meal in meals {
        let structured = match meal.source {
            MealSource::Catalog => meal.recipe_catalog_id.and_then(|id| catalog.get(&id)),
            MealSource::UserRecipe => meal.user_recipe_id.and_then(|id| user_recipes.get(&id)),
            MealSource::Ai => None,
        };
        match structured {
            Some(rows) if !rows.is_empty() => {
                raws.extend(rows.iter().map(structured_to_raw));
            }
            _ => {
                let summary = meal.ingredients_summary.as_deref().unwrap_or("");
                raws.extend(parse_ingredients_summary(summary));
            }
        }
    }
    raws
}

fn structured_to_raw(row: &RecipeIngredient) -> RawIngredient {
    let unit = canonical_unit(row.unit.trim())
        .map(str::to_string)
        .unwrap_or_else(|| row.unit.trim().to_lowercase());
    RawIngredient::new(row.name.clone(), row.amount, unit)
}

/// Sum of price × quantity over priced items. None when no item carries a
/// price at all, so "no information" stays distinct from "costs nothing".
fn total_cost(items: &[ShoppingListItem]) -> Option<f64> {
    let mut sum = 0.0;
    let mut any_priced = false;
    for item in items {
        if let Some(price) = item.price {
            sum += price * item.quantity;
            any_priced = true;
        }
    }
    any_priced.then(|| round2(sum))
}

/// A list is completed iff every item is checked. `completed_at` is set on
/// the transition into completion (kept if already set) and cleared on the
/// way out.
fn completion_state(
    items: &[ShoppingListItem],
    previous: Option<OffsetDateTime>,
) -> (bool, Option<OffsetDateTime>) {
    let done = !items.is_empty() && items.iter().all(|i| i.checked);
    if done {
        (true, previous.or_else(|| Some(OffsetDateTime::now_utc())))
    } else {
        (false, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(
        source: MealSource,
        catalog_id: Option<Uuid>,
        user_recipe_id: Option<Uuid>,
        summary: &str,
    ) -> PlanMeal {
        PlanMeal {
            name: None,
            source,
            recipe_catalog_id: catalog_id,
            user_recipe_id,
            ingredients_summary: (!summary.is_empty()).then(|| summary.to_string()),
        }
    }

    fn item(name: &str, quantity: f64, price: Option<f64>, checked: bool) -> ShoppingListItem {
        ShoppingListItem {
            name: name.into(),
            quantity,
            unit: String::new(),
            price,
            checked,
            category: "other".into(),
            emoji: None,
        }
    }

    #[test]
    fn structured_rows_win_over_summary() {
        let id = Uuid::new_v4();
        let mut catalog = HashMap::new();
        catalog.insert(
            id,
            vec![RecipeIngredient {
                name: "flour".into(),
                amount: 500.0,
                unit: "g".into(),
            }],
        );
        let meals = vec![meal(MealSource::Catalog, Some(id), None, "1 cup sugar")];
        let raws = resolve_ingredients(&meals, &catalog, &HashMap::new());
        assert_eq!(raws, vec![RawIngredient::new("flour", 500.0, "g")]);
    }

    #[test]
    fn empty_structured_list_falls_back_to_summary() {
        let id = Uuid::new_v4();
        let mut catalog = HashMap::new();
        catalog.insert(id, Vec::new());
        let meals = vec![meal(MealSource::Catalog, Some(id), None, "1 cup sugar")];
        let raws = resolve_ingredients(&meals, &catalog, &HashMap::new());
        assert_eq!(raws, vec![RawIngredient::new("sugar", 1.0, "cup")]);
    }

    #[test]
    fn unknown_recipe_id_falls_back_to_summary() {
        let meals = vec![meal(
            MealSource::Catalog,
            Some(Uuid::new_v4()),
            None,
            "2 eggs",
        )];
        let raws = resolve_ingredients(&meals, &HashMap::new(), &HashMap::new());
        assert_eq!(raws, vec![RawIngredient::new("eggs", 2.0, "")]);
    }

    #[test]
    fn no_resolvable_ingredients_yields_nothing() {
        // every meal points at an unknown catalog recipe and has an empty
        // summary; the builder maps this outcome to NoIngredients
        let meals = vec![
            meal(MealSource::Catalog, Some(Uuid::new_v4()), None, ""),
            meal(MealSource::Catalog, Some(Uuid::new_v4()), None, ""),
        ];
        let raws = resolve_ingredients(&meals, &HashMap::new(), &HashMap::new());
        assert!(raws.is_empty());
    }

    #[test]
    fn structured_units_are_canonicalized() {
        let raw = structured_to_raw(&RecipeIngredient {
            name: "milk".into(),
            amount: 2.0,
            unit: "Cups".into(),
        });
        assert_eq!(raw.unit, "cup");

        let raw = structured_to_raw(&RecipeIngredient {
            name: "kale".into(),
            amount: 1.0,
            unit: "Bunch".into(),
        });
        assert_eq!(raw.unit, "bunch");
    }

    #[test]
    fn total_cost_distinguishes_none_from_zero() {
        assert_eq!(total_cost(&[item("a", 2.0, None, false)]), None);
        assert_eq!(total_cost(&[item("a", 2.0, Some(0.0), false)]), Some(0.0));
        assert_eq!(
            total_cost(&[
                item("a", 2.0, Some(1.5), false),
                item("b", 1.0, None, false),
            ]),
            Some(3.0)
        );
    }

    #[test]
    fn completion_sets_and_clears_timestamp() {
        let all_done = vec![item("a", 1.0, None, true), item("b", 1.0, None, true)];
        let (done, at) = completion_state(&all_done, None);
        assert!(done);
        assert!(at.is_some());

        // already-completed lists keep their original timestamp
        let earlier = OffsetDateTime::now_utc() - time::Duration::hours(1);
        let (_, kept) = completion_state(&all_done, Some(earlier));
        assert_eq!(kept, Some(earlier));

        let mut one_unchecked = all_done.clone();
        one_unchecked[1].checked = false;
        let (done, at) = completion_state(&one_unchecked, Some(earlier));
        assert!(!done);
        assert!(at.is_none());
    }

    #[test]
    fn empty_list_is_never_completed() {
        let (done, at) = completion_state(&[], None);
        assert!(!done);
        assert!(at.is_none());
    }

    #[test]
    fn build_items_classifies_and_orders() {
        let raws = parse_ingredients_summary("1 tsp salt, 2 apples, 1 lb chicken");
        let items = build_items(&raws);
        let categories: Vec<&str> = items.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(categories, vec!["produce", "meat & seafood", "pantry"]);
    }
}
