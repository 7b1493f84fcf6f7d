//! Merging raw ingredient mentions into shopping list lines.

use std::collections::HashMap;

use super::model::{RawIngredient, ShoppingListItem};
use super::normalize::{normalize, UnitFamily};

struct Group {
    display_name: String,
    family: UnitFamily,
    total: f64,
}

/// Merge raw mentions by merge key, summing canonical quantities within a
/// group. Display name is taken from the first occurrence in insertion
/// order; quantities are order-independent. Categories are filled in by
/// the classifier afterwards.
pub fn aggregate(raws: &[RawIngredient]) -> Vec<ShoppingListItem> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Group> = HashMap::new();

    for raw in raws {
        let n = normalize(raw);
        match groups.get_mut(&n.merge_key) {
            Some(group) => group.total += n.canonical_quantity,
            None => {
                order.push(n.merge_key.clone());
                groups.insert(
                    n.merge_key,
                    Group {
                        display_name: raw.name.trim().to_string(),
                        family: n.family,
                        total: n.canonical_quantity,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .map(|group| {
            ShoppingListItem {
                name: group.display_name,
                quantity: round2(group.total),
                unit: group.family.display_unit().to_string(),
                price: None,
                checked: false,
                category: String::new(),
                emoji: None,
            }
        })
        .collect()
}

/// Display-layer rounding; canonical sums stay f64 until here.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
