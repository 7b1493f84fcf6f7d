//! Store-aisle classification and display ordering.

use lazy_static::lazy_static;

use super::model::ShoppingListItem;
use super::normalize::canonical_name;

pub const PRODUCE: &str = "produce";
pub const MEAT_SEAFOOD: &str = "meat & seafood";
pub const DAIRY: &str = "dairy";
pub const BAKERY: &str = "bakery";
pub const FROZEN: &str = "frozen";
pub const PANTRY: &str = "pantry";
pub const BEVERAGES: &str = "beverages";
pub const OTHER: &str = "other";

/// Fixed display order, mirroring a typical store walk: produce first,
/// catch-all last.
pub const CATEGORY_ORDER: [&str; 8] = [
    PRODUCE, MEAT_SEAFOOD, DAIRY, BAKERY, FROZEN, PANTRY, BEVERAGES, OTHER,
];

lazy_static! {
    /// Keyword lookup table; first matching row wins. Frozen leads so that
    /// "frozen peas" does not land in produce, and beverages precede
    /// produce so "orange juice" matches on the drink word rather than the
    /// fruit. Data, not code: extend by editing the table, the lookup
    /// never changes.
    static ref KEYWORDS: Vec<(&'static str, Vec<&'static str>)> = vec![
        (FROZEN, vec!["frozen", "ice cream", "popsicle"]),
        (
            BEVERAGES,
            vec!["juice", "soda", "coffee", "tea", "wine", "beer", "water"],
        ),
        (
            PRODUCE,
            vec![
                "apple", "banana", "orange", "lemon", "lime", "berry", "grape",
                "melon", "mango", "peach", "pear", "tomato", "potato", "onion",
                "garlic", "carrot", "celery", "lettuce", "spinach", "kale",
                "broccoli", "cauliflower", "cucumber", "zucchini", "avocado",
                "mushroom", "cilantro", "parsley", "basil", "ginger", "cabbage",
                "bell pepper", "scallion", "leek", "herb",
            ],
        ),
        (
            MEAT_SEAFOOD,
            vec![
                "chicken", "beef", "pork", "turkey", "lamb", "bacon", "sausage",
                "ham", "steak", "fish", "salmon", "tuna", "shrimp", "cod",
                "seafood",
            ],
        ),
        (
            DAIRY,
            vec!["milk", "cheese", "yogurt", "butter", "cream", "egg"],
        ),
        (
            BAKERY,
            vec![
                "bread", "bagel", "bun", "tortilla", "croissant", "baguette",
                "muffin", "pita",
            ],
        ),
        (
            PANTRY,
            vec![
                "flour", "sugar", "salt", "pepper", "oil", "vinegar", "rice",
                "pasta", "noodle", "bean", "lentil", "chickpea", "sauce",
                "spice", "oat", "cereal", "honey", "broth", "stock", "nut",
                "almond", "walnut", "seed", "can", "paste", "syrup",
            ],
        ),
    ];
}

fn emoji_for(category: &str) -> Option<&'static str> {
    match category {
        PRODUCE => Some("🥬"),
        MEAT_SEAFOOD => Some("🥩"),
        DAIRY => Some("🥛"),
        BAKERY => Some("🍞"),
        FROZEN => Some("🧊"),
        PANTRY => Some("🥫"),
        BEVERAGES => Some("🧃"),
        _ => None,
    }
}

/// Assign a store category by keyword lookup over the canonical name.
/// Unmatched names go to "other"; this never fails.
pub fn classify(name: &str) -> &'static str {
    let canonical = canonical_name(name);
    for &(category, ref keywords) in KEYWORDS.iter() {
        if keywords.iter().any(|kw| keyword_matches(&canonical, kw)) {
            return category;
        }
    }
    OTHER
}

/// Single-word keywords match whole words or compound tails, so
/// "strawberry" matches "berry" but "watermelon" never matches "water".
/// Multi-word keywords match as phrases.
fn keyword_matches(canonical: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        return canonical.contains(keyword);
    }
    canonical.split_whitespace().any(|w| w.ends_with(keyword))
}

/// Fill category and emoji on freshly aggregated items.
pub fn classify_items(items: &mut [ShoppingListItem]) {
    for item in items.iter_mut() {
        let category = classify(&item.name);
        item.category = category.to_string();
        item.emoji = emoji_for(category).map(str::to_string);
    }
}

fn rank(category: &str) -> usize {
    CATEGORY_ORDER
        .iter()
        .position(|c| *c == category)
        .unwrap_or(CATEGORY_ORDER.len() - 1)
}

/// Stable sort: category rank first, alphabetical name within a category.
pub fn sort_items(items: &mut [ShoppingListItem]) {
    items.sort_by(|a, b| {
        rank(&a.category)
            .cmp(&rank(&b.category))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> ShoppingListItem {
        ShoppingListItem {
            name: name.into(),
            quantity: 1.0,
            unit: String::new(),
            price: None,
            checked: false,
            category: String::new(),
            emoji: None,
        }
    }

    #[test]
    fn keyword_matches_assign_categories() {
        assert_eq!(classify("red onions"), PRODUCE);
        assert_eq!(classify("Chicken breast"), MEAT_SEAFOOD);
        assert_eq!(classify("whole milk"), DAIRY);
        assert_eq!(classify("sourdough bread"), BAKERY);
        assert_eq!(classify("olive oil"), PANTRY);
        assert_eq!(classify("orange juice"), BEVERAGES);
    }

    #[test]
    fn frozen_wins_over_other_matches() {
        assert_eq!(classify("frozen peas"), FROZEN);
        assert_eq!(classify("ice cream"), FROZEN);
    }

    #[test]
    fn compound_names_prefer_the_beverage_word() {
        assert_eq!(classify("orange juice"), BEVERAGES);
        assert_eq!(classify("apple juice"), BEVERAGES);
        assert_eq!(classify("iced tea"), BEVERAGES);
    }

    #[test]
    fn embedded_keywords_do_not_match() {
        // "watermelon" must not hit the beverage word "water", and
        // "steak" must not hit "tea"
        assert_eq!(classify("watermelon"), PRODUCE);
        assert_eq!(classify("steak"), MEAT_SEAFOOD);
    }

    #[test]
    fn unmatched_names_fall_back_to_other() {
        assert_eq!(classify("xyzzy"), OTHER);
        assert_eq!(classify(""), OTHER);
        assert_eq!(classify("🍕"), OTHER);
    }

    #[test]
    fn plural_names_still_match() {
        // classifier runs on the canonical (singularized) name
        assert_eq!(classify("tomatoes"), PRODUCE);
        assert_eq!(classify("eggs"), DAIRY);
    }

    #[test]
    fn sort_orders_by_category_then_name() {
        let mut items = vec![item("salt"), item("bananas"), item("apples")];
        classify_items(&mut items);
        sort_items(&mut items);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apples", "bananas", "salt"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut a = item("widget one");
        let mut b = item("widget one");
        a.quantity = 1.0;
        b.quantity = 2.0;
        let mut items = vec![a.clone(), b.clone()];
        classify_items(&mut items);
        sort_items(&mut items);
        assert_eq!(items[0].quantity, 1.0);
        assert_eq!(items[1].quantity, 2.0);
    }

    #[test]
    fn emoji_follows_category() {
        let mut items = vec![item("milk"), item("xyzzy")];
        classify_items(&mut items);
        assert_eq!(items[0].emoji.as_deref(), Some("🥛"));
        assert!(items[1].emoji.is_none());
    }
}
