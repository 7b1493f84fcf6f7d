//! Free-text ingredient summary parsing.
//!
//! Meal records that lack structured recipe ingredients carry a
//! human-written, comma-separated summary such as
//! `"2 cups flour, 1 tsp salt, onion"`. This module turns such a string
//! into `RawIngredient` triples. It is a pragmatic heuristic, not an NLP
//! parser: any input produces a result, falling back to quantity 1 and an
//! empty unit when a segment cannot be decomposed further.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use super::model::RawIngredient;

lazy_static! {
    /// Recognized unit vocabulary, aliases mapped to a canonical spelling.
    static ref UNIT_ALIASES: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();

        // Volume
        map.insert("cup", "cup");
        map.insert("c", "cup");
        map.insert("tbsp", "tbsp");
        map.insert("tablespoon", "tbsp");
        map.insert("tsp", "tsp");
        map.insert("teaspoon", "tsp");
        map.insert("ml", "ml");
        map.insert("milliliter", "ml");
        map.insert("millilitre", "ml");
        map.insert("l", "l");
        map.insert("liter", "l");
        map.insert("litre", "l");

        // Mass
        map.insert("g", "g");
        map.insert("gram", "g");
        map.insert("kg", "kg");
        map.insert("kilogram", "kg");
        map.insert("oz", "oz");
        map.insert("ounce", "oz");
        map.insert("lb", "lb");
        map.insert("lbs", "lb");
        map.insert("pound", "lb");

        // Count-like
        map.insert("piece", "piece");
        map.insert("clove", "clove");
        map.insert("pinch", "pinch");
        map.insert("dash", "dash");
        map.insert("can", "can");
        map.insert("slice", "slice");

        map
    };

    static ref PATTERNS: QuantityPatterns = QuantityPatterns::new();
}

/// Compiled regex patterns for leading-quantity extraction, tried in order.
struct QuantityPatterns {
    /// Mixed numbers: "2 1/4"
    mixed: Regex,
    /// Simple vulgar fractions: "1/2"
    fraction: Regex,
    /// Integers and decimals: "2", "1.5"
    decimal: Regex,
}

impl QuantityPatterns {
    fn new() -> Self {
        Self {
            mixed: Regex::new(r"^(\d+)\s+(\d+)\s*/\s*(\d+)").unwrap(),
            fraction: Regex::new(r"^(\d+)\s*/\s*(\d+)").unwrap(),
            decimal: Regex::new(r"^(\d+(?:\.\d+)?)").unwrap(),
        }
    }
}

/// Parse a comma-separated ingredient summary. Never fails; empty and
/// whitespace-only input yields an empty list.
pub fn parse_ingredients_summary(summary: &str) -> Vec<RawIngredient> {
    summary
        .split(',')
        .filter_map(parse_segment)
        .collect()
}

/// Parse one comma-delimited segment. Returns None for segments that are
/// empty or reduce to nothing but a number.
fn parse_segment(segment: &str) -> Option<RawIngredient> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    let (quantity, rest) = match extract_leading_quantity(segment) {
        Some((qty, rest)) => (Some(qty), rest),
        None => (None, segment),
    };

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.is_empty() {
        // A bare number is not an ingredient.
        return None;
    }

    let Some(quantity) = quantity else {
        // No leading quantity: the whole segment is the name.
        return Some(RawIngredient::new(tokens.join(" "), 1.0, ""));
    };

    let first = tokens[0].trim_end_matches('.');
    if let Some(canonical) = canonical_unit(first) {
        let name = tokens[1..].join(" ");
        if name.is_empty() {
            // "2 cups" with nothing to name; drop it.
            return None;
        }
        return Some(RawIngredient::new(name, quantity, canonical));
    }

    // Out-of-vocabulary token: keep it as a literal unit when a name
    // follows ("1 bunch kale"), otherwise it is the name ("2 eggs").
    if tokens.len() >= 2 {
        let name = tokens[1..].join(" ");
        Some(RawIngredient::new(name, quantity, first.to_lowercase()))
    } else {
        Some(RawIngredient::new(tokens.join(" "), quantity, ""))
    }
}

/// Extract an integer, decimal, or (possibly mixed) vulgar fraction from
/// the start of the segment, returning the value and the remaining text.
fn extract_leading_quantity(segment: &str) -> Option<(f64, &str)> {
    if let Some(caps) = PATTERNS.mixed.captures(segment) {
        let whole: f64 = caps[1].parse().ok()?;
        let num: f64 = caps[2].parse().ok()?;
        let den: f64 = caps[3].parse().ok()?;
        if den > 0.0 {
            let end = caps.get(0).unwrap().end();
            return Some((whole + num / den, segment[end..].trim_start()));
        }
    }
    if let Some(caps) = PATTERNS.fraction.captures(segment) {
        let num: f64 = caps[1].parse().ok()?;
        let den: f64 = caps[2].parse().ok()?;
        if den > 0.0 {
            let end = caps.get(0).unwrap().end();
            return Some((num / den, segment[end..].trim_start()));
        }
    }
    if let Some(caps) = PATTERNS.decimal.captures(segment) {
        let value: f64 = caps[1].parse().ok()?;
        let end = caps.get(0).unwrap().end();
        return Some((value, segment[end..].trim_start()));
    }
    None
}

/// Look a token up in the unit vocabulary, matching singular and plural
/// forms via simple suffix stripping. Also used to canonicalize units on
/// structured recipe ingredients so they merge with parsed ones.
pub fn canonical_unit(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    if let Some(&unit) = UNIT_ALIASES.get(lower.as_str()) {
        return Some(unit);
    }
    let singular = lower.strip_suffix('s').filter(|s| !s.is_empty())?;
    UNIT_ALIASES.get(singular).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typical_summary() {
        let raws = parse_ingredients_summary("2 cups flour, 1 tsp salt, onion");
        assert_eq!(raws.len(), 3);
        assert_eq!(raws[0], RawIngredient::new("flour", 2.0, "cup"));
        assert_eq!(raws[1], RawIngredient::new("salt", 1.0, "tsp"));
        assert_eq!(raws[2], RawIngredient::new("onion", 1.0, ""));
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(parse_ingredients_summary("").is_empty());
        assert!(parse_ingredients_summary("   ").is_empty());
        assert!(parse_ingredients_summary(" , ,, ").is_empty());
    }

    #[test]
    fn never_panics_on_garbage() {
        for s in ["???", "1/0 cup oil", ",,,,123,,,", "🍕🍕🍕", "- - -"] {
            let _ = parse_ingredients_summary(s);
        }
    }

    #[test]
    fn parses_fractions() {
        let raws = parse_ingredients_summary("1/2 cup sugar, 2 1/4 cups butter");
        assert_eq!(raws[0].quantity, 0.5);
        assert_eq!(raws[0].unit, "cup");
        assert_eq!(raws[1].quantity, 2.25);
        assert_eq!(raws[1].name, "butter");
    }

    #[test]
    fn parses_decimals() {
        let raws = parse_ingredients_summary("1.5 kg potatoes");
        assert_eq!(raws[0], RawIngredient::new("potatoes", 1.5, "kg"));
    }

    #[test]
    fn plural_and_singular_units_both_match() {
        let raws = parse_ingredients_summary("2 cups milk, 1 cup milk");
        assert_eq!(raws[0].unit, "cup");
        assert_eq!(raws[1].unit, "cup");
    }

    #[test]
    fn unrecognized_unit_kept_as_literal() {
        let raws = parse_ingredients_summary("1 bunch kale");
        assert_eq!(raws[0], RawIngredient::new("kale", 1.0, "bunch"));
    }

    #[test]
    fn trailing_count_token_is_a_name_not_a_unit() {
        let raws = parse_ingredients_summary("2 eggs");
        assert_eq!(raws[0], RawIngredient::new("eggs", 2.0, ""));
    }

    #[test]
    fn collapses_extra_whitespace() {
        let raws = parse_ingredients_summary("  2   cups    olive   oil  ");
        assert_eq!(raws[0], RawIngredient::new("olive oil", 2.0, "cup"));
    }

    #[test]
    fn bare_number_segment_is_discarded() {
        assert!(parse_ingredients_summary("2").is_empty());
        assert!(parse_ingredients_summary("2 cups").is_empty());
    }

    #[test]
    fn division_by_zero_falls_back_gracefully() {
        // "1/0" cannot be a fraction; the bare "1" still parses and the
        // rest of the segment survives as literal text.
        let raws = parse_ingredients_summary("1/0 cup oil");
        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].quantity, 1.0);
    }

    #[test]
    fn abbreviated_unit_with_period() {
        let raws = parse_ingredients_summary("2 tbsp. olive oil");
        assert_eq!(raws[0].unit, "tbsp");
        assert_eq!(raws[0].name, "olive oil");
    }
}
