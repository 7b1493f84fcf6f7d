//! Unit and name canonicalization.
//!
//! Two ingredient mentions merge if and only if they share a merge key:
//! the canonical name plus a unit-family tag. Conversions only happen
//! within a family (mass to grams, volume to milliliters); an unrecognized
//! unit becomes its own literal family so "1 bunch kale" and "2 bunch kale"
//! merge with each other but never with a bare-count "kale".

use lazy_static::lazy_static;
use std::collections::HashSet;

use super::model::RawIngredient;

/// Grams per unit.
const KG_G: f64 = 1000.0;
const OZ_G: f64 = 28.35;
const LB_G: f64 = 453.6;

/// Milliliters per unit.
const L_ML: f64 = 1000.0;
const CUP_ML: f64 = 236.6;
const TBSP_ML: f64 = 14.8;
const TSP_ML: f64 = 4.93;

lazy_static! {
    /// Descriptor words stripped from names before merging. Display names
    /// keep the original wording; this only affects the merge key.
    static ref DESCRIPTORS: HashSet<&'static str> = [
        "fresh", "chopped", "diced", "minced", "sliced", "grated",
        "shredded", "peeled", "crushed", "organic", "ripe", "large",
        "small", "medium", "a", "an", "the", "of",
    ]
    .into_iter()
    .collect();
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitFamily {
    Mass,
    Volume,
    Count,
    Literal(String),
}

impl UnitFamily {
    /// Tag used inside the merge key.
    pub fn tag(&self) -> String {
        match self {
            UnitFamily::Mass => "mass".into(),
            UnitFamily::Volume => "volume".into(),
            UnitFamily::Count => "count".into(),
            UnitFamily::Literal(unit) => format!("unit:{unit}"),
        }
    }

    /// Preferred display unit for aggregated quantities in this family.
    pub fn display_unit(&self) -> &str {
        match self {
            UnitFamily::Mass => "g",
            UnitFamily::Volume => "ml",
            UnitFamily::Count => "",
            UnitFamily::Literal(unit) => unit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub merge_key: String,
    pub family: UnitFamily,
    /// Quantity scaled into the family's canonical unit.
    pub canonical_quantity: f64,
}

pub fn normalize(raw: &RawIngredient) -> Normalized {
    let (family, scale) = unit_family(&raw.unit);
    let merge_key = format!("{}|{}", canonical_name(&raw.name), family.tag());
    Normalized {
        merge_key,
        family,
        canonical_quantity: raw.quantity * scale,
    }
}

/// Map a (possibly canonicalized, possibly literal) unit string to its
/// family and the scale factor into that family's canonical unit.
pub fn unit_family(unit: &str) -> (UnitFamily, f64) {
    match unit {
        "g" => (UnitFamily::Mass, 1.0),
        "kg" => (UnitFamily::Mass, KG_G),
        "oz" => (UnitFamily::Mass, OZ_G),
        "lb" => (UnitFamily::Mass, LB_G),
        "ml" => (UnitFamily::Volume, 1.0),
        "l" => (UnitFamily::Volume, L_ML),
        "cup" => (UnitFamily::Volume, CUP_ML),
        "tbsp" => (UnitFamily::Volume, TBSP_ML),
        "tsp" => (UnitFamily::Volume, TSP_ML),
        "" | "piece" => (UnitFamily::Count, 1.0),
        other => (UnitFamily::Literal(other.to_lowercase()), 1.0),
    }
}

/// Lowercase, strip descriptor words, singularize, trim punctuation.
pub fn canonical_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty() && !DESCRIPTORS.contains(w))
        .map(singularize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Small suffix-rule singularizer for food nouns. Not a general English
/// stemmer; just enough for "tomatoes", "berries", "eggs".
fn singularize(word: &str) -> String {
    if word.len() > 3 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if word.len() > 3 && word.ends_with("oes") {
        return word[..word.len() - 2].to_string();
    }
    if word.len() > 3
        && (word.ends_with("ches")
            || word.ends_with("shes")
            || word.ends_with("sses")
            || word.ends_with("xes"))
    {
        return word[..word.len() - 2].to_string();
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_converts_to_grams() {
        assert_eq!(unit_family("kg"), (UnitFamily::Mass, 1000.0));
        let raw = RawIngredient::new("beef", 2.0, "lb");
        let n = normalize(&raw);
        assert!((n.canonical_quantity - 907.2).abs() < 1e-9);
        assert_eq!(n.family, UnitFamily::Mass);
    }

    #[test]
    fn volume_converts_to_milliliters() {
        let raw = RawIngredient::new("milk", 3.0, "cup");
        let n = normalize(&raw);
        assert!((n.canonical_quantity - 709.8).abs() < 1e-9);
        assert_eq!(n.family.display_unit(), "ml");
    }

    #[test]
    fn count_passes_through() {
        let raw = RawIngredient::new("eggs", 4.0, "");
        let n = normalize(&raw);
        assert_eq!(n.canonical_quantity, 4.0);
        assert_eq!(n.family, UnitFamily::Count);
        assert_eq!(n.family.display_unit(), "");
    }

    #[test]
    fn literal_units_form_their_own_family() {
        let bunch = normalize(&RawIngredient::new("kale", 1.0, "bunch"));
        let count = normalize(&RawIngredient::new("kale", 2.0, ""));
        assert_ne!(bunch.merge_key, count.merge_key);

        let more = normalize(&RawIngredient::new("kale", 2.0, "bunch"));
        assert_eq!(bunch.merge_key, more.merge_key);
    }

    #[test]
    fn names_merge_across_casing_and_descriptors() {
        let a = canonical_name("Fresh Chopped Tomatoes");
        let b = canonical_name("tomato");
        assert_eq!(a, b);
    }

    #[test]
    fn singularizes_food_nouns() {
        assert_eq!(singularize("berries"), "berry");
        assert_eq!(singularize("tomatoes"), "tomato");
        assert_eq!(singularize("eggs"), "egg");
        assert_eq!(singularize("peaches"), "peach");
        // no false positives
        assert_eq!(singularize("swiss"), "swiss");
        assert_eq!(singularize("asparagus"), "asparagus");
        assert_eq!(singularize("gas"), "gas");
    }

    #[test]
    fn trims_punctuation() {
        assert_eq!(canonical_name("onion."), "onion");
        assert_eq!(canonical_name("(garlic)"), "garlic");
    }
}
