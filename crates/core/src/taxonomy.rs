//! Free-text category classification.
//!
//! Products store whatever category string the admin typed; the shop
//! front filters and groups them against a closed taxonomy. Mapping is
//! an ordered list of substring rules over the folded input (see
//! [`crate::text::fold`]), first match wins, with a default bucket per
//! universe when nothing matches.

use crate::text::fold;

/// Display categories for the general-goods (`tout`) universe.
pub const UNIVERSE_CATEGORIES: [&str; 4] = [
    "Electronique",
    "Electromenager",
    "Accessoires maison",
    "Accessoires & divers",
];

/// Display categories for the fashion (`mode`) universe.
pub const MODE_CATEGORIES: [&str; 5] = [
    "Vêtements",
    "Chaussures",
    "Maroquinerie",
    "Accessoires",
    "Mode femme",
];

/// Clothing sub-categories under the "Vêtements" mode category.
pub const MODE_CLOTHING_SUBCATEGORIES: [&str; 10] = [
    "Tshirt",
    "Chemise",
    "Pantalon",
    "Jean",
    "Veste",
    "Pull",
    "Robe",
    "Jupe",
    "Short",
    "Survetement",
];

/// The mode category every inferred clothing sub-category rolls up to.
pub const MODE_CLOTHING_CATEGORY: &str = "Vêtements";

/// Classify a free-text category into the `tout` universe taxonomy.
#[must_use]
pub fn map_universe_category(raw_category: &str) -> &'static str {
    let category = fold(raw_category);

    if category.contains("electromenager") || category.contains("electro menager") {
        return "Electromenager";
    }

    if category.contains("luminaire") || category.contains("electronique") {
        return "Electronique";
    }

    if category.contains("decoration")
        || category.contains("cuisine")
        || category.contains("accessoire maison")
    {
        return "Accessoires maison";
    }

    "Accessoires & divers"
}

/// Classify a free-text category into the `mode` universe taxonomy.
///
/// A clothing sub-category match takes priority: anything that infers a
/// sub-category is a garment, so the top-level result is forced to
/// "Vêtements" no matter what the other rules would say.
#[must_use]
pub fn map_mode_category(raw_category: &str) -> &'static str {
    if infer_mode_subcategory(raw_category).is_some() {
        return MODE_CLOTHING_CATEGORY;
    }

    let category = fold(raw_category);

    if category.contains("vetement") {
        return "Vêtements";
    }

    if category.contains("chaussure") {
        return "Chaussures";
    }

    if category.contains("maroquinerie") {
        return "Maroquinerie";
    }

    if category.contains("mode femme") || category.contains("modd femme") {
        return "Mode femme";
    }

    "Accessoires"
}

/// Infer a clothing sub-category from a free-text category string.
#[must_use]
pub fn infer_mode_subcategory(raw_category: &str) -> Option<&'static str> {
    let category = fold(raw_category);

    if category.contains("tshirt") || category.contains("t-shirt") || category.contains("t shirt")
    {
        return Some("Tshirt");
    }

    if category.contains("chemise") {
        return Some("Chemise");
    }

    if category.contains("jean") {
        return Some("Jean");
    }

    if category.contains("pantalon") {
        return Some("Pantalon");
    }

    if category.contains("veste") || category.contains("blouson") || category.contains("manteau") {
        return Some("Veste");
    }

    if category.contains("pull") || category.contains("sweat") || category.contains("hoodie") {
        return Some("Pull");
    }

    if category.contains("robe") {
        return Some("Robe");
    }

    if category.contains("jupe") {
        return Some("Jupe");
    }

    if category.contains("short") {
        return Some("Short");
    }

    if category.contains("survetement") || category.contains("jogging") {
        return Some("Survetement");
    }

    None
}

/// Match a free-text category against registered sub-category names.
///
/// Admin-created sub-categories take precedence over the built-in
/// heuristic: an exact folded match against `known` wins, the substring
/// inference is only the fallback.
#[must_use]
pub fn match_mode_subcategory(raw_category: &str, known: &[String]) -> Option<String> {
    let folded = fold(raw_category);

    if let Some(name) = known.iter().find(|name| fold(name) == folded) {
        return Some(name.clone());
    }

    infer_mode_subcategory(raw_category).map(str::to_string)
}
