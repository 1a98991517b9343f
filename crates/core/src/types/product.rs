//! Product records and the admin-facing input shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Universe;

/// A catalog product.
///
/// `category` stays free text as entered by the admin; it is only mapped
/// onto the closed display taxonomy at classification time (see
/// [`crate::taxonomy`]). `images` is never empty for a persisted record
/// and `images[0]` always equals `image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub name: String,
    /// Non-negative amount in the smallest currency unit.
    pub price: i64,
    pub category: String,
    pub universe: Universe,
    /// Primary photo URL, kept alongside `images` for legacy readers.
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub description: String,
    /// Comma/slash/semicolon-delimited multi-value color string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Photo URLs per color name; keys are unique after accent/case folding.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub color_images: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
}

/// Input for creating a product; `id` and `slug` are generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub category: String,
    pub universe: Universe,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub color_images: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub sizes: Vec<String>,
}

/// Partial update for an existing product. Absent fields keep their
/// current value; an empty `color` clears the stored color.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    pub universe: Option<Universe>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub color_images: Option<BTreeMap<String, Vec<String>>>,
    pub sizes: Option<Vec<String>>,
}

impl ProductPatch {
    /// Whether the patch touches the photo set at all.
    #[must_use]
    pub const fn touches_images(&self) -> bool {
        self.image.is_some() || self.images.is_some()
    }
}

/// A category or mode sub-category name with its current product usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    /// Number of products whose stored category is exactly `name`.
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: "m1abc".to_string(),
            slug: "chemise-bleue".to_string(),
            name: "Chemise Bleue".to_string(),
            price: 12_500,
            category: "Chemise".to_string(),
            universe: Universe::Mode,
            image: "https://cdn.example/a.jpg".to_string(),
            images: vec!["https://cdn.example/a.jpg".to_string()],
            description: "Chemise en coton".to_string(),
            color: None,
            color_images: BTreeMap::new(),
            sizes: vec![],
        }
    }

    #[test]
    fn optional_fields_are_omitted_when_empty() {
        let json = serde_json::to_value(sample()).expect("serialize");
        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("color"));
        assert!(!obj.contains_key("colorImages"));
        assert!(!obj.contains_key("sizes"));
        assert_eq!(obj["universe"], "mode");
    }

    #[test]
    fn color_images_round_trips_in_camel_case() {
        let mut product = sample();
        product
            .color_images
            .insert("Bleu".to_string(), vec!["https://cdn.example/b.jpg".to_string()]);
        let json = serde_json::to_value(&product).expect("serialize");
        assert!(json.as_object().expect("object").contains_key("colorImages"));
        let back: Product = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, product);
    }

    #[test]
    fn patch_defaults_to_empty() {
        let patch: ProductPatch = serde_json::from_str("{}").expect("deserialize");
        assert!(patch.name.is_none());
        assert!(!patch.touches_images());
    }
}
