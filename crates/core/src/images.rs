//! Product photo list normalization.
//!
//! Products carry both a legacy single `image` field and an ordered
//! `images` list. Both are merged into one deduplicated list with the
//! legacy field first, so `images[0]` is always the primary photo.

/// Merge an explicit photo list with the legacy single field.
///
/// Entries are trimmed, empties dropped and duplicates removed while
/// preserving order. When `fallback` is present it wins position 0.
#[must_use]
pub fn normalize_product_images(images: &[String], fallback: Option<&str>) -> Vec<String> {
    let mut output = Vec::new();

    let candidates = fallback
        .into_iter()
        .chain(images.iter().map(String::as_str));

    for candidate in candidates {
        let url = candidate.trim();
        if url.is_empty() || output.iter().any(|seen| seen == url) {
            continue;
        }
        output.push(url.to_string());
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn fallback_takes_position_zero() {
        let images = owned(&["b.jpg", "c.jpg"]);
        assert_eq!(
            normalize_product_images(&images, Some("a.jpg")),
            owned(&["a.jpg", "b.jpg", "c.jpg"])
        );
    }

    #[test]
    fn dedupes_preserving_order() {
        let images = owned(&["a.jpg", "b.jpg", "a.jpg", " b.jpg "]);
        assert_eq!(
            normalize_product_images(&images, Some("a.jpg")),
            owned(&["a.jpg", "b.jpg"])
        );
    }

    #[test]
    fn drops_blank_entries() {
        let images = owned(&["", "  ", "a.jpg"]);
        assert_eq!(normalize_product_images(&images, None), owned(&["a.jpg"]));
        assert_eq!(normalize_product_images(&[], Some("  ")), Vec::<String>::new());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize_product_images(&[], None), Vec::<String>::new());
    }
}
