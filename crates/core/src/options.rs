//! Color variants and per-color photo maps.
//!
//! A product's `color` field is a single free-text string holding one or
//! more color names separated by commas, semicolons, slashes or pipes.
//! `color_images` maps a color name to its photo URLs; keys are unique
//! after accent/case folding so "Bleu Marine" and "bleu marine" address
//! the same entry.

use std::collections::BTreeMap;

use crate::text::fold;

/// Map from color name to photo URLs for that color.
pub type ColorImagesMap = BTreeMap<String, Vec<String>>;

/// Fold a color name for comparison (same folding as categories).
#[must_use]
pub fn normalize_color_name(value: &str) -> String {
    fold(value)
}

/// Split a delimited color string into distinct color names.
#[must_use]
pub fn parse_color_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut output: Vec<String> = Vec::new();
    for item in raw.split(['|', ',', ';', '/']) {
        let value = item.trim();
        if value.is_empty() || output.iter().any(|seen| seen == value) {
            continue;
        }
        output.push(value.to_string());
    }
    output
}

fn unique_image_urls<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut output: Vec<String> = Vec::new();
    for value in values {
        let url = value.trim();
        if url.is_empty() || output.iter().any(|seen| seen == url) {
            continue;
        }
        output.push(url.to_string());
    }
    output
}

/// Normalize a color-images map.
///
/// Keys are trimmed, entries without usable URLs dropped, URLs deduped
/// per color, and keys that collide after folding are merged (the
/// first-seen spelling wins).
#[must_use]
pub fn normalize_color_images(input: &ColorImagesMap) -> ColorImagesMap {
    let mut output = ColorImagesMap::new();
    let mut spellings: Vec<(String, String)> = Vec::new();

    for (raw_color, raw_images) in input {
        let color = raw_color.trim();
        if color.is_empty() {
            continue;
        }

        let images = unique_image_urls(raw_images.iter().map(String::as_str));
        if images.is_empty() {
            continue;
        }

        let folded = fold(color);
        let known_spelling = spellings
            .iter()
            .find(|(seen, _)| *seen == folded)
            .map(|(_, spelling)| spelling.clone());
        let key = known_spelling.unwrap_or_else(|| {
            spellings.push((folded, color.to_string()));
            color.to_string()
        });

        let entry = output.entry(key).or_default();
        let merged =
            unique_image_urls(entry.iter().chain(images.iter()).map(String::as_str));
        *entry = merged;
    }

    output
}

/// Photo URLs for a given color, matched accent/case-insensitively.
#[must_use]
pub fn color_images_for(color_images: &ColorImagesMap, color: &str) -> Vec<String> {
    let target = fold(color);
    if target.is_empty() {
        return Vec::new();
    }

    color_images
        .iter()
        .find(|(key, _)| fold(key) == target)
        .map(|(_, images)| unique_image_urls(images.iter().map(String::as_str)))
        .unwrap_or_default()
}
