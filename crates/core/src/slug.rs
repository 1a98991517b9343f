//! URL-safe slug derivation.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Derive a URL-safe slug from a product name.
///
/// Lowercases, strips diacritics, collapses every run of
/// non-alphanumeric characters into a single hyphen and trims leading
/// and trailing hyphens. Collision suffixing is the repository's job.
#[must_use]
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;

    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_accents() {
        assert_eq!(slugify("Chemise Bleue"), "chemise-bleue");
        assert_eq!(slugify("Théière Électrique"), "theiere-electrique");
    }

    #[test]
    fn collapses_symbol_runs() {
        assert_eq!(slugify("T-Shirt  --  Col V"), "t-shirt-col-v");
        assert_eq!(slugify("Sac à main (cuir)"), "sac-a-main-cuir");
    }

    #[test]
    fn trims_edge_hyphens() {
        assert_eq!(slugify("  Robe!  "), "robe");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("Montre GT-2 Pro"), "montre-gt-2-pro");
    }
}
