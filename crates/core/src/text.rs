//! Accent- and case-insensitive text folding.
//!
//! Category matching, color lookup and slug derivation all compare
//! strings after the same folding: lowercase, Unicode NFD, combining
//! marks removed, surrounding whitespace trimmed. "Électroménager" and
//! "electromenager" fold to the same string.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a string for accent/case-insensitive comparison.
#[must_use]
pub fn fold(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_case() {
        assert_eq!(fold("Électroménager"), "electromenager");
        assert_eq!(fold("VÊTEMENTS"), "vetements");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(fold("  Chaussures  "), "chaussures");
    }

    #[test]
    fn keeps_punctuation() {
        assert_eq!(fold("T-Shirt"), "t-shirt");
        assert_eq!(fold("Accessoires & divers"), "accessoires & divers");
    }
}
