//! URL slug derivation.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Lower-case `text` and collapse every run of non-alphanumerics into `-`.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Use the caller's slug when given, otherwise derive one from `source`.
pub fn slug_or_derive(explicit: Option<&str>, source: &str) -> String {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slugify(slug),
        None => slugify(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Green Apple Juice"), "green-apple-juice");
        assert_eq!(slugify("  Fizzy!! Drinks & More  "), "fizzy-drinks-more");
        assert_eq!(slugify("1L Bottle"), "1l-bottle");
    }

    #[test]
    fn test_slug_or_derive() {
        assert_eq!(slug_or_derive(Some("Custom Slug"), "Title"), "custom-slug");
        assert_eq!(slug_or_derive(Some("   "), "Some Title"), "some-title");
        assert_eq!(slug_or_derive(None, "Some Title"), "some-title");
    }
}
