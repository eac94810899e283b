//! Text normalization for scraped grid content.

use once_cell::sync::Lazy;
use regex::Regex;

// `$` followed by digits with optional thousands separators and an optional
// two-digit decimal part.
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[\d,]+(?:\.\d{2})?").expect("valid price regex"));

/// Collapses `&nbsp;` entities and whitespace runs into single spaces and
/// trims both ends. Total and idempotent.
pub fn clean(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First dollar-amount substring in `text`, if any. Wrapping the amount as
/// `"from $X"` for "starting at" phrasing is the caller's decision, not ours.
pub fn extract_price(text: &str) -> Option<String> {
    PRICE_RE.find(text).map(|m| m.as_str().to_string())
}

/// Strips a case-insensitive ASCII prefix plus any whitespace after it.
pub fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(text[prefix.len()..].trim_start())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_entities_and_whitespace() {
        assert_eq!(clean("Foo&nbsp;&nbsp;  Bar\n"), "Foo Bar");
        assert_eq!(clean("  The  Maple\tLeaf "), "The Maple Leaf");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn clean_is_idempotent() {
        let once = clean("Rebirth&nbsp;Brass\n Band ");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn extract_price_finds_first_amount() {
        assert_eq!(
            extract_price("Tickets starting at $45.00 today"),
            Some("$45.00".to_string())
        );
        assert_eq!(extract_price("$40 / $1,200 VIP"), Some("$40".to_string()));
        assert_eq!(extract_price("free show"), None);
    }

    #[test]
    fn strip_prefix_ci_ignores_case_and_trailing_space() {
        assert_eq!(strip_prefix_ci("Doors: 8:00 PM", "doors:"), Some("8:00 PM"));
        assert_eq!(strip_prefix_ci("SHOW:9PM", "show:"), Some("9PM"));
        assert_eq!(strip_prefix_ci("9:00 PM", "doors:"), None);
        assert_eq!(strip_prefix_ci("do", "doors:"), None);
    }
}
