//! Text normalisation used before tokenising or comparing free text.

use std::collections::HashSet;

/// Lower-cases `text`, strips everything except ASCII letters, digits,
/// whitespace, `+` and `#`, then collapses runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '+' || *c == '#'
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace tokens of the cleaned text.
pub fn tokenize(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Case-insensitive set of skill names.
pub fn lowercase_set<S: AsRef<str>>(items: &[S]) -> HashSet<String> {
    items.iter().map(|s| s.as_ref().to_lowercase()).collect()
}
