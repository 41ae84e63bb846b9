//! Regex-based extraction of years of experience and contact details.

use std::sync::OnceLock;

use regex::Regex;

fn experience_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?i)([0-9]+)\+?\s*(?:years?|yrs?)").expect("valid experience pattern"),
            Regex::new(r"(?i)([0-9]+)\s*-\s*[0-9]+\s*(?:years?|yrs?)").expect("valid range pattern"),
        ]
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email pattern")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:\+[0-9]{1,3}[-.]?)?\(?[0-9]{3}\)?[-.]?[0-9]{3}[-.]?[0-9]{4}").expect("valid phone pattern")
    })
}

/// Years of experience mentioned in `text` ("5 years", "3+ yrs", "2-3 years").
/// Returns 0 when nothing matches; oversized numbers saturate at `u32::MAX`.
pub fn extract_experience(text: &str) -> u32 {
    experience_patterns()
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                // ASCII digits only, so the parse can only fail on overflow.
                .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
        })
        .unwrap_or(0)
}

/// First e-mail address in `text`, or an empty string.
pub fn extract_email(text: &str) -> String {
    email_pattern()
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First phone number in `text` (full match, including any country code), or an empty string.
pub fn extract_phone(text: &str) -> String {
    phone_pattern()
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_experience_plain() {
        assert_eq!(extract_experience("Requires 5 years of Rust"), 5);
    }

    #[test]
    fn test_extract_experience_plus_suffix() {
        assert_eq!(extract_experience("3+ yrs backend"), 3);
    }

    #[test]
    fn test_extract_experience_ignores_non_ascii_digits() {
        assert_eq!(extract_experience("\u{ff15} years"), 0);
        assert_eq!(extract_experience("\u{0665} years, then 4 years"), 4);
    }

    #[test]
    fn test_extract_experience_saturates_on_overflow() {
        assert_eq!(extract_experience("99999999999 years"), u32::MAX);
    }

    #[test]
    fn test_extract_experience_range_reads_number_before_unit() {
        assert_eq!(extract_experience("2-3 years preferred"), 3);
        assert_eq!(extract_experience("2 - 4 Years"), 4);
    }

    #[test]
    fn test_extract_experience_none() {
        assert_eq!(extract_experience("entry level role"), 0);
    }

    #[test]
    fn test_extract_email() {
        let text = "Contact alex.chen@email.com for details";
        assert_eq!(extract_email(text), "alex.chen@email.com");
        assert_eq!(extract_email("no address here"), "");
    }

    #[test]
    fn test_extract_phone_with_country_code() {
        assert_eq!(extract_phone("Call +1-555-012-3456 today"), "+1-555-012-3456");
    }

    #[test]
    fn test_extract_phone_parenthesised() {
        assert_eq!(extract_phone("(555)123-4567"), "(555)123-4567");
        assert_eq!(extract_phone("nothing"), "");
    }
}
