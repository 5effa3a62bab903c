//! Country code → flag emoji

/// Distance from an uppercase ASCII letter to its regional indicator symbol.
const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;

/// Whether `code` looks like an ISO 3166-1 alpha-2 code (two ASCII letters).
pub fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Map a two-letter country code to its flag, e.g. `"fi"` → 🇫🇮.
///
/// Only meaningful for inputs accepted by [`is_country_code`].
pub fn flag_emoji(country_code: &str) -> String {
    country_code
        .to_uppercase()
        .chars()
        .filter_map(|c| char::from_u32(c as u32 + REGIONAL_INDICATOR_OFFSET))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finland_and_us() {
        assert_eq!(flag_emoji("FI"), "\u{1F1EB}\u{1F1EE}");
        assert_eq!(flag_emoji("US"), "\u{1F1FA}\u{1F1F8}");
    }

    #[test]
    fn test_lowercase_is_uppercased() {
        assert_eq!(flag_emoji("pt"), flag_emoji("PT"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(flag_emoji("FR"), flag_emoji("FR"));
        assert_eq!(flag_emoji("FR").chars().count(), 2);
    }

    #[test]
    fn test_is_country_code() {
        assert!(is_country_code("de"));
        assert!(is_country_code("DE"));
        assert!(!is_country_code(""));
        assert!(!is_country_code("DEU"));
        assert!(!is_country_code("1A"));
    }
}
