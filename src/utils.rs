/// Shared helpers for Singapore postal codes
///
/// Singapore postal codes are exactly six digits. Queries arrive in many shapes
/// ("238874", "S 238874", "Singapore 238874") and OneMap addresses embed the code
/// at the end of the formatted text.
use regex::Regex;
use std::sync::LazyLock;

static SIX_DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{6})\b").expect("six-digit pattern is valid"));

/// Strip every non-digit character and keep the result only if exactly six
/// digits remain.
///
/// # Examples
///
/// ```
/// use lightning_tracker_service::utils::clean_postal_code;
///
/// assert_eq!(clean_postal_code("238874").as_deref(), Some("238874"));
/// assert_eq!(clean_postal_code(" S-238 874 ").as_deref(), Some("238874"));
/// assert_eq!(clean_postal_code("12345"), None);
/// assert_eq!(clean_postal_code("1234567"), None);
/// ```
pub fn clean_postal_code(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 6 {
        Some(digits)
    } else {
        None
    }
}

/// Find the first standalone six-digit run inside a longer string.
///
/// # Examples
///
/// ```
/// use lightning_tracker_service::utils::extract_postal_code;
///
/// assert_eq!(
///     extract_postal_code("ION Orchard, 2 Orchard Turn, Singapore 238874").as_deref(),
///     Some("238874")
/// );
/// assert_eq!(extract_postal_code("Marina Bay Sands"), None);
/// ```
pub fn extract_postal_code(text: &str) -> Option<String> {
    SIX_DIGIT_RUN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_postal_code_plain() {
        assert_eq!(clean_postal_code("018989").as_deref(), Some("018989"));
    }

    #[test]
    fn test_clean_postal_code_with_separators() {
        assert_eq!(clean_postal_code("Singapore 238874").as_deref(), Some("238874"));
        assert_eq!(clean_postal_code("238-874").as_deref(), Some("238874"));
    }

    #[test]
    fn test_clean_postal_code_wrong_length() {
        assert_eq!(clean_postal_code(""), None);
        assert_eq!(clean_postal_code("abc"), None);
        assert_eq!(clean_postal_code("12345"), None);
        // Block number plus postal code is too many digits
        assert_eq!(clean_postal_code("123 Example Rd, Singapore 238874"), None);
    }

    #[test]
    fn test_clean_postal_code_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not postal code digits
        assert_eq!(clean_postal_code("٢٣٨٨٧٤"), None);
    }

    #[test]
    fn test_extract_postal_code_requires_word_boundary() {
        assert_eq!(extract_postal_code("ref 1234567 only"), None);
        assert_eq!(extract_postal_code("unit 12345"), None);
    }

    #[test]
    fn test_extract_postal_code_first_match_wins() {
        assert_eq!(
            extract_postal_code("from 018989 to 238874").as_deref(),
            Some("018989")
        );
    }

    #[test]
    fn test_extract_postal_code_adjacent_punctuation() {
        assert_eq!(extract_postal_code("Singapore(079903)").as_deref(), Some("079903"));
    }
}
