//! Prefix-only truncation. Nothing here appends or substitutes characters.

/// Returns the first `max_chars` characters of `text` and whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

/// Returns the longest valid UTF-8 prefix of `bytes` and whether any bytes
/// after it were dropped.
///
/// Used for object bodies read with a byte bound, which may end in the middle
/// of a multi-byte character or hold a stray invalid byte.
pub fn utf8_prefix(bytes: &[u8]) -> (&str, bool) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => {
            let valid = err.valid_up_to();
            let text = std::str::from_utf8(&bytes[..valid]).unwrap_or_default();
            (text, valid < bytes.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate_chars("hello", 100), ("hello", false));
        assert_eq!(truncate_chars("", 100), ("", false));
    }

    #[test]
    fn test_exact_length_is_not_truncated() {
        let text = "a".repeat(100);
        let (prefix, truncated) = truncate_chars(&text, 100);
        assert_eq!(prefix.len(), 100);
        assert!(!truncated);
    }

    #[test]
    fn test_long_text_is_cut_to_a_prefix() {
        let text = "b".repeat(150);
        let (prefix, truncated) = truncate_chars(&text, 100);
        assert_eq!(prefix.chars().count(), 100);
        assert!(truncated);
        assert!(text.starts_with(prefix));
    }

    #[test]
    fn test_multibyte_characters_count_as_one() {
        let text = "é".repeat(5);
        let (prefix, truncated) = truncate_chars(&text, 3);
        assert_eq!(prefix, "ééé");
        assert!(truncated);
    }

    #[test]
    fn test_utf8_prefix_drops_cut_character() {
        let text = "añb";
        // Cut inside the two-byte "ñ".
        assert_eq!(utf8_prefix(&text.as_bytes()[..2]), ("a", true));
        assert_eq!(utf8_prefix(text.as_bytes()), ("añb", false));
    }

    #[test]
    fn test_utf8_prefix_of_invalid_bytes() {
        assert_eq!(utf8_prefix(&[b'o', b'k', 0xff, b'x']), ("ok", true));
        assert_eq!(utf8_prefix(&[0xff]), ("", true));
        assert_eq!(utf8_prefix(&[]), ("", false));
    }
}
