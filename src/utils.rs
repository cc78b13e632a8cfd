// src/utils.rs
// Shared string helpers

/// The first `max_chars` characters of `s`, never splitting a character.
pub fn prefix_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Truncate a string to `max_chars` characters with an ellipsis.
///
/// Used for previews in logs and terminal output.
pub fn truncate(s: &str, max_chars: usize) -> String {
    let prefix = prefix_chars(s, max_chars);
    if prefix.len() == s.len() {
        s.to_string()
    } else {
        format!("{}...", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_short_string() {
        assert_eq!(prefix_chars("hello", 10), "hello");
    }

    #[test]
    fn test_prefix_exact_length() {
        assert_eq!(prefix_chars("hello", 5), "hello");
    }

    #[test]
    fn test_prefix_multibyte_boundary() {
        // each 'é' is two bytes
        assert_eq!(prefix_chars("ééé", 2), "éé");
        assert_eq!(prefix_chars("Δx = v·Δt", 4), "Δx =");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncate_empty_string() {
        assert_eq!(truncate("", 5), "");
    }
}
