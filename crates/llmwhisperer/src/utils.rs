//! Small helpers shared by the client and its callers.

/// Masks all but the first `reveal` characters of a secret.
///
/// Useful for logging which key is in use without leaking it.
///
/// ```rust
/// assert_eq!(llmwhisperer::redact_key("abcd1234", 4), "abcdxxxx");
/// assert_eq!(llmwhisperer::redact_key("ab", 4), "ab");
/// ```
pub fn redact_key(key: &str, reveal: usize) -> String {
    key.chars()
        .enumerate()
        .map(|(i, c)| if i < reveal { c } else { 'x' })
        .collect()
}

/// Returns the version of this client.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_key() {
        assert_eq!(redact_key("1234567890", 4), "1234xxxxxx");
        assert_eq!(redact_key("1234567890", 0), "xxxxxxxxxx");
        assert_eq!(redact_key("", 4), "");
        assert_eq!(redact_key("12", 10), "12");
    }

    #[test]
    fn test_version_is_set() {
        assert!(!version().is_empty());
    }
}
