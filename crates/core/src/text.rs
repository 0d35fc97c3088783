//! Text helpers for listing pages.

/// Truncate `value` to at most `limit` characters, appending `end` when cut.
///
/// Trailing whitespace left at the cut point is removed before `end` is
/// appended.
///
/// ```
/// use apola_core::text::limit;
///
/// assert_eq!(limit("Kemeja Flanel Pria", 13, "..."), "Kemeja Flanel...");
/// assert_eq!(limit("Kaos", 13, "..."), "Kaos");
/// ```
#[must_use]
pub fn limit(value: &str, limit: usize, end: &str) -> String {
    match value.char_indices().nth(limit) {
        None => value.to_owned(),
        Some((cut, _)) => {
            let head = value.get(..cut).unwrap_or(value).trim_end();
            format!("{head}{end}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_exact_length_is_untouched() {
        assert_eq!(limit("12345", 5, "..."), "12345");
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        assert_eq!(limit("Sepatu Ñandú Original", 12, "..."), "Sepatu Ñandú...");
    }

    #[test]
    fn test_limit_trims_before_suffix() {
        assert_eq!(limit("Tas Kulit Asli", 10, "..."), "Tas Kulit...");
    }

    #[test]
    fn test_limit_empty() {
        assert_eq!(limit("", 3, "..."), "");
    }
}
