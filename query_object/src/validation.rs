//! Validation module
//!
//! Lexical checks used when rendering identifiers, values and pagination
//! bounds. Nothing here validates against a schema.

/// Check whether `name` is a bare SQL identifier (letter or underscore
/// first, then alphanumerics, underscores or `$`)
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Check whether `name` is a dotted path of bare identifiers, e.g. `db.users`
pub fn is_identifier_path(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_plain_identifier)
}

/// Check whether `text` reads as a number: optional surrounding whitespace,
/// an optional sign, digits with an optional fraction and an optional
/// exponent. Hex, `inf` and `nan` are not numeric.
pub fn is_numeric(text: &str) -> bool {
    let bytes = text.trim().as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        digits += pos - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+') | Some(b'-')) {
            pos += 1;
        }
        let exp_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == exp_start {
            return false;
        }
    }

    pos == bytes.len()
}

/// Convert a numeric string to an integer, truncating any fraction.
/// Returns `None` for text that [`is_numeric`] rejects.
pub fn parse_integer(text: &str) -> Option<i64> {
    if !is_numeric(text) {
        return None;
    }

    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }

    // Saturates on overflow
    trimmed.parse::<f64>().ok().map(|value| value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers() {
        let valid = ["users", "user_profiles", "_private", "t1", "price$usd"];
        for name in valid {
            assert!(is_plain_identifier(name), "Should accept: {}", name);
        }

        let invalid = ["", "1users", "user name", "users u", "`users`", "a-b", "(x)"];
        for name in invalid {
            assert!(!is_plain_identifier(name), "Should reject: {}", name);
        }
    }

    #[test]
    fn test_identifier_paths() {
        assert!(is_identifier_path("users"));
        assert!(is_identifier_path("shop.users"));
        assert!(!is_identifier_path("shop."));
        assert!(!is_identifier_path(".users"));
        assert!(!is_identifier_path("users AS u"));
        assert!(!is_identifier_path(""));
    }

    #[test]
    fn test_numeric_strings() {
        let numeric = ["0", "30", "-5", "+7", "3.14", ".5", "5.", "1e3", "2.5E-2", " 42 "];
        for text in numeric {
            assert!(is_numeric(text), "Should be numeric: {:?}", text);
        }

        let not_numeric = ["", "abc", "1a", "0x1A", "inf", "NaN", "-", ".", "1e", "1 2", ":limit"];
        for text in not_numeric {
            assert!(!is_numeric(text), "Should not be numeric: {:?}", text);
        }
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("10"), Some(10));
        assert_eq!(parse_integer(" 10 "), Some(10));
        assert_eq!(parse_integer("3.9"), Some(3));
        assert_eq!(parse_integer("-2.5"), Some(-2));
        assert_eq!(parse_integer("1e3"), Some(1000));
        assert_eq!(parse_integer("?"), None);
        assert_eq!(parse_integer(":offset"), None);
    }
}
