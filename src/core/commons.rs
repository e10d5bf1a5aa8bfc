// src/core/commons.rs

/// Wraps a value in double quotes when it contains a space and is not already quoted.
/// Embedded quotes are not escaped.
pub fn quote_if_needed(value: &str) -> String {
    if value.contains(' ') && !is_quoted(value) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

/// True when the value is enclosed in a matching pair of single or double quotes.
pub fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("hello world"), "\"hello world\"");
        assert_eq!(quote_if_needed("hello"), "hello");
        assert_eq!(quote_if_needed("\"already quoted\""), "\"already quoted\"");
        assert_eq!(quote_if_needed("'single quoted'"), "'single quoted'");
        assert_eq!(quote_if_needed(""), "");
    }

    #[test]
    fn test_lone_quote_is_not_quoted() {
        assert!(!is_quoted("\""));
        assert_eq!(quote_if_needed("\"half open"), "\"\"half open\"");
    }
}
