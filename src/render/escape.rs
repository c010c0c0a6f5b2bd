//! Escaping helpers for ENML text and attribute values.

/// Escape text content (`&`, `<`, `>`).
pub fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape a double-quoted attribute value (`&`, `<`, `>`, `"`).
pub fn escape_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}
