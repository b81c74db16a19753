use std::collections::HashMap;

/// Strips the XML namespace from a tag: both the `{uri}Tag` form and the
/// prefixed `ds:Tag` form collapse to the bare local name.
pub fn local_tag(raw: &str) -> String {
    let without_braces = match raw.rfind('}') {
        Some(pos) => &raw[pos + 1..],
        None => raw,
    };
    match without_braces.rfind(':') {
        Some(pos) => without_braces[pos + 1..].to_string(),
        None => without_braces.to_string(),
    }
}

/// Attribute as a trimmed non-empty string.
pub fn attr_str(attrs: &HashMap<String, String>, key: &str) -> Option<String> {
    attrs.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()).map(|v| v.to_string())
}

/// Attribute parsed as an integer. Empty or unparsable values give `None`.
pub fn attr_int(attrs: &HashMap<String, String>, key: &str) -> Option<i64> {
    attr_str(attrs, key)?.parse::<i64>().ok()
}
