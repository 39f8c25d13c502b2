//! Key naming for exported documents.

/// Lower-camel-case a name segment.
///
/// Characters other than ASCII word characters, whitespace and `-` are
/// removed; the rest is split on runs of whitespace, `-` and `_`. The first
/// word is lowercased, later words are capitalized.
pub fn to_camel_case(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let mut words = cleaned
        .trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_');

    let mut out = words.next().unwrap_or("").to_lowercase();
    for word in words.filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Check if an object key must be quoted in TypeScript output.
pub fn needs_quotes(key: &str) -> bool {
    key.starts_with(|c: char| c.is_ascii_digit())
        || key
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
}

/// Write an object key for TypeScript output, quoting it when it is not a
/// bare identifier.
pub fn object_key(key: &str) -> String {
    if needs_quotes(key) {
        format!("'{}'", key.replace('\\', "\\\\").replace('\'', "\\'"))
    } else {
        key.to_string()
    }
}

/// Body key of a mode when several modes are merged: `Dark` becomes `modeDark`.
pub fn mode_key(mode_name: &str) -> String {
    to_camel_case(&format!("mode {}", mode_name))
}
