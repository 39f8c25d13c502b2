//! Unit inference for exported numeric values.
//!
//! Stores keep bare numbers; exported documents carry CSS units chosen from
//! the variable's name. Font sizes become `rem`, pixel-like dimensions get a
//! `px` suffix and everything else passes through.

use std::fmt;

use serde_json::Value;

use super::number_value;

/// Base font size used for `px` to `rem` conversion.
pub const ROOT_FONT_SIZE: f64 = 16.0;

/// Name fragments that mark a value as a pixel dimension.
const PIXEL_KEYWORDS: &[&str] = &[
    "spacing", "size", "width", "radius", "stroke", "units", "gutter", "shadow", "metric",
];

/// A numeric value as found in the store: a bare number, or text that may
/// already carry a unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Number(f64),
    Text(String),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Number(n) => write!(f, "{}", n),
            Dimension::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Dimension {
    fn from(value: f64) -> Self {
        Dimension::Number(value)
    }
}

impl From<&str> for Dimension {
    fn from(value: &str) -> Self {
        Dimension::Text(value.to_string())
    }
}

/// Convert pixels to `rem` text: `32` becomes `2rem`.
pub fn px_to_rem(px: f64) -> String {
    format!("{}rem", px / ROOT_FONT_SIZE)
}

/// Check whether any path segment names a font size.
pub fn is_font_size(path_parts: &[String]) -> bool {
    path_parts.iter().any(|part| {
        let part = part.to_lowercase();
        part.contains("fontsize") || (part.contains("font") && part.contains("size"))
    })
}

/// Check whether a variable name marks a pixel dimension.
pub fn is_pixel_like(name: &str) -> bool {
    let name = name.to_lowercase();
    PIXEL_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

/// Format a numeric value for export.
///
/// `name` is the full slash-separated variable name and `path_parts` its
/// camel-cased segments. Font size takes precedence over pixel-like.
pub fn format_number(value: &Dimension, name: &str, path_parts: &[String]) -> Value {
    if is_font_size(path_parts) {
        match value {
            Dimension::Number(n) => return Value::String(px_to_rem(*n)),
            Dimension::Text(text) if text.contains("px") => {
                if let Some(px) = leading_float(text) {
                    return Value::String(px_to_rem(px));
                }
            }
            Dimension::Text(_) => {}
        }
    }

    let text = value.to_string();
    if is_pixel_like(name) && !["px", "rem", "ms"].iter().any(|unit| text.contains(unit)) {
        return Value::String(format!("{}px", text));
    }

    match value {
        Dimension::Number(n) => number_value(*n),
        Dimension::Text(s) => Value::String(s.clone()),
    }
}

/// Parse the leading decimal number of `text`, ignoring any trailing unit.
fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))))
        .map_or(text.len(), |(i, _)| i);

    let mut candidate = &text[..end];
    // `1.2.3px` reads as `1.2`
    while !candidate.is_empty() {
        if let Ok(v) = candidate.parse::<f64>() {
            return Some(v);
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    None
}
