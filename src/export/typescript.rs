//! TypeScript rendering of export bodies.

use std::fmt::Write;

use serde_json::Value;

use crate::format::{object_key, to_camel_case};

use super::ExportFile;

const INDENT: &str = "  ";

impl ExportFile {
    /// Render the body as `export const <name> = { ... } as const;`.
    pub fn to_typescript(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "export const {} = ", const_name(&self.collection_name));
        write_value(&mut out, &self.body, 0);
        out.push_str(" as const;\n");
        out
    }
}

/// Identifier for a collection's exported constant.
pub fn const_name(collection_name: &str) -> String {
    let name = to_camel_case(collection_name);
    if name.is_empty() {
        "tokens".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (key, child) in map {
                push_indent(out, depth + 1);
                out.push_str(&object_key(key));
                out.push_str(": ");
                write_value(out, child, depth + 1);
                out.push_str(",\n");
            }
            push_indent(out, depth);
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, depth);
            }
            out.push(']');
        }
        Value::String(s) => {
            out.push('\'');
            for c in s.chars() {
                match c {
                    '\\' => out.push_str("\\\\"),
                    '\'' => out.push_str("\\'"),
                    '\n' => out.push_str("\\n"),
                    _ => out.push(c),
                }
            }
            out.push('\'');
        }
        Value::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        Value::Null => out.push_str("null"),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
