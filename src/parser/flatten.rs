//! Token document flattening.
//!
//! Walks the nested group tree depth-first, joining segment names with `/`.
//! A node with a `$value` is a leaf; any other node is a group. The declared
//! `$type` is passed down as the inherited kind and a node's own `$type`
//! overrides it. Keys starting with `$` are metadata at every level.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::diagnostic::{codes, Diagnostic, Diagnostics};
use crate::error::{Result, TokvarError};
use crate::registry::TokenSet;
use crate::types::{PendingAlias, Rgba, TokenDefinition, TokenKind};

/// Marker that prefixes metadata keys.
pub const META_PREFIX: char = '$';
/// Key declaring a node's kind.
pub const TYPE_KEY: &str = "$type";
/// Key holding a leaf's literal or alias text.
pub const VALUE_KEY: &str = "$value";

/// Output of flattening a document.
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    /// Literal definitions, plus aliases whose target was already known.
    pub definitions: TokenSet,
    /// Aliases read before their target, in document order.
    pub pending: Vec<PendingAlias>,
    /// Leaves that were dropped.
    pub diagnostics: Diagnostics,
}

/// Flatten a parsed token document.
///
/// The document's root `$type`, if any, is inherited by top-level nodes.
/// Fails on the first literal that does not parse for its kind.
pub fn flatten(document: &Value) -> Result<Flattened> {
    let root = document.as_object().ok_or_else(|| TokvarError::Parse {
        message: "Token document must be a JSON object".to_string(),
        help: Some("Wrap tokens in a top-level { ... } group".to_string()),
    })?;

    let mut flattener = TreeFlattener::new();
    let inherited = declared_type(root);

    for (key, node) in root {
        if is_meta(key) {
            continue;
        }
        flattener.visit(key.clone(), node, inherited)?;
    }

    Ok(flattener.finish())
}

/// Check whether a value's text is an alias expression: `{group.token}`.
///
/// The float-tuple colour notation `{r: .., g: .., b: ..}` is not an alias.
pub fn is_alias(value: &Value) -> bool {
    value.as_str().is_some_and(|text| {
        let text = text.trim();
        text.starts_with('{') && !Rgba::is_float_tuple(text)
    })
}

/// Turn `{color.brand.primary}` into `color/brand/primary`.
pub fn alias_target(text: &str) -> String {
    text.trim()
        .replace('.', "/")
        .replace(['{', '}'], "")
}

fn is_meta(key: &str) -> bool {
    key.starts_with(META_PREFIX)
}

fn declared_type(node: &Map<String, Value>) -> Option<&str> {
    node.get(TYPE_KEY).and_then(Value::as_str)
}

/// Owns the accumulators for one flatten pass.
struct TreeFlattener {
    definitions: TokenSet,
    pending: Vec<PendingAlias>,
    diagnostics: Diagnostics,
    /// Leaf paths already committed or pending.
    claimed: HashSet<String>,
}

impl TreeFlattener {
    fn new() -> Self {
        Self {
            definitions: TokenSet::new(),
            pending: Vec::new(),
            diagnostics: Diagnostics::new(),
            claimed: HashSet::new(),
        }
    }

    fn finish(self) -> Flattened {
        Flattened {
            definitions: self.definitions,
            pending: self.pending,
            diagnostics: self.diagnostics,
        }
    }

    fn visit(&mut self, path: String, node: &Value, inherited: Option<&str>) -> Result<()> {
        let Some(group) = node.as_object() else {
            self.diagnostics.push(
                Diagnostic::warning(
                    codes::INVALID_NODE,
                    &path,
                    format!("Expected a group or token object, found {}", json_type(node)),
                )
                .with_help("Tokens are objects with a $value key"),
            );
            return Ok(());
        };

        let kind = declared_type(group).or(inherited);

        if let Some(value) = group.get(VALUE_KEY) {
            return self.leaf(path, value, kind);
        }

        for (key, child) in group {
            if is_meta(key) {
                continue;
            }
            self.visit(format!("{}/{}", path, key), child, kind)?;
        }

        Ok(())
    }

    /// Reserve a leaf path. A path spelled twice in one document, such as a
    /// `"a/b"` key next to a nested `a` group with a `b` token, keeps its
    /// first leaf.
    fn claim(&mut self, path: &str) -> bool {
        if self.claimed.insert(path.to_string()) {
            return true;
        }
        self.diagnostics.push(
            Diagnostic::warning(codes::DUPLICATE_PATH, path, "Token path is already defined")
                .with_help("Each token path may appear once per document"),
        );
        false
    }

    fn leaf(&mut self, path: String, value: &Value, declared: Option<&str>) -> Result<()> {
        let kind = declared.and_then(TokenKind::from_declared);

        if is_alias(value) {
            if !self.claim(&path) {
                return Ok(());
            }
            let target = alias_target(value.as_str().unwrap_or_default());
            match self.definitions.get(&target) {
                Some(existing) => {
                    let kind = existing.kind;
                    self.definitions.insert(TokenDefinition::alias(path, kind, target));
                }
                None => self.pending.push(PendingAlias { path, kind, target }),
            }
            return Ok(());
        }

        let definition = match kind {
            Some(TokenKind::Color) => {
                let text = value.as_str().ok_or_else(|| {
                    TokvarError::parse(format!("{}: color value must be text, found {}", path, value))
                })?;
                let colour = Rgba::parse(text).map_err(|e| at_path(&path, e))?;
                TokenDefinition::color(path, colour)
            }
            Some(TokenKind::Number) => {
                let number = number_literal(value).ok_or_else(|| TokvarError::Parse {
                    message: format!("{}: number value must be numeric, found {}", path, value),
                    help: Some("Write unitless numbers; units are added on export".to_string()),
                })?;
                TokenDefinition::number(path, number)
            }
            None => {
                self.diagnostics.push(
                    Diagnostic::warning(
                        codes::UNSUPPORTED_KIND,
                        &path,
                        format!("Unsupported token type: {}", declared.unwrap_or("(none)")),
                    )
                    .with_help("Only color and number tokens are imported"),
                );
                return Ok(());
            }
        };

        if self.claim(&definition.path) {
            self.definitions.insert(definition);
        }
        Ok(())
    }
}

fn number_literal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn at_path(path: &str, error: TokvarError) -> TokvarError {
    match error {
        TokvarError::Parse { message, help } => TokvarError::Parse {
            message: format!("{}: {}", path, message),
            help,
        },
        other => other,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenPayload;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_groups() {
        let doc = json!({
            "color": {
                "$type": "color",
                "brand": {
                    "primary": { "$value": "#ff0000" },
                    "secondary": { "$value": "rgb(0, 0, 255)" }
                }
            },
            "spacing": {
                "$type": "number",
                "sm": { "$value": 4 },
                "md": { "$value": 8 }
            }
        });

        let flat = flatten(&doc).unwrap();
        let paths: Vec<_> = flat.definitions.paths().collect();
        assert_eq!(
            paths,
            vec!["color/brand/primary", "color/brand/secondary", "spacing/sm", "spacing/md"]
        );
        assert_eq!(
            flat.definitions.get("color/brand/primary").unwrap().payload,
            TokenPayload::Color(Rgba::rgb(1.0, 0.0, 0.0))
        );
        assert_eq!(
            flat.definitions.get("spacing/md").unwrap().payload,
            TokenPayload::Number(8.0)
        );
        assert!(flat.pending.is_empty());
        assert!(flat.diagnostics.is_empty());
    }

    #[test]
    fn test_root_type_is_inherited() {
        let doc = json!({
            "$type": "number",
            "radius": { "sm": { "$value": 2 } }
        });
        let flat = flatten(&doc).unwrap();
        assert_eq!(flat.definitions.get("radius/sm").unwrap().kind, TokenKind::Number);
    }

    #[test]
    fn test_local_type_overrides_inherited() {
        let doc = json!({
            "theme": {
                "$type": "number",
                "accent": { "$type": "color", "$value": "#00ff00" },
                "gap": { "$value": 12 }
            }
        });
        let flat = flatten(&doc).unwrap();
        assert_eq!(flat.definitions.get("theme/accent").unwrap().kind, TokenKind::Color);
        assert_eq!(flat.definitions.get("theme/gap").unwrap().kind, TokenKind::Number);
    }

    #[test]
    fn test_metadata_keys_skipped_at_every_level() {
        let doc = json!({
            "$schema": "https://example.com/tokens.json",
            "$metadata": { "tokenSetOrder": ["core"] },
            "color": {
                "$type": "color",
                "$description": "Brand colours",
                "$extensions": { "x": { "$value": "#000" } },
                "red": {
                    "$value": "#ff0000",
                    "$description": "Red"
                }
            }
        });
        let flat = flatten(&doc).unwrap();
        let paths: Vec<_> = flat.definitions.paths().collect();
        assert_eq!(paths, vec!["color/red"]);
        assert!(flat.diagnostics.is_empty());
    }

    #[test]
    fn test_alias_after_target_is_immediate() {
        let doc = json!({
            "$type": "color",
            "red": { "$value": "#ff0000" },
            "danger": { "$value": "{red}" }
        });
        let flat = flatten(&doc).unwrap();
        let danger = flat.definitions.get("danger").unwrap();
        assert_eq!(danger.alias_target(), Some("red"));
        assert_eq!(danger.kind, TokenKind::Color);
        assert!(flat.pending.is_empty());
    }

    #[test]
    fn test_alias_before_target_is_pending() {
        let doc = json!({
            "semantic": {
                "$type": "color",
                "danger": { "$value": " {palette.red.500} " }
            },
            "palette": {
                "$type": "color",
                "red": { "500": { "$value": "#ef4444" } }
            }
        });
        let flat = flatten(&doc).unwrap();
        assert_eq!(
            flat.pending,
            vec![PendingAlias {
                path: "semantic/danger".to_string(),
                kind: Some(TokenKind::Color),
                target: "palette/red/500".to_string(),
            }]
        );
        assert!(flat.definitions.get("semantic/danger").is_none());
    }

    #[test]
    fn test_unsupported_kind_is_dropped() {
        let doc = json!({
            "font": {
                "$type": "fontFamily",
                "body": { "$value": "Inter" }
            },
            "untyped": { "$value": 3 },
            "size": { "$type": "number", "$value": 3 }
        });
        let flat = flatten(&doc).unwrap();
        assert_eq!(flat.definitions.len(), 1);
        assert_eq!(flat.diagnostics.count_code(codes::UNSUPPORTED_KIND), 2);
    }

    #[test]
    fn test_unsupported_kind_alias_still_pending() {
        let doc = json!({
            "a": { "$type": "dimension", "$value": "{b}" }
        });
        let flat = flatten(&doc).unwrap();
        assert_eq!(flat.pending.len(), 1);
        assert_eq!(flat.pending[0].kind, None);
    }

    #[test]
    fn test_invalid_colour_is_fatal() {
        let doc = json!({
            "$type": "color",
            "ok": { "$value": "#fff" },
            "bad": { "$value": "not-a-colour" }
        });
        let err = flatten(&doc).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_non_numeric_number_is_fatal() {
        let doc = json!({ "$type": "number", "gap": { "$value": "wide" } });
        assert!(flatten(&doc).is_err());

        let doc = json!({ "$type": "number", "gap": { "$value": "12" } });
        let flat = flatten(&doc).unwrap();
        assert_eq!(flat.definitions.get("gap").unwrap().payload, TokenPayload::Number(12.0));
    }

    #[test]
    fn test_non_object_node_is_dropped() {
        let doc = json!({ "color": { "$type": "color", "stray": "#fff" } });
        let flat = flatten(&doc).unwrap();
        assert!(flat.definitions.is_empty());
        assert_eq!(flat.diagnostics.count_code(codes::INVALID_NODE), 1);
    }

    #[test]
    fn test_braced_text_with_colon_is_an_alias() {
        let doc = json!({
            "$type": "number",
            "a": { "$value": "{x:y}" },
            "b": { "$value": 1 },
            "tint": { "$type": "color", "$value": "{weird: thing}" },
            "scrim": { "$type": "color", "$value": "{r: 0, g: 0, b: 0, opacity: 0.5}" }
        });
        let flat = flatten(&doc).unwrap();
        let pending: Vec<_> = flat.pending.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(pending, vec!["a", "tint"]);
        assert_eq!(
            flat.definitions.get("scrim").unwrap().payload,
            TokenPayload::Color(Rgba::new(0.0, 0.0, 0.0, 0.5))
        );
    }

    #[test]
    fn test_duplicate_path_keeps_first_leaf() {
        let doc = json!({
            "$type": "number",
            "a": { "b": { "$value": "{c}" } },
            "a/b": { "$value": 1 },
            "c": { "$value": 2 },
            "d/e": { "$value": 3 },
            "d": { "e": { "$value": 4 } }
        });
        let flat = flatten(&doc).unwrap();
        assert_eq!(flat.pending.len(), 1);
        assert_eq!(flat.pending[0].path, "a/b");
        assert!(flat.definitions.get("a/b").is_none());
        assert_eq!(flat.definitions.get("d/e").unwrap().payload, TokenPayload::Number(3.0));
        assert_eq!(flat.diagnostics.count_code(codes::DUPLICATE_PATH), 2);
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(flatten(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_alias_target() {
        assert_eq!(alias_target("{color.red.500}"), "color/red/500");
        assert_eq!(alias_target("  {a}  "), "a");
        assert!(is_alias(&json!(" {a.b}")));
        assert!(!is_alias(&json!("#fff")));
        assert!(!is_alias(&json!("{r: 1, g: 0, b: 0}")));
        assert!(is_alias(&json!("{x:y}")));
        assert!(is_alias(&json!("{weird: thing}")));
        assert!(!is_alias(&json!(12)));
    }
}
