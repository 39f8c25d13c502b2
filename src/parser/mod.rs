//! Token document parsing.
//!
//! Documents are JSON with key order preserved, so declaration order carries
//! through flattening and into the store.

mod flatten;

use serde_json::Value;

use crate::error::{Result, TokvarError};

pub use flatten::{alias_target, flatten, is_alias, Flattened, META_PREFIX, TYPE_KEY, VALUE_KEY};

/// Parse a token document from JSON text.
pub fn parse_document(source: &str) -> Result<Value> {
    serde_json::from_str(source).map_err(|e| TokvarError::Parse {
        message: format!("Invalid token document: {}", e),
        help: Some("Token documents must be valid JSON".to_string()),
    })
}

/// Parse and flatten a token document in one step.
pub fn parse_tokens(source: &str) -> Result<Flattened> {
    flatten(&parse_document(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let flat = parse_tokens(
            r#"{ "$type": "number", "z": { "$value": 1 }, "a": { "$value": 2 }, "m": { "$value": 3 } }"#,
        )
        .unwrap();
        let paths: Vec<_> = flat.definitions.paths().collect();
        assert_eq!(paths, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_document("{ not json").unwrap_err();
        assert!(matches!(err, TokvarError::Parse { .. }));
    }
}
