//! Variable store records: collections, modes and typed variables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Rgba, TokenKind};

/// Identifier of a variable in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(pub String);

/// Identifier of a collection in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub String);

/// Identifier of a mode within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeId(pub String);

macro_rules! impl_id {
    ($($ty:ident),*) => {$(
        impl $ty {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    )*};
}

impl_id!(VariableId, CollectionId, ModeId);

/// Value type the store resolves a variable to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedType {
    Boolean,
    Color,
    Float,
    String,
}

impl From<TokenKind> for ResolvedType {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Color => Self::Color,
            TokenKind::Number => Self::Float,
        }
    }
}

impl ResolvedType {
    /// The token kind exported for this type, if it has one.
    pub fn token_kind(&self) -> Option<TokenKind> {
        match self {
            Self::Color => Some(TokenKind::Color),
            Self::Float => Some(TokenKind::Number),
            Self::Boolean | Self::String => None,
        }
    }
}

/// A per-mode value: either a literal or a reference to another variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableValue {
    Boolean(bool),
    Color(Rgba),
    Float(f64),
    String(String),
    #[serde(rename = "VARIABLE_ALIAS")]
    Alias(VariableId),
}

impl VariableValue {
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias(_))
    }
}

/// A named parallel value set of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub mode_id: ModeId,
    pub name: String,
}

impl Mode {
    pub fn new(mode_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            mode_id: ModeId::new(mode_id),
            name: name.into(),
        }
    }
}

/// A named group of variables sharing a list of modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub modes: Vec<Mode>,
    pub variable_ids: Vec<VariableId>,
}

impl Collection {
    /// Check whether the collection holds primitive (non-themed) tokens.
    pub fn is_primitive(&self) -> bool {
        self.name.to_lowercase().contains("primitive")
    }

    pub fn default_mode(&self) -> Option<&Mode> {
        self.modes.first()
    }
}

/// A typed, slash-named variable with one value per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    pub variable_collection_id: CollectionId,
    pub resolved_type: ResolvedType,
    #[serde(default)]
    pub values_by_mode: IndexMap<ModeId, VariableValue>,
}

impl Variable {
    pub fn value_for_mode(&self, mode_id: &ModeId) -> Option<&VariableValue> {
        self.values_by_mode.get(mode_id)
    }

    /// Name segments split on `/`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_serde_shape() {
        let alias = VariableValue::Alias(VariableId::new("VariableID:3"));
        let json = serde_json::to_value(&alias).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "VARIABLE_ALIAS", "value": "VariableID:3" })
        );

        let float: VariableValue =
            serde_json::from_value(serde_json::json!({ "type": "FLOAT", "value": 4.5 })).unwrap();
        assert_eq!(float, VariableValue::Float(4.5));
    }

    #[test]
    fn test_is_primitive() {
        let mut collection = Collection {
            id: CollectionId::new("VariableCollectionId:1"),
            name: "Core Primitives".to_string(),
            modes: vec![Mode::new("1:0", "Value")],
            variable_ids: vec![],
        };
        assert!(collection.is_primitive());

        collection.name = "Semantic".to_string();
        assert!(!collection.is_primitive());
    }

    #[test]
    fn test_resolved_type_kind() {
        assert_eq!(ResolvedType::from(TokenKind::Color), ResolvedType::Color);
        assert_eq!(ResolvedType::Float.token_kind(), Some(TokenKind::Number));
        assert_eq!(ResolvedType::String.token_kind(), None);
    }
}
