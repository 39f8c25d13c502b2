//! Flattened token definitions produced by a single import pass.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Rgba;

/// Semantic type of a token value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Color,
    Number,
}

impl TokenKind {
    /// Map a declared `$type` to a supported kind.
    pub fn from_declared(declared: &str) -> Option<Self> {
        match declared {
            "color" => Some(Self::Color),
            "number" => Some(Self::Number),
            _ => None,
        }
    }

    /// The `$type` text for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a definition holds, decided once when the leaf is read.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenPayload {
    Color(Rgba),
    Number(f64),
    /// Slash-joined path of the referenced definition.
    Alias(String),
}

/// One flattened token: a unique slash-joined path, its kind and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDefinition {
    pub path: String,
    pub kind: TokenKind,
    pub payload: TokenPayload,
}

impl TokenDefinition {
    pub fn color(path: impl Into<String>, colour: Rgba) -> Self {
        Self {
            path: path.into(),
            kind: TokenKind::Color,
            payload: TokenPayload::Color(colour),
        }
    }

    pub fn number(path: impl Into<String>, value: f64) -> Self {
        Self {
            path: path.into(),
            kind: TokenKind::Number,
            payload: TokenPayload::Number(value),
        }
    }

    /// An alias definition takes the kind of its target.
    pub fn alias(path: impl Into<String>, kind: TokenKind, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            payload: TokenPayload::Alias(target.into()),
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.payload, TokenPayload::Alias(_))
    }

    /// Target path, for alias definitions.
    pub fn alias_target(&self) -> Option<&str> {
        match &self.payload {
            TokenPayload::Alias(target) => Some(target),
            _ => None,
        }
    }
}

/// An alias whose target did not exist yet when it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAlias {
    pub path: String,
    /// Declared (or inherited) kind, if the document gave a supported one.
    pub kind: Option<TokenKind>,
    pub target: String,
}
