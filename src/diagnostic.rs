//! Non-fatal diagnostics collected during a pass.
//!
//! Dropped leaves and unresolved aliases do not abort an import. They are
//! recorded here and reported alongside the result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Codes for the diagnostics the import pipeline emits.
pub mod codes {
    pub const UNSUPPORTED_KIND: &str = "tokvar::import::unsupported-kind";
    pub const INVALID_NODE: &str = "tokvar::import::invalid-node";
    pub const MISSING_ALIAS: &str = "tokvar::import::missing-alias";
    pub const CYCLIC_ALIAS: &str = "tokvar::import::cyclic-alias";
    pub const DUPLICATE_PATH: &str = "tokvar::import::duplicate-path";
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code (e.g. "tokvar::import::missing-alias").
    pub code: String,
    /// Token path the diagnostic is about.
    pub path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn warning(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            path: path.into(),
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Collects diagnostics from a pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(code = %diagnostic.code, path = %diagnostic.path, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Count diagnostics carrying `code`.
    pub fn count_code(&self, code: &str) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }
}
