//! Export options and the project manifest (tokvar.yaml).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TokvarError};
use crate::types::OpacityFormat;

/// Manifest file name looked up in the working directory.
pub const MANIFEST_FILENAME: &str = "tokvar.yaml";

/// Which modes of a primitive collection to export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrimitiveMode {
    All,
    /// The collection's first mode.
    #[default]
    First,
    /// A specific mode id; unknown ids fall back to the first mode.
    Id(String),
}

impl From<String> for PrimitiveMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "all" => Self::All,
            "first" => Self::First,
            _ => Self::Id(value),
        }
    }
}

impl From<PrimitiveMode> for String {
    fn from(value: PrimitiveMode) -> Self {
        value.to_string()
    }
}

impl std::str::FromStr for PrimitiveMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for PrimitiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::First => f.write_str("first"),
            Self::Id(id) => f.write_str(id),
        }
    }
}

/// Which modes of a themed (non-primitive) collection to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    All,
    Light,
    Dark,
}

/// Options for the structured export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    pub primitive_mode: PrimitiveMode,
    pub color_mode: ColorMode,
    /// Leave STRING variables out of the export.
    pub exclude_string: bool,
    /// Source collection name -> name used in cross-collection references.
    pub collection_aliases: BTreeMap<String, String>,
    pub opacity_format: OpacityFormat,
}

/// Output flavour written by `tokvar export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One TypeScript module per collection.
    #[default]
    Ts,
    /// One JSON body per collection.
    Json,
    /// One `<collection>.<mode>.tokens.json` token document per mode.
    Legacy,
}

/// Project manifest loaded from tokvar.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Variable store snapshot file.
    pub store: PathBuf,

    /// Output directory for exported files.
    pub output: PathBuf,

    pub format: OutputFormat,

    pub export: ExportOptions,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            store: PathBuf::from("tokvar.store.json"),
            output: PathBuf::from("tokens"),
            format: OutputFormat::default(),
            export: ExportOptions::default(),
        }
    }
}

impl Manifest {
    /// Load manifest from a tokvar.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TokvarError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load the manifest if the file exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| TokvarError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some(format!("Check {} syntax", MANIFEST_FILENAME)),
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| TokvarError::Parse {
            message: format!("Failed to serialize manifest: {}", e),
            help: None,
        })
    }
}
