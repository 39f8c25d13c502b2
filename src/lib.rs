//! tokvar - Design token <-> variable collection translator
//!
//! Imports hierarchical design-token documents into a flat store of typed,
//! multi-mode variables, and exports those variables back out as nested
//! token documents.

pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod export;
pub mod format;
pub mod import;
pub mod output;
pub mod parser;
pub mod protocol;
pub mod registry;
pub mod store;
pub mod types;

pub use config::{ColorMode, ExportOptions, Manifest, OutputFormat, PrimitiveMode};
pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error::{Result, TokvarError};
pub use export::{collections_info, export_all, export_legacy, CollectionsInfo, ExportFile, ExportResult, ExportTreeBuilder};
pub use import::{import_document, ImportReport};
pub use protocol::{MessageHandler, Request, Response};
pub use registry::{resolve_aliases, Resolution, TokenSet};
pub use store::{MemoryStore, VariableStore};
pub use types::{
    Collection, CollectionId, Mode, ModeId, OpacityFormat, ResolvedType, Rgba, TokenDefinition, TokenKind,
    Variable, VariableId, VariableValue,
};
