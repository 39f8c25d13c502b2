use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tokvar operations
#[derive(Error, Diagnostic, Debug)]
pub enum TokvarError {
    #[error("IO error: {0}")]
    #[diagnostic(code(tokvar::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(tokvar::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(tokvar::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Store error: {message}")]
    #[diagnostic(code(tokvar::store))]
    Store {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Export error: {message}")]
    #[diagnostic(code(tokvar::export))]
    Export {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl TokvarError {
    /// Shorthand for a parse error without help text.
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            help: None,
        }
    }

    /// Shorthand for a store error without help text.
    pub(crate) fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TokvarError>;
