//! Error types for the styling system.

use std::path::PathBuf;

use crate::parser::ParseError;

/// Result type alias for style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading stylesheets.
///
/// Only loading fails loudly. Property lookups never return an error: a value
/// that cannot be transformed degrades to a default and is logged instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CSS grammar error. Rules parsed before the error point are kept.
    #[error("CSS parse error in '{}' at line {line}, column {column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        message: String,
        line: u32,
        column: u32,
    },

    /// The path does not name a regular file.
    #[error("Invalid theme file '{}'", path.display())]
    InvalidFile { path: PathBuf },

    /// File I/O error.
    #[error("Failed to read stylesheet '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Hot-reload error.
    #[cfg(feature = "hot-reload")]
    #[error("Hot-reload error: {0}")]
    HotReload(String),
}

impl Error {
    /// Create a parse error from a located parser error.
    pub fn parse(path: impl Into<PathBuf>, error: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            message: error.message,
            line: error.line,
            column: error.column,
        }
    }

    /// Create an invalid-file error.
    pub fn invalid_file(path: impl Into<PathBuf>) -> Self {
        Self::InvalidFile { path: path.into() }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if some rules may have been added before this error.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
