//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs
//! and commands.

use thiserror::Error;

/// Errors that can occur while building the graph model from its
/// XML description
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("XML error in graph description: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed graph description in {file}: {reason}")]
    Format { file: String, reason: String },

    #[error("unresolved reference in {file}: {reason}")]
    Reference { file: String, reason: String },

    #[error("cannot read graph description: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while reading a statistic record stream
#[derive(Error, Debug)]
pub enum StatError {
    #[error("cannot open statistics {stat}: {source}")]
    Io {
        stat: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in {file} line {line}: {reason}")]
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },
}

/// Errors that can occur while writing report documents
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to serialize embedded data: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
