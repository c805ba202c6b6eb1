//! Error types for the devtools-kotlin-gen crate.

use std::path::PathBuf;

/// Errors that can occur while generating the Kotlin client.
///
/// Every variant is fatal: the generator stops at the first error and
/// leaves whatever was already written in place.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to open or read the protocol document.
    #[error("failed to read protocol from {path}: {source}")]
    SchemaRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The protocol document is not valid JSON or does not match the
    /// expected shape.
    #[error("failed to parse protocol JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A type, property or parameter descriptor has neither a recognized
    /// primitive type nor a reference.
    #[error("unknown type descriptor in domain '{domain}', field '{field}' (type: {tag})")]
    UnknownDescriptor {
        domain: String,
        field: String,
        tag: String,
    },

    /// Failed to write a generated file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rendering a generated file failed.
    #[error("emit error: {0}")]
    Emit(String),

    /// Network error during protocol download.
    #[cfg(feature = "download")]
    #[error("download failed: {0}")]
    Download(String),
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::Emit(e.to_string())
    }
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
