//! Error types for loading and saving configuration files.
//!
//! There are two tiers:
//!
//! - **Fatal** – [`StoreError::UnknownFormat`].  The path's extension has no
//!   registered format, which is a programming error at the call site.
//!   [`crate::store::load`] and [`crate::store::save`] panic on it; only the
//!   `try_*` variants hand it back as a value.
//! - **Recoverable** – every other variant.  These carry the path and the
//!   underlying cause and are meant to be matched on by the caller.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Boxed error returned by user-supplied formats.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the store's load and save routines.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No format is registered for the path's extension.
    #[error("store: unknown configuration format {extension:?} for {path}")]
    UnknownFormat { path: PathBuf, extension: String },

    /// The value could not be serialized.
    #[error("store: failed to marshal {path}: {source}")]
    Marshal {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// The file content could not be deserialized into the target type.
    #[error("store: failed to unmarshal {path}: {source}")]
    Unmarshal {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// A parent directory could not be created.
    #[error("store: failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The serialized bytes could not be written.
    #[error("store: failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be read, and writing the default value in its
    /// place failed too.  `read` is the original read error; the save
    /// failure is the source.
    #[error("store: failed to read {path}: {read}")]
    CreateDefault {
        path: PathBuf,
        read: io::Error,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Returns `true` for the unknown-format condition, which signals misuse
    /// rather than a runtime failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::UnknownFormat { .. })
    }

    /// The path the failed operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            StoreError::UnknownFormat { path, .. }
            | StoreError::Marshal { path, .. }
            | StoreError::Unmarshal { path, .. }
            | StoreError::CreateDir { path, .. }
            | StoreError::Write { path, .. }
            | StoreError::CreateDefault { path, .. } => path,
        }
    }
}

/// Errors produced by a [`crate::format::Format`] implementation.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("json: {0}")]
    Json(#[source] serde_json::Error),

    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("toml: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("toml: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    /// A text format was handed bytes that are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The caller's value could not be converted to or from a document.
    #[error("{0}")]
    Document(#[source] serde_json::Error),

    /// The document has a shape the format cannot represent.
    #[error("unsupported document: {0}")]
    Unsupported(String),

    /// Failure reported by a user-registered format.
    #[error("{0}")]
    Custom(#[source] BoxError),
}

impl FormatError {
    /// Wraps any error (or message) from a custom format.
    pub fn custom<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        FormatError::Custom(err.into())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
