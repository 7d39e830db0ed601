//! Error types for the extractor.
//!
//! Structural anomalies inside a document never surface here; they are
//! recovered locally and recorded as collection warnings. `ExtractorError`
//! covers the failures that abort a single lesson collection.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the extractor library.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// A required document is absent from a collection folder.
    #[error("Missing document '{stem}' in {}", .folder.display())]
    MissingDocument { folder: PathBuf, stem: String },

    /// The document exists but its format cannot be read directly.
    #[error("Unsupported document format '.{extension}': {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The document could not be turned into a paragraph stream.
    #[error("Unreadable document {}: {reason}", .path.display())]
    UnreadableDocument { path: PathBuf, reason: String },

    /// The DOCX container could not be opened.
    #[error("ZIP container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The outline document produced no chapters.
    #[error("No chapters found in {}", .path.display())]
    NoChapters { path: PathBuf },

    /// One or more batches of a batch run failed.
    #[error("{failed} of {total} batches failed")]
    BatchFailed { failed: usize, total: usize },

    /// The settings file is malformed.
    #[error("Invalid settings file {}: {source}", .path.display())]
    InvalidSettings {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, ExtractorError>;
