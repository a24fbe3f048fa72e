//! Error types for the segmenter.
//!
//! Splitting itself never fails: every splitter degrades through its fallback
//! ladder instead. `SegmenterError` covers the plumbing around it, i.e.
//! loading configuration, reading input files and writing output.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the segmenter library.
#[derive(Debug, Error)]
pub enum SegmenterError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input file is not valid UTF-8 text.
    #[error("Input is not valid UTF-8 text: {}", .path.display())]
    InputNotUtf8 { path: PathBuf },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for segmenter operations.
pub type Result<T> = std::result::Result<T, SegmenterError>;
