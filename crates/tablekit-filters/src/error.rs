//! Error types for the filters crate.
//!
//! Normalization and merging never fail. These errors only come from the
//! edges: loading a registry and strictly decoding values from their string
//! form.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading registries or decoding filter values.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Registry content was not valid YAML.
    #[error("invalid registry YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Registry content was not valid JSON.
    #[error("invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Registry file could not be read.
    #[error("failed to read registry file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry file has an extension we don't know how to parse.
    #[error("unsupported registry file extension: {0}")]
    UnsupportedExtension(PathBuf),

    /// The same column key appears twice in one table.
    #[error("duplicate filter column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// Unknown operator name.
    #[error("unknown filter operator '{0}'")]
    UnknownOperator(String),

    /// Filter mode was neither `all` nor `any`.
    #[error("invalid filter mode '{0}' (expected 'all' or 'any')")]
    InvalidFilterMode(String),

    /// A quick filter range held more than one separator.
    #[error("malformed date range '{0}' (expected 'from|to')")]
    MalformedDateRange(String),

    /// Unknown filter type name.
    #[error("unknown filter type '{0}'")]
    UnknownFilterType(String),
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
