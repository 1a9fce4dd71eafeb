//! Error types for the stockload conversion pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ParseError`] - field-level value parsing errors
//! - [`TransformError`] - record transformation errors
//! - [`CsvError`] - CSV reading errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Field Parsing Errors
// =============================================================================

/// Errors raised when a raw field value cannot be converted by its
/// assigned parser. Raised only on malformed numeric text; absent values
/// never produce an error.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Text that should be an integer identifier is not.
    #[error("Invalid integer value: '{0}'")]
    InvalidInteger(String),

    /// Text that should be a whole-number quantity is not.
    #[error("Invalid quantity value: '{0}'")]
    InvalidQuantity(String),

    /// Price text with a non-numeric remainder after sign and currency
    /// symbol stripping.
    #[error("Invalid price value: '{0}'")]
    InvalidPrice(String),
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors during record transformation (dispatch and key raising).
#[derive(Debug, Error)]
pub enum TransformError {
    /// A field's value failed its assigned parser.
    #[error("Field '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: ParseError,
    },

    /// A grouping pattern must capture exactly three groups
    /// (group name, group index, field name).
    #[error("Group pattern must capture exactly 3 groups, found {found}")]
    PatternArity { found: usize },

    /// A plain key and a raised group name target the same top-level slot.
    #[error("Key '{key}' collides with a raised group of the same name")]
    GroupCollision { key: String },

    /// A rule or grouping pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors during CSV reading.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the input bytes.
    #[error("Failed to decode input: {0}")]
    EncodingError(String),

    /// Malformed delimited text.
    #[error("Invalid CSV format: {0}")]
    Malformed(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the main error type returned by
/// [`crate::transform::pipeline::convert_file`]. It wraps all lower-level
/// errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Output writing error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV reading operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
