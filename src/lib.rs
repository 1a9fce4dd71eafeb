//! # Stockload - stock item CSV to JSON conversion
//!
//! Stockload converts tabular stock-item exports into a structured JSON
//! document collection, typing fields per column and lifting flat,
//! index-suffixed columns into nested modifier lists.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│  JSON array │
//! │ (flat rows) │     │ (auto-enc)  │     │ (dispatch + │     │  (nested    │
//! └─────────────┘     └─────────────┘     │   raising)  │     │  documents) │
//!                                         └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockload::{convert_file, ConvertOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = convert_file("items.csv", "items.json", &ConvertOptions::default())?;
//!     println!("Wrote {} documents", summary.documents);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Null and currency mode configuration
//! - [`parser`] - CSV reading with auto-detection
//! - [`transform`] - Parsers, dispatch, key raising, and the pipeline

// Core modules
pub mod config;
pub mod error;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, ParseError, PipelineError, TransformError};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{Config, CurrencyMode, NullMode, NULL_SENTINEL};

// =============================================================================
// Re-exports - CSV Reading
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, read_bytes, read_file, read_file_with,
    read_records, ParseResult, RawRecord,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    collapse_group, raise_keys, raise_keys_with, FieldParser, GroupPattern, Nested, Rule, RuleSet,
    StockItemMapper,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert_file, convert_records, write_array, ConvertOptions, ConvertSummary, CsvInfo,
};
