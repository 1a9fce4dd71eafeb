//! File-to-file conversion pipeline.
//!
//! Reads a delimited stock-item export, maps every row through
//! [`StockItemMapper`], and streams the pretty-printed documents into a
//! single JSON array. One malformed row aborts the whole conversion with
//! the offending field named in the error.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::error::{PipelineResult, TransformResult};
use crate::parser::{read_file_with, RawRecord};
use crate::transform::stockitem::StockItemMapper;

/// Options for a conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertOptions {
    /// Delimiter override; auto-detected when absent.
    pub delimiter: Option<char>,
    /// Null and currency modes.
    pub config: Config,
}

/// Input file information.
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of a completed conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
    /// Input metadata.
    pub csv_info: CsvInfo,
    /// Documents written to the output array.
    pub documents: usize,
}

/// Convert a CSV file into a JSON document-collection file.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ConvertOptions,
) -> PipelineResult<ConvertSummary> {
    let input = input.as_ref();
    let output = output.as_ref();
    debug!(input = %input.display(), output = %output.display(), "starting conversion");

    let parsed = read_file_with(input, options.delimiter)?;
    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.headers.clone(),
        row_count: parsed.records.len(),
    };

    let mapper = StockItemMapper::new(options.config)?;

    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let documents = write_array(
        &mut writer,
        parsed.records.iter().map(|row| mapper.map(row)),
    )?;

    debug!(documents, "conversion finished");

    Ok(ConvertSummary {
        csv_info,
        documents,
    })
}

/// Transform already-read rows into output documents.
pub fn convert_records(
    records: &[RawRecord],
    config: Config,
) -> TransformResult<Vec<Map<String, Value>>> {
    let mapper = StockItemMapper::new(config)?;
    records.iter().map(|row| mapper.map(row)).collect()
}

/// Stream documents into `writer` as one JSON array: elements
/// pretty-printed and separated by `,\n`, the array wrapped in `[`…`]`
/// with a trailing newline. Returns the number of elements written.
pub fn write_array<W, I>(mut writer: W, documents: I) -> PipelineResult<usize>
where
    W: Write,
    I: IntoIterator<Item = TransformResult<Map<String, Value>>>,
{
    writer.write_all(b"[\n")?;

    let mut written = 0;
    for document in documents {
        let document = document?;
        if written > 0 {
            writer.write_all(b",\n")?;
        }
        let text = serde_json::to_string_pretty(&Value::Object(document))?;
        writer.write_all(text.as_bytes())?;
        written += 1;
    }

    writer.write_all(b"\n]\n")?;
    writer.flush()?;

    Ok(written)
}
