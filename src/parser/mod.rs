//! CSV reading with encoding and delimiter auto-detection.
//!
//! Rows come back as ordered JSON objects keyed by column header, in
//! source column order. A missing or empty cell becomes `Value::Null`;
//! everything downstream treats that as an absent field. No stock-item
//! logic lives here.

use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use crate::error::{CsvError, CsvResult};

/// One input row: column name to raw string value, or null for an
/// absent/empty cell. Insertion order is source column order.
pub type RawRecord = Map<String, Value>;

/// Result of reading a CSV source, with detection metadata.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows.
    pub records: Vec<RawRecord>,
    /// Detected or requested encoding.
    pub encoding: String,
    /// Detected or requested delimiter.
    pub delimiter: char,
    /// Column headers.
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            Ok(String::from_utf8_lossy(bytes).to_string())
        }
    }
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read CSV text into rows with an explicit delimiter.
///
/// # Example
/// ```ignore
/// use stockload::parser::read_records;
///
/// let csv = "name,age\nAlice,30\nBob,25";
/// let (headers, rows) = read_records(csv, ',').unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0]["name"], "Alice");
/// ```
pub fn read_records(content: &str, delimiter: char) -> CsvResult<(Vec<String>, Vec<RawRecord>)> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;

        let mut record = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let cell = row.get(i).map(str::trim).unwrap_or("");
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell.to_string())
            };
            record.insert(header.clone(), value);
        }

        records.push(record);
    }

    Ok((headers, records))
}

/// Read a CSV file with auto-detection of encoding and delimiter.
pub fn read_file(path: impl AsRef<Path>) -> CsvResult<ParseResult> {
    read_file_with(path, None)
}

/// Read a CSV file, optionally overriding the detected delimiter.
pub fn read_file_with(path: impl AsRef<Path>, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    read_bytes(&bytes, delimiter)
}

/// Read CSV bytes, auto-detecting encoding and (unless given) delimiter.
pub fn read_bytes(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    debug!(%encoding, %delimiter, "reading csv input");

    let (headers, records) = read_records(&content, delimiter)?;

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let csv = "name,age\nAlice,30\nBob,25";
        let (headers, rows) = read_records(csv, ',').unwrap();

        assert_eq!(headers, vec!["name", "age"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Alice");
        assert_eq!(rows[0]["age"], "30");
        assert_eq!(rows[1]["name"], "Bob");
    }

    #[test]
    fn test_empty_cells_become_null() {
        let csv = "a,b,c\n1,,3";
        let (_, rows) = read_records(csv, ',').unwrap();

        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], Value::Null);
        assert_eq!(rows[0]["c"], "3");
    }

    #[test]
    fn test_short_rows_padded_with_null() {
        let csv = "a,b,c\n1,2";
        let (_, rows) = read_records(csv, ',').unwrap();

        assert_eq!(rows[0]["b"], "2");
        assert_eq!(rows[0]["c"], Value::Null);
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name,note\n\"Widget, large\",\"has a comma\"";
        let (_, rows) = read_records(csv, ',').unwrap();

        assert_eq!(rows[0]["name"], "Widget, large");
        assert_eq!(rows[0]["note"], "has a comma");
    }

    #[test]
    fn test_column_order_preserved() {
        let csv = "z,m,a\n1,2,3";
        let (_, rows) = read_records(csv, ',').unwrap();

        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["z", "m", "a"]);
    }

    #[test]
    fn test_empty_csv_error() {
        let result = read_records("", ',');
        assert!(matches!(result, Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_pipe() {
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_auto_read() {
        let csv = "item id;price\n7;$10.00";
        let result = read_bytes(csv.as_bytes(), None).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.headers, vec!["item id", "price"]);
        assert_eq!(result.records[0]["price"], "$10.00");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert!(decoded.contains("Soci"));
    }
}
