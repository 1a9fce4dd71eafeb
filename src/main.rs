//! Stockload CLI - Convert stock item CSV exports to JSON
//!
//! # Main Commands
//!
//! ```bash
//! stockload convert items.csv -o items.json   # Convert CSV to JSON documents
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! stockload parse items.csv                   # Just read CSV to raw JSON rows
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use stockload::{convert_file, read_file_with, Config, ConvertOptions, CurrencyMode, NullMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stockload")]
#[command(about = "Convert stock item CSV exports to JSON document collections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file to a JSON document collection
    Convert {
        /// Input CSV file
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Render null fields as JSON null instead of the "nil" sentinel
        #[arg(long)]
        strict_nulls: bool,

        /// Parse prices as exact decimals instead of floating point
        #[arg(long)]
        strict_currency: bool,
    },

    /// Read a CSV file and output its raw rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            delimiter,
            strict_nulls,
            strict_currency,
        } => cmd_convert(&input, &output, delimiter, strict_nulls, strict_currency),

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    delimiter: Option<char>,
    strict_nulls: bool,
    strict_currency: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting: {}", input.display());

    let options = ConvertOptions {
        delimiter,
        config: Config {
            nulls: if strict_nulls {
                NullMode::Strict
            } else {
                NullMode::Relaxed
            },
            currency: if strict_currency {
                CurrencyMode::Strict
            } else {
                CurrencyMode::Relaxed
            },
        },
    };

    let summary = convert_file(input, output, &options)?;

    eprintln!("   Encoding: {}", summary.csv_info.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        format_delimiter(summary.csv_info.delimiter)
    );
    eprintln!("   Columns: {}", summary.csv_info.headers.join(", "));
    eprintln!("✅ Converted {} rows", summary.documents);
    eprintln!("💾 Output written to: {}", output.display());

    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = read_file_with(input, delimiter)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
