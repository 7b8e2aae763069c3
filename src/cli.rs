use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Compile semantic column types into SQL cast expressions",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile an import plan into per-column cast expressions or a full statement
    Compile(CompileArgs),
    /// Render the export projection that formats typed columns back to text
    Format(FormatArgs),
    /// Coerce sample CSV rows locally and show the values each column would load
    Preview(PreviewArgs),
    /// List the supported semantic column types
    Types,
    /// Print the effective date/time format catalog as YAML
    Catalog(CatalogArgs),
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Import plan (.yaml) describing the source columns
    #[arg(short, long)]
    pub plan: PathBuf,
    /// Format catalog overriding the one referenced by the plan
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Emit the full SELECT (or INSERT ... SELECT) statement
    #[arg(long)]
    pub statement: bool,
}

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Import plan (.yaml) describing the typed columns
    #[arg(short, long)]
    pub plan: PathBuf,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Import plan (.yaml) describing the source columns
    #[arg(short, long)]
    pub plan: PathBuf,
    /// Input CSV file holding raw sample rows ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Format catalog overriding the one referenced by the plan
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog file to validate and print instead of the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
