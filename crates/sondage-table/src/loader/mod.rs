//! Parsing uploaded files into a [`Table`].
//!
//! The format is chosen from the file name extension: `.csv` files are read
//! as comma-separated text, `.xlsx` files as spreadsheets (first worksheet).
//! In both cases the first row holds the column names.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::Table;

mod delimited;
mod spreadsheet;

/// Cell contents treated as missing when reading text cells.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("unsupported file format '{file_name}' (expected .csv or .xlsx)")]
    UnsupportedFormat { file_name: String },
    #[display("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("no columns to parse from file")]
    Empty,
    #[display("malformed CSV at line {line}: expected {expected} fields, saw {found}")]
    Malformed {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[display("invalid CSV: {_0}")]
    Csv(csv::Error),
    #[display("invalid spreadsheet: {_0}")]
    Spreadsheet(calamine::XlsxError),
}

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FileFormat {
    #[display("CSV")]
    Csv,
    #[display("XLSX")]
    Xlsx,
}

impl FileFormat {
    /// Detects the format from a file name extension (case-insensitive).
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else if extension.eq_ignore_ascii_case("xlsx") {
            Some(Self::Xlsx)
        } else {
            None
        }
    }
}

/// Parses an uploaded file.
pub fn load(file_name: &str, bytes: &[u8]) -> Result<Table, LoadError> {
    let format =
        FileFormat::from_file_name(file_name).ok_or_else(|| LoadError::UnsupportedFormat {
            file_name: file_name.to_owned(),
        })?;
    let table = match format {
        FileFormat::Csv => delimited::read(bytes)?,
        FileFormat::Xlsx => spreadsheet::read(bytes)?,
    };
    tracing::info!(
        file_name,
        %format,
        rows = table.row_count(),
        columns = table.column_count(),
        "table loaded"
    );
    Ok(table)
}

/// Reads and parses a file from disk.
pub fn load_path(path: &Path) -> Result<Table, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    load(&file_name, &bytes)
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Names blank headers `Unnamed: <index>` and suffixes repeated names with `.1`, `.2`, ...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            };
            let mut name = base.clone();
            let mut suffix = 0;
            while seen.contains(&name) {
                suffix += 1;
                name = format!("{base}.{suffix}");
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}
