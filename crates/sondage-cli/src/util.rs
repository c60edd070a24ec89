use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use sondage_analysis::sampling::{Sample, SamplingMode};
use sondage_stats::cochran::SampleSize;
use sondage_table::{Column, CsvExport, Table, loader};

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

pub fn load_table(path: &Path) -> anyhow::Result<Table> {
    eprintln!("Loading table from {}...", path.display());
    let table = loader::load_path(path)
        .with_context(|| format!("Failed to load data file: {}", path.display()))?;
    eprintln!(
        "Loaded {} rows, {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

pub fn save_export(export: &CsvExport, dir: &Path) -> anyhow::Result<PathBuf> {
    let path = export
        .write_to_dir(dir)
        .with_context(|| format!("Failed to write {} to {}", export.file_name, dir.display()))?;
    Ok(path)
}

/// Writes `table` as aligned text columns.
///
/// Numeric columns are right-aligned, other columns left-aligned; missing
/// values print as `NaN`.
pub fn write_table<W>(writer: &mut W, table: &Table) -> io::Result<()>
where
    W: Write,
{
    let columns = table.columns();
    let cells = columns
        .iter()
        .map(|column| {
            column
                .values()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let widths = columns
        .iter()
        .zip(&cells)
        .map(|(column, cells)| {
            cells
                .iter()
                .map(|cell| cell.chars().count())
                .chain([column.name().chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    writeln!(
        writer,
        "{}",
        format_line(table.column_names(), columns, &widths)
    )?;
    let rule = widths
        .iter()
        .map(|&width| "-".repeat(width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(writer, "{rule}")?;
    for row in 0..table.row_count() {
        let fields = cells.iter().map(|column| column[row].as_str());
        writeln!(writer, "{}", format_line(fields, columns, &widths))?;
    }
    Ok(())
}

fn format_line<'a, I>(fields: I, columns: &[Column], widths: &[usize]) -> String
where
    I: Iterator<Item = &'a str>,
{
    let line = fields
        .zip(columns.iter().zip(widths))
        .map(|(field, (column, &width))| {
            if column.kind().is_numeric() {
                format!("{field:>width$}")
            } else {
                format!("{field:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_owned()
}

pub fn sample_size_message(result: &SampleSize) -> String {
    if result.is_corrected() {
        format!("Corrected size (finite population): {}", result.size)
    } else {
        format!("Estimated size (infinite population): {}", result.size)
    }
}

pub fn sample_message(sample: &Sample, stratify_column: Option<&str>) -> String {
    match (sample.mode(), stratify_column) {
        (SamplingMode::Stratified, Some(column)) => format!(
            "{} rows drawn proportionally to '{column}'.",
            sample.len()
        ),
        _ => format!("{} rows drawn at random.", sample.len()),
    }
}

pub fn unique_message(count: usize) -> String {
    format!("{count} unique combinations found.")
}
