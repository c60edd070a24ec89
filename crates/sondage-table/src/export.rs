//! CSV downloads.
//!
//! Exports are UTF-8 CSV with a header row and no index column. Nulls are
//! written as empty fields.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::Table;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ExportError {
    #[display("failed to encode CSV: {_0}")]
    Encode(csv::Error),
    #[display("failed to flush CSV buffer: {_0}")]
    Flush(io::Error),
}

/// Encodes `table` as CSV bytes.
pub fn to_csv(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if table.column_count() > 0 {
        writer
            .write_record(table.column_names())
            .map_err(ExportError::Encode)?;
    }
    for row in 0..table.row_count() {
        let record = table
            .columns()
            .iter()
            .map(|column| column.values()[row].to_csv_field())
            .collect::<Vec<_>>();
        writer
            .write_record(record.iter().map(|field| field.as_bytes()))
            .map_err(ExportError::Encode)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.into_error()))
}

/// A named CSV file ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CsvExport {
    pub fn new(file_name: impl Into<String>, table: &Table) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: file_name.into(),
            bytes: to_csv(table)?,
        })
    }

    /// Writes the export into `dir` under its file name and returns the written path.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "export written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, Value, loader};

    #[test]
    fn test_to_csv_formats_values() {
        let table = Table::new(vec![
            Column::from_values("name", vec!["Ada".into(), "Lovelace, A.".into()]),
            Column::from_values("score", vec![Value::Float(2.0), Value::Null]),
            Column::from_values("ok", vec![true.into(), false.into()]),
        ])
        .unwrap();
        let csv = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        assert_eq!(
            csv,
            "name,score,ok\nAda,2.0,True\n\"Lovelace, A.\",,False\n"
        );
    }

    #[test]
    fn test_round_trip_through_loader() {
        let table = Table::new(vec![
            Column::from_values("region", vec!["North".into(), "South".into(), Value::Null]),
            Column::from_values("count", vec![Value::Int(3), Value::Int(-1), Value::Int(0)]),
            Column::from_values("ratio", vec![Value::Float(0.25), Value::Float(1.0), Value::Null]),
        ])
        .unwrap();
        let export = CsvExport::new("roundtrip.csv", &table).unwrap();
        let reloaded = loader::load(&export.file_name, &export.bytes).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::new(vec![Column::from_values("a", vec![Value::Int(1)])]).unwrap();
        let export = CsvExport::new("echantillon.csv", &table).unwrap();
        let path = export.write_to_dir(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "echantillon.csv");
        assert_eq!(fs::read_to_string(path).unwrap(), "a\n1\n");
    }
}
