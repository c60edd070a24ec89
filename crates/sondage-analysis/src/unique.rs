//! Distinct combinations of values over a subset of columns.

use std::collections::HashSet;

use sondage_table::{CsvExport, ExportError, Table, TableError};

/// Download file name of unique combinations.
pub const EXPORT_FILE_NAME: &str = "valeurs_uniques.csv";

/// The distinct rows of a table restricted to some columns.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueCombinations {
    table: Table,
    source_rows: Vec<usize>,
}

impl UniqueCombinations {
    /// The distinct rows, in order of first occurrence.
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Index in the source table of the first occurrence of each combination.
    #[must_use]
    pub fn source_rows(&self) -> &[usize] {
        &self.source_rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.source_rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_rows.is_empty()
    }

    pub fn export(&self) -> Result<CsvExport, ExportError> {
        CsvExport::new(EXPORT_FILE_NAME, &self.table)
    }
}

/// Deduplicates the rows of `table` restricted to `columns`.
///
/// Returns `Ok(None)` for an empty selection. Missing values compare equal to
/// each other.
pub fn find_unique_combinations<S>(
    table: &Table,
    columns: &[S],
) -> Result<Option<UniqueCombinations>, TableError>
where
    S: AsRef<str>,
{
    if columns.is_empty() {
        return Ok(None);
    }
    let selected = table.select(columns)?;

    let mut seen = HashSet::new();
    let source_rows = (0..selected.row_count())
        .filter(|&row| {
            let key = selected
                .columns()
                .iter()
                .map(|column| &column.values()[row])
                .collect::<Vec<_>>();
            seen.insert(key)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        columns = columns.len(),
        combinations = source_rows.len(),
        "unique combinations computed"
    );
    Ok(Some(UniqueCombinations {
        table: selected.take_rows(&source_rows),
        source_rows,
    }))
}

#[cfg(test)]
mod tests {
    use sondage_table::{Value, loader};

    use super::*;

    fn table() -> Table {
        loader::load(
            "people.csv",
            b"city,sex,age\nLyon,F,30\nParis,M,41\nLyon,F,25\nLyon,M,30\n,F,1\n,F,2\n",
        )
        .unwrap()
    }

    #[test]
    fn test_empty_selection_is_no_op() {
        assert_eq!(find_unique_combinations::<&str>(&table(), &[]).unwrap(), None);
    }

    #[test]
    fn test_distinct_combinations() {
        let table = table();
        let unique = find_unique_combinations(&table, &["city", "sex"])
            .unwrap()
            .unwrap();
        assert_eq!(unique.len(), 4);
        assert_eq!(unique.source_rows(), &[0, 1, 3, 4]);
        assert_eq!(
            unique.table().row(3).unwrap(),
            vec![&Value::Null, &Value::from("F")]
        );
    }

    #[test]
    fn test_rows_exist_in_source() {
        let table = table();
        let unique = find_unique_combinations(&table, &["sex", "age"])
            .unwrap()
            .unwrap();
        let source = table.select(&["sex", "age"]).unwrap();
        for (i, &row) in unique.source_rows().iter().enumerate() {
            assert_eq!(unique.table().row(i), source.row(row));
        }
    }

    #[test]
    fn test_unknown_column() {
        assert!(find_unique_combinations(&table(), &["nope"]).is_err());
    }

    #[test]
    fn test_export() {
        let unique = find_unique_combinations(&table(), &["sex"]).unwrap().unwrap();
        let export = unique.export().unwrap();
        assert_eq!(export.file_name, "valeurs_uniques.csv");
        assert_eq!(String::from_utf8(export.bytes).unwrap(), "sex\nF\nM\n");
    }
}
