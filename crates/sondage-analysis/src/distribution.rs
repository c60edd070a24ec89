//! Distribution of individuals across the categories of a column.

use sondage_stats::frequency::FrequencyTable;
use sondage_table::{Column, ColumnKind, CsvExport, ExportError, Table, Value};

/// Header of the count column in distribution tables.
pub const COUNT_COLUMN: &str = "Effectif";

/// Value counts of one column, ordered by descending count.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    column: String,
    kind: ColumnKind,
    frequencies: FrequencyTable<Value>,
}

impl Distribution {
    /// Counts the non-null values of `column`.
    ///
    /// Returns `None` if the table has no such column.
    #[must_use]
    pub fn of(table: &Table, column: &str) -> Option<Self> {
        let source = table.column(column)?;
        Some(Self {
            column: column.to_owned(),
            kind: source.kind(),
            frequencies: FrequencyTable::from_values(source.non_null().cloned()),
        })
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn frequencies(&self) -> &FrequencyTable<Value> {
        &self.frequencies
    }

    /// The distribution as a two-column table `[<column>, Effectif]`.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let (values, counts): (Vec<_>, Vec<_>) = self
            .frequencies
            .iter()
            .map(|(value, count)| {
                let count = i64::try_from(count).unwrap_or(i64::MAX);
                (value.clone(), Value::Int(count))
            })
            .unzip();
        Table::new(vec![
            Column::new(self.column.clone(), self.kind, values),
            Column::new(COUNT_COLUMN, ColumnKind::Int, counts),
        ])
        .unwrap_or_default()
    }

    /// Download file name, `repartition_<column>.csv`.
    ///
    /// Path separators in the column name are replaced with `_`.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        let column = self.column.replace(['/', '\\'], "_");
        format!("repartition_{column}.csv")
    }

    pub fn export(&self) -> Result<CsvExport, ExportError> {
        CsvExport::new(self.export_file_name(), &self.to_table())
    }
}

/// Computes the distribution of each selected column, in selection order.
///
/// Unknown columns are skipped. An empty selection yields no distributions.
pub fn distributions<S>(table: &Table, columns: &[S]) -> Vec<Distribution>
where
    S: AsRef<str>,
{
    columns
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let distribution = Distribution::of(table, name);
            if distribution.is_none() {
                tracing::warn!(column = name, "distribution requested for unknown column");
            }
            distribution
        })
        .collect()
}
