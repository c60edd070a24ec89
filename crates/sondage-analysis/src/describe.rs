//! Head preview and descriptive statistics of a table.

use sondage_stats::{
    descriptive::DescriptiveStats, frequency::FrequencyTable, percentiles::Percentiles,
};
use sondage_table::{Column, ColumnKind, Table, Value};

/// Rows shown by the data preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Name of the leading column of [`describe`] holding the statistic labels.
pub const STATISTIC_COLUMN: &str = "statistic";

const PERCENTILE_POINTS: [f64; 3] = [25.0, 50.0, 75.0];

const CATEGORICAL_LABELS: [&str; 4] = ["count", "unique", "top", "freq"];
const NUMERIC_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Returns the first `n` rows of the table.
#[must_use]
pub fn preview_head(table: &Table, n: usize) -> Table {
    table.head(n)
}

/// Summary of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSummary {
    Numeric {
        count: usize,
        stats: Option<DescriptiveStats>,
        percentiles: Percentiles,
    },
    Categorical {
        count: usize,
        unique: usize,
        top: Option<(Value, usize)>,
    },
}

impl ColumnSummary {
    #[must_use]
    pub fn of(column: &Column) -> Self {
        if column.kind().is_numeric() {
            let mut values = column.numbers().collect::<Vec<_>>();
            values.sort_by(f64::total_cmp);
            Self::Numeric {
                count: values.len(),
                stats: DescriptiveStats::from_sorted(&values),
                percentiles: Percentiles::from_sorted(&values, &PERCENTILE_POINTS),
            }
        } else {
            let frequencies = FrequencyTable::from_values(column.non_null().cloned());
            Self::Categorical {
                count: frequencies.total(),
                unique: frequencies.len(),
                top: frequencies.top().map(|(value, freq)| (value.clone(), freq)),
            }
        }
    }

    /// The cell of this summary for a statistic label; null when not applicable.
    #[must_use]
    pub fn cell(&self, label: &str) -> Value {
        match (self, label) {
            (Self::Numeric { count, .. } | Self::Categorical { count, .. }, "count") => {
                Value::Int(as_int(*count))
            }
            (Self::Categorical { unique, .. }, "unique") => Value::Int(as_int(*unique)),
            (Self::Categorical { top: Some((top, _)), .. }, "top") => top.clone(),
            (Self::Categorical { top: Some((_, freq)), .. }, "freq") => Value::Int(as_int(*freq)),
            (Self::Numeric { stats: Some(stats), .. }, "mean") => Value::Float(stats.mean),
            (Self::Numeric { stats: Some(stats), .. }, "std") => stats.std_dev.into(),
            (Self::Numeric { stats: Some(stats), .. }, "min") => Value::Float(stats.min),
            (Self::Numeric { stats: Some(stats), .. }, "max") => Value::Float(stats.max),
            (Self::Numeric { count, percentiles, .. }, label) if *count > 0 => label
                .strip_suffix('%')
                .and_then(|p| p.parse::<f64>().ok())
                .and_then(|p| percentiles.get(p))
                .map_or(Value::Null, Value::Float),
            _ => Value::Null,
        }
    }
}

fn as_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// The statistic labels for a table, in `describe` order.
///
/// Categorical statistics come first when the table has a non-numeric column,
/// numeric statistics follow when it has a numeric column.
#[must_use]
pub fn statistic_labels(table: &Table) -> Vec<&'static str> {
    let has_numeric = table.columns().iter().any(|c| c.kind().is_numeric());
    let has_other = table.columns().iter().any(|c| !c.kind().is_numeric());
    let mut labels = Vec::new();
    if has_other {
        labels.extend(CATEGORICAL_LABELS);
    }
    if has_numeric {
        // "count" is shared with the categorical statistics
        labels.extend(&NUMERIC_LABELS[usize::from(has_other)..]);
    }
    labels
}

/// Summarizes every column of the table.
///
/// The result has a leading [`STATISTIC_COLUMN`] with the statistic labels,
/// then one column per source column. Numeric columns get count, mean, sample
/// standard deviation, min, quartiles and max; other columns get count, number
/// of distinct values, most frequent value and its frequency.
#[must_use]
pub fn describe(table: &Table) -> Table {
    let labels = statistic_labels(table);
    let mut columns = vec![Column::new(
        STATISTIC_COLUMN,
        ColumnKind::Text,
        labels.iter().map(|&label| Value::from(label)).collect(),
    )];
    for column in table.columns() {
        let summary = ColumnSummary::of(column);
        let cells = labels.iter().map(|label| summary.cell(label)).collect();
        columns.push(Column::from_values(column.name(), cells));
    }
    tracing::debug!(columns = table.column_count(), "table described");
    Table::new(columns).unwrap_or_default()
}
