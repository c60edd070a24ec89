//! Random sampling of table rows.
//!
//! Two modes are supported:
//!
//! - **Simple random**: `size` rows drawn uniformly without replacement.
//! - **Stratified proportional**: every stratum (distinct value of a
//!   categorical column) contributes `round(size / rows × stratum size)` rows.
//!   Each stratum is rounded independently, so the total only approximates
//!   the requested size.
//!
//! Draws are seeded, so identical inputs always give identical samples.

use std::collections::BTreeMap;

use rand::{SeedableRng as _, seq::index};
use rand_pcg::Pcg64;
use sondage_table::{CsvExport, ExportError, Table, Value};

/// Seed used for every draw unless configured otherwise.
pub const DEFAULT_SEED: u64 = 42;

/// Preferred sample size, capped by the number of rows.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

pub const SIMPLE_EXPORT_FILE_NAME: &str = "echantillon.csv";
pub const STRATIFIED_EXPORT_FILE_NAME: &str = "echantillon_stratifie.csv";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display, derive_more::IsVariant,
)]
pub enum SamplingMode {
    #[default]
    #[display("Simple random")]
    SimpleRandom,
    #[display("Stratified proportional")]
    Stratified,
}

impl SamplingMode {
    #[must_use]
    pub fn export_file_name(self) -> &'static str {
        match self {
            Self::SimpleRandom => SIMPLE_EXPORT_FILE_NAME,
            Self::Stratified => STRATIFIED_EXPORT_FILE_NAME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SampleError {
    #[display("No categorical variable available.")]
    NoCategoricalColumn,
    #[display("unknown column '{name}'")]
    UnknownColumn { name: String },
    #[display("column '{name}' is not categorical")]
    NotCategorical { name: String },
    #[display("sample size {size} is outside 1..={max}")]
    SizeOutOfRange { size: usize, max: usize },
}

/// Rows drawn from one stratum.
#[derive(Debug, Clone, PartialEq)]
pub struct StratumDraw {
    pub value: Value,
    pub population: usize,
    pub drawn: usize,
}

/// A row subset of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    mode: SamplingMode,
    rows: Vec<usize>,
    table: Table,
    strata: Vec<StratumDraw>,
}

impl Sample {
    #[must_use]
    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    /// Indices of the drawn rows in the source table, in draw order.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// The drawn rows.
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Per-stratum draw counts; empty for simple random samples.
    #[must_use]
    pub fn strata(&self) -> &[StratumDraw] {
        &self.strata
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn export(&self) -> Result<CsvExport, ExportError> {
        CsvExport::new(self.mode.export_file_name(), &self.table)
    }
}

/// Default sample size for a table: [`DEFAULT_SAMPLE_SIZE`] capped by its row count.
#[must_use]
pub fn default_size(row_count: usize, preferred: usize) -> usize {
    preferred.min(row_count)
}

fn check_size(size: usize, row_count: usize) -> Result<(), SampleError> {
    if (1..=row_count).contains(&size) {
        Ok(())
    } else {
        Err(SampleError::SizeOutOfRange {
            size,
            max: row_count,
        })
    }
}

/// Draws `size` distinct rows uniformly at random.
pub fn simple_random(table: &Table, size: usize, seed: u64) -> Result<Sample, SampleError> {
    check_size(size, table.row_count())?;
    let mut rng = Pcg64::seed_from_u64(seed);
    let rows = index::sample(&mut rng, table.row_count(), size).into_vec();
    tracing::debug!(size, seed, "simple random sample drawn");
    Ok(Sample {
        mode: SamplingMode::SimpleRandom,
        table: table.take_rows(&rows),
        rows,
        strata: vec![],
    })
}

/// Draws a proportionally stratified sample.
///
/// Strata are the distinct non-null values of `column`, processed in
/// ascending order. Each stratum draws `fraction × stratum size` rows rounded
/// half to even, where `fraction = size / row count`, using a generator
/// freshly seeded with `seed`. Rows with a missing stratum are never drawn.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn stratified(
    table: &Table,
    column: &str,
    size: usize,
    seed: u64,
) -> Result<Sample, SampleError> {
    if table.categorical_columns().is_empty() {
        return Err(SampleError::NoCategoricalColumn);
    }
    let strata_column = table
        .column(column)
        .ok_or_else(|| SampleError::UnknownColumn {
            name: column.to_owned(),
        })?;
    if !strata_column.is_categorical() {
        return Err(SampleError::NotCategorical {
            name: column.to_owned(),
        });
    }
    check_size(size, table.row_count())?;

    let mut groups: BTreeMap<&Value, Vec<usize>> = BTreeMap::new();
    for (row, value) in strata_column.values().iter().enumerate() {
        if !value.is_null() {
            groups.entry(value).or_default().push(row);
        }
    }

    let fraction = size as f64 / table.row_count() as f64;
    let mut rows = Vec::new();
    let mut strata = Vec::with_capacity(groups.len());
    for (value, members) in groups {
        let population = members.len();
        let drawn = ((fraction * population as f64).round_ties_even() as usize).min(population);
        let mut rng = Pcg64::seed_from_u64(seed);
        rows.extend(index::sample(&mut rng, population, drawn).into_iter().map(|i| members[i]));
        strata.push(StratumDraw {
            value: value.clone(),
            population,
            drawn,
        });
    }

    tracing::debug!(
        column,
        requested = size,
        drawn = rows.len(),
        strata = strata.len(),
        "stratified sample drawn"
    );
    Ok(Sample {
        mode: SamplingMode::Stratified,
        table: table.take_rows(&rows),
        rows,
        strata,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use sondage_table::{Column, loader};

    use super::*;

    /// 10 rows: stratum "a" has 5 rows, "b" 3 rows, "c" 2 rows.
    fn table() -> Table {
        let strata = ["a", "b", "a", "c", "a", "b", "a", "c", "b", "a"];
        Table::new(vec![
            Column::from_values("id", (0..10).map(Value::Int).collect()),
            Column::from_values("group", strata.into_iter().map(Value::from).collect()),
        ])
        .unwrap()
    }

    #[test]
    fn test_simple_random_is_deterministic() {
        let table = table();
        for size in 1..=table.row_count() {
            let first = simple_random(&table, size, DEFAULT_SEED).unwrap();
            let second = simple_random(&table, size, DEFAULT_SEED).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.len(), size);
            assert_eq!(first.table().row_count(), size);
            let distinct = first.rows().iter().collect::<HashSet<_>>();
            assert_eq!(distinct.len(), size);
        }
    }

    #[test]
    fn test_simple_random_rows_match_source() {
        let table = table();
        let sample = simple_random(&table, 4, 7).unwrap();
        for (i, &row) in sample.rows().iter().enumerate() {
            assert_eq!(sample.table().row(i), table.row(row));
        }
    }

    #[test]
    fn test_simple_random_size_bounds() {
        let table = table();
        assert_eq!(
            simple_random(&table, 0, DEFAULT_SEED),
            Err(SampleError::SizeOutOfRange { size: 0, max: 10 })
        );
        assert!(simple_random(&table, 11, DEFAULT_SEED).is_err());
    }

    #[test]
    fn test_stratified_counts_per_stratum() {
        let sample = stratified(&table(), "group", 4, DEFAULT_SEED).unwrap();
        // fraction 0.4: a = round(2.0) = 2, b = round(1.2) = 1, c = round(0.8) = 1
        let drawn = sample
            .strata()
            .iter()
            .map(|s| (s.value.to_string(), s.population, s.drawn))
            .collect::<Vec<_>>();
        assert_eq!(
            drawn,
            [
                ("a".to_owned(), 5, 2),
                ("b".to_owned(), 3, 1),
                ("c".to_owned(), 2, 1)
            ]
        );
        assert_eq!(sample.len(), 4);
        let groups = sample.table().column("group").unwrap().values();
        assert_eq!(&groups[..2], &[Value::from("a"), Value::from("a")]);
        assert_eq!(groups[2], Value::from("b"));
        assert_eq!(groups[3], Value::from("c"));
    }

    #[test]
    fn test_stratified_total_is_approximate() {
        // fraction 0.5: a = round(2.5) = 2, b = round(1.5) = 2, c = round(1.0) = 1
        let sample = stratified(&table(), "group", 5, DEFAULT_SEED).unwrap();
        assert_eq!(sample.len(), 5);
        // fraction 0.3: a = round(1.5) = 2, b = round(0.9) = 1, c = round(0.6) = 1
        let sample = stratified(&table(), "group", 3, DEFAULT_SEED).unwrap();
        assert_eq!(sample.len(), 4);
        assert!(sample.strata().iter().all(|s| s.drawn >= 1));
    }

    #[test]
    fn test_stratified_is_deterministic() {
        let first = stratified(&table(), "group", 6, DEFAULT_SEED).unwrap();
        let second = stratified(&table(), "group", 6, DEFAULT_SEED).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.mode(), SamplingMode::Stratified);
    }

    #[test]
    fn test_stratified_skips_missing_strata() {
        let table = loader::load("t.csv", b"g,v\nx,1\n,2\nx,3\n,4\n").unwrap();
        let sample = stratified(&table, "g", 4, DEFAULT_SEED).unwrap();
        assert_eq!(sample.strata().len(), 1);
        assert_eq!(sample.len(), 2);
        assert!(sample.rows().iter().all(|row| [0, 2].contains(row)));
    }

    #[test]
    fn test_stratified_requires_categorical_column() {
        let numeric = loader::load("t.csv", b"a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(
            stratified(&numeric, "a", 1, DEFAULT_SEED),
            Err(SampleError::NoCategoricalColumn)
        );
        assert!(matches!(
            stratified(&table(), "id", 1, DEFAULT_SEED),
            Err(SampleError::NotCategorical { .. })
        ));
        assert!(matches!(
            stratified(&table(), "nope", 1, DEFAULT_SEED),
            Err(SampleError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_export_names_and_round_trip() {
        let table = table();
        let sample = simple_random(&table, 3, DEFAULT_SEED).unwrap();
        let export = sample.export().unwrap();
        assert_eq!(export.file_name, SIMPLE_EXPORT_FILE_NAME);
        let reloaded = loader::load(&export.file_name, &export.bytes).unwrap();
        assert_eq!(&reloaded, sample.table());

        let sample = stratified(&table, "group", 5, DEFAULT_SEED).unwrap();
        assert_eq!(sample.export().unwrap().file_name, STRATIFIED_EXPORT_FILE_NAME);
    }

    #[test]
    fn test_default_size() {
        assert_eq!(default_size(1000, DEFAULT_SAMPLE_SIZE), 100);
        assert_eq!(default_size(12, DEFAULT_SAMPLE_SIZE), 12);
    }
}
