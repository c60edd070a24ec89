use crate::{Column, Value};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    #[display("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[display("unknown column '{name}'")]
    UnknownColumn { name: String },
}

/// An ordered collection of equally long named columns.
///
/// Tables are built once and never mutated; every operation returns a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, Column::len);
        if let Some(column) = columns.iter().find(|c| c.len() != row_count) {
            return Err(TableError::LengthMismatch {
                column: column.name().to_owned(),
                expected: row_count,
                found: column.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the first column named `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Names of the columns holding categories, in table order.
    #[must_use]
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_categorical())
            .map(Column::name)
            .collect()
    }

    /// Returns the cells of row `row`, in column order.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        (row < self.row_count).then(|| self.columns.iter().map(|c| &c.values()[row]).collect())
    }

    /// Returns the first `n` rows.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.head(n)).collect(),
            row_count: n.min(self.row_count),
        }
    }

    /// Returns a table holding only the named columns, in the given order.
    pub fn select<S>(&self, names: &[S]) -> Result<Self, TableError>
    where
        S: AsRef<str>,
    {
        let columns = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.column(name)
                    .cloned()
                    .ok_or_else(|| TableError::UnknownColumn {
                        name: name.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let row_count = if columns.is_empty() { 0 } else { self.row_count };
        Ok(Self { columns, row_count })
    }

    /// Returns a table holding the rows at `indices`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            row_count: indices.len(),
        }
    }
}
