use crate::Value;

/// The storage type of a column, inferred when a table is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum ColumnKind {
    #[display("int")]
    Int,
    #[display("float")]
    Float,
    #[display("bool")]
    Bool,
    #[display("text")]
    Text,
    /// Heterogeneous cells, e.g. a spreadsheet column mixing numbers and text.
    #[display("mixed")]
    Mixed,
}

impl ColumnKind {
    /// Returns whether columns of this kind hold categories (text-like values).
    #[must_use]
    pub fn is_categorical(self) -> bool {
        matches!(self, Self::Text | Self::Mixed)
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Infers the kind of an already typed sequence of cells.
    ///
    /// Nulls are ignored. A column without any non-null cell is `Float`.
    pub fn infer<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut kind: Option<Self> = None;
        for value in values {
            let this = match value {
                Value::Null => continue,
                Value::Bool(_) => Self::Bool,
                Value::Int(_) => Self::Int,
                Value::Float(_) => Self::Float,
                Value::Text(_) => Self::Text,
            };
            kind = Some(match (kind, this) {
                (None, this) => this,
                (Some(prev), this) if prev == this => prev,
                (Some(Self::Int | Self::Float), Self::Int | Self::Float) => Self::Float,
                _ => return Self::Mixed,
            });
        }
        kind.unwrap_or(Self::Float)
    }
}

/// A named column of a [`Table`](crate::Table).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<Value>,
}

impl Column {
    /// Creates a column with an explicit kind.
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Creates a column, inferring its kind from the values.
    ///
    /// Integers in a column that also holds floats or missing values are
    /// widened to floats.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_values(name: impl Into<String>, mut values: Vec<Value>) -> Self {
        let mut kind = ColumnKind::infer(&values);
        if kind == ColumnKind::Int && values.iter().any(Value::is_null) {
            kind = ColumnKind::Float;
        }
        if kind == ColumnKind::Float {
            for value in &mut values {
                if let Value::Int(v) = *value {
                    *value = Value::Float(v as f64);
                }
            }
        }
        Self::new(name, kind, values)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        self.kind.is_categorical()
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// Iterates over the non-null cells.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> + '_ {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Iterates over the numeric cells as floats.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(Value::as_f64)
    }

    /// Returns a column holding the rows at `indices`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            values: indices.iter().map(|&i| self.values[i].clone()).collect(),
        }
    }

    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            values: self.values.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kinds() {
        assert_eq!(ColumnKind::infer(&[Value::Int(1), Value::Null]), ColumnKind::Int);
        assert_eq!(
            ColumnKind::infer(&[Value::Int(1), Value::Float(2.5)]),
            ColumnKind::Float
        );
        assert_eq!(
            ColumnKind::infer(&[Value::from("a"), Value::Int(1)]),
            ColumnKind::Mixed
        );
        assert_eq!(ColumnKind::infer(&[Value::Null]), ColumnKind::Float);
        assert_eq!(ColumnKind::infer(&[]), ColumnKind::Float);
    }

    #[test]
    fn test_from_values_widens_ints() {
        let column = Column::from_values("x", vec![Value::Int(1), Value::Float(0.5)]);
        assert_eq!(column.kind(), ColumnKind::Float);
        assert_eq!(column.values(), &[Value::Float(1.0), Value::Float(0.5)]);

        let column = Column::from_values("x", vec![Value::Int(30), Value::Null]);
        assert_eq!(column.kind(), ColumnKind::Float);
        assert_eq!(column.values(), &[Value::Float(30.0), Value::Null]);
    }

    #[test]
    fn test_categorical_kinds() {
        assert!(ColumnKind::Text.is_categorical());
        assert!(ColumnKind::Mixed.is_categorical());
        assert!(!ColumnKind::Bool.is_categorical());
        assert!(!ColumnKind::Int.is_categorical());
    }

    #[test]
    fn test_take_preserves_order() {
        let column = Column::from_values("x", vec![Value::Int(10), Value::Int(20), Value::Int(30)]);
        let taken = column.take(&[2, 0]);
        assert_eq!(taken.values(), &[Value::Int(30), Value::Int(10)]);
        assert_eq!(taken.kind(), ColumnKind::Int);
    }
}
