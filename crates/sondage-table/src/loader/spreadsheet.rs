use std::io::Cursor;

use calamine::{Data, Reader as _, Xlsx};

use crate::{
    Column, Table, Value,
    loader::{LoadError, is_missing, normalize_headers},
};

/// Largest magnitude below which every integral float is exactly an `i64`.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

pub(super) fn read(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut workbook: Xlsx<_> =
        calamine::open_workbook_from_rs(Cursor::new(bytes)).map_err(LoadError::Spreadsheet)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::Empty)?
        .map_err(LoadError::Spreadsheet)?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(LoadError::Empty)?;
    let names = normalize_headers(header.iter().map(header_name).collect());

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(row.get(i).map_or(Value::Null, cell_value));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::from_values(name, values))
        .collect();
    Table::new(columns).map_err(|_| LoadError::Empty)
}

fn header_name(cell: &Data) -> String {
    match cell_value(cell) {
        Value::Null => String::new(),
        value => value.to_string(),
    }
}

/// Converts a spreadsheet cell.
///
/// Integral floats become integers, empty and error cells become null, and
/// date or duration cells are kept as text.
#[expect(clippy::cast_possible_truncation)]
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(v) => Value::Int(*v),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT => Value::Int(*v as i64),
        Data::Float(v) => Value::Float(*v),
        Data::Bool(v) => Value::Bool(*v),
        Data::String(s) if is_missing(s) => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use calamine::CellErrorType;
    use rust_xlsxwriter::Workbook;

    use super::*;
    use crate::{ColumnKind, loader};

    /// A workbook whose first sheet holds a small survey and whose second
    /// sheet must be ignored.
    fn survey_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in ["city", "age", "score", "age"].into_iter().enumerate() {
            sheet.write_string(0, u16::try_from(col).unwrap(), name).unwrap();
        }
        sheet.write_string(1, 0, "Lyon").unwrap();
        sheet.write_number(1, 1, 30.0).unwrap();
        sheet.write_number(1, 2, 2.5).unwrap();
        sheet.write_number(1, 3, 1.0).unwrap();
        sheet.write_string(2, 0, "Paris").unwrap();
        sheet.write_number(2, 1, 41.0).unwrap();
        sheet.write_number(3, 1, 25.0).unwrap();
        sheet.write_number(3, 2, 3.0).unwrap();

        let other = workbook.add_worksheet();
        other.write_string(0, 0, "ignored").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_read_first_sheet() {
        let table = loader::load("survey.xlsx", &survey_workbook()).unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            ["city", "age", "score", "age.1"]
        );
        assert_eq!(table.row_count(), 3);

        let age = table.column("age").unwrap();
        assert_eq!(age.kind(), ColumnKind::Int);
        assert_eq!(age.values(), &[Value::Int(30), Value::Int(41), Value::Int(25)]);

        let city = table.column("city").unwrap();
        assert_eq!(city.kind(), ColumnKind::Text);
        assert_eq!(city.values()[2], Value::Null);

        let score = table.column("score").unwrap();
        assert_eq!(score.kind(), ColumnKind::Float);
        assert_eq!(
            score.values(),
            &[Value::Float(2.5), Value::Null, Value::Float(3.0)]
        );

        // trailing cells of short rows are padded with nulls
        assert_eq!(
            table.column("age.1").unwrap().values(),
            &[Value::Float(1.0), Value::Null, Value::Null]
        );
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&Data::Float(3.0)), Value::Int(3));
        assert_eq!(cell_value(&Data::Float(2.5)), Value::Float(2.5));
        assert_eq!(cell_value(&Data::Empty), Value::Null);
        assert_eq!(cell_value(&Data::Error(CellErrorType::Div0)), Value::Null);
        assert_eq!(cell_value(&Data::String("N/A".into())), Value::Null);
        assert_eq!(cell_value(&Data::String("Lyon".into())), Value::from("Lyon"));
        assert_eq!(cell_value(&Data::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_mixed_cells_make_a_mixed_column() {
        let values = [Data::Float(1.0), Data::String("two".into()), Data::Empty]
            .iter()
            .map(cell_value)
            .collect();
        let column = Column::from_values("x", values);
        assert_eq!(column.kind(), ColumnKind::Mixed);
        assert!(column.is_categorical());
    }

    #[test]
    fn test_numeric_cells_widen_to_float() {
        let values = [Data::Float(1.0), Data::Float(1.5)]
            .iter()
            .map(cell_value)
            .collect();
        let column = Column::from_values("x", values);
        assert_eq!(column.kind(), ColumnKind::Float);
        assert_eq!(column.values(), &[Value::Float(1.0), Value::Float(1.5)]);
    }

    #[test]
    fn test_header_names() {
        assert_eq!(header_name(&Data::String("age".into())), "age");
        assert_eq!(header_name(&Data::Float(2024.0)), "2024");
        assert_eq!(header_name(&Data::Empty), "");
    }
}
