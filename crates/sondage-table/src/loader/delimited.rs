use crate::{
    Column, ColumnKind, Table, Value,
    loader::{LoadError, is_missing, normalize_headers},
};

pub(super) fn read(bytes: &[u8]) -> Result<Table, LoadError> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(LoadError::Csv)?,
        None => return Err(LoadError::Empty),
    };
    let names = normalize_headers(header.iter().map(str::to_owned).collect());
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];

    for record in records {
        let record = record.map_err(LoadError::Csv)?;
        if record.len() <= 1 && record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() > names.len() {
            return Err(LoadError::Malformed {
                line: record.position().map_or(0, csv::Position::line),
                expected: names.len(),
                found: record.len(),
            });
        }
        for (i, column) in cells.iter_mut().enumerate() {
            let cell = record.get(i).filter(|cell| !is_missing(cell));
            column.push(cell.map(str::to_owned));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| parse_column(name, cells))
        .collect();
    Table::new(columns).map_err(|_| LoadError::Empty)
}

/// Types a column of raw text cells.
///
/// The first kind every non-missing cell parses as wins, in the order
/// integer, float, bool. Otherwise the raw text is kept.
fn parse_column(name: String, cells: Vec<Option<String>>) -> Column {
    if let Some(values) = parse_all(&cells, |s| s.parse::<i64>().ok().map(Value::Int)) {
        return Column::from_values(name, values);
    }
    if let Some(values) = parse_all(&cells, |s| s.parse::<f64>().ok().map(Value::Float)) {
        return Column::new(name, ColumnKind::Float, values);
    }
    if let Some(values) = parse_all(&cells, parse_bool) {
        return Column::new(name, ColumnKind::Bool, values);
    }
    let values = cells.into_iter().map(Value::from).collect();
    Column::new(name, ColumnKind::Text, values)
}

fn parse_all<F>(cells: &[Option<String>], parse: F) -> Option<Vec<Value>>
where
    F: Fn(&str) -> Option<Value>,
{
    cells
        .iter()
        .map(|cell| match cell {
            Some(s) => parse(s.trim()),
            None => Some(Value::Null),
        })
        .collect()
}

fn parse_bool(s: &str) -> Option<Value> {
    match s {
        "True" | "TRUE" | "true" => Some(Value::Bool(true)),
        "False" | "FALSE" | "false" => Some(Value::Bool(false)),
        _ => None,
    }
}
