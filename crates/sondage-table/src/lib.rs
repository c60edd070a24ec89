//! In-memory tabular data for the sondage dashboard.
//!
//! This crate provides the data model shared by every dashboard component:
//!
//! - **Values**: [`Value`], a nullable cell holding a bool, integer, float or text
//! - **Columns**: [`Column`], a named sequence of values with an inferred [`ColumnKind`]
//! - **Tables**: [`Table`], an ordered collection of equally long columns
//! - **Loading**: [`loader`] parses uploaded CSV and XLSX files into a table
//! - **Exporting**: [`export`] renders a table back to UTF-8 CSV for download
//!
//! # Examples
//!
//! ```
//! use sondage_table::{ColumnKind, loader};
//!
//! let table = loader::load("people.csv", b"name,age\nAda,36\nAlan,41\n").unwrap();
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column("age").unwrap().kind(), ColumnKind::Int);
//! assert_eq!(table.categorical_columns(), ["name"]);
//! ```

pub use self::{
    column::{Column, ColumnKind},
    export::{CsvExport, ExportError},
    loader::{FileFormat, LoadError},
    table::{Table, TableError},
    value::Value,
};

pub mod column;
pub mod export;
pub mod loader;
pub mod table;
pub mod value;
