use ratatui::{
    layout::Constraint,
    prelude::{Buffer, Rect},
    symbols::merge::MergeStrategy,
    text::Text,
    widgets::{Block, Cell, Row, Table as TableWidget, Widget},
};
use sondage_table::Table;

use crate::ui::widgets::style;

const MAX_COLUMN_WIDTH: usize = 24;

/// Renders a [`Table`] with a header row; numeric columns are right-aligned.
#[derive(Debug)]
pub struct DataTable<'a> {
    table: &'a Table,
    title: Option<String>,
}

impl<'a> DataTable<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table, title: None }
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }
}

/// Display width of each column: the widest of its name and cells, capped.
fn column_widths(table: &Table) -> Vec<u16> {
    table
        .columns()
        .iter()
        .map(|column| {
            let widest = column
                .values()
                .iter()
                .map(|value| value.to_string().chars().count())
                .chain([column.name().chars().count()])
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH);
            u16::try_from(widest).unwrap_or(u16::MAX)
        })
        .collect()
}

impl Widget for DataTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let columns = self.table.columns();
        let header = Row::new(columns.iter().map(|column| Cell::from(column.name())))
            .style(style::HEADER);
        let rows = (0..self.table.row_count()).map(|row| {
            Row::new(columns.iter().map(|column| {
                let text = Text::from(column.values()[row].to_string());
                if column.kind().is_numeric() {
                    Cell::from(text.right_aligned())
                } else {
                    Cell::from(text)
                }
            }))
        });
        let widths = column_widths(self.table)
            .into_iter()
            .map(Constraint::Length);

        let mut block = Block::bordered().merge_borders(MergeStrategy::Exact);
        if let Some(title) = self.title {
            block = block.title(title);
        }
        TableWidget::new(rows, widths)
            .header(header)
            .column_spacing(2)
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use sondage_table::loader;

    use super::*;
    use crate::ui::widgets::buffer_text;

    fn table() -> Table {
        loader::load("t.csv", b"city,age\nLyon,30\nParis,7\n").unwrap()
    }

    #[test]
    fn test_column_widths() {
        assert_eq!(column_widths(&table()), [5, 3]);
        let long = "x".repeat(40);
        let wide = loader::load("t.csv", format!("a\n{long}\n").as_bytes()).unwrap();
        assert_eq!(column_widths(&wide), [24]);
    }

    #[test]
    fn test_renders_header_and_cells() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
        DataTable::new(&table())
            .title("Preview")
            .render(buf.area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Preview"));
        assert!(text.contains("city"));
        assert!(text.contains("Paris"));
        assert!(text.contains("  7"));
    }
}
