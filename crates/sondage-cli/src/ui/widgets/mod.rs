pub use self::{data_table::*, frequency_chart::*, status_bar::*};

mod data_table;
mod frequency_chart;
mod status_bar;

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    pub const TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    pub const HEADER: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    pub const HIGHLIGHT: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    pub const MUTED: Style = Style::new().fg(Color::DarkGray);
    pub const SUCCESS: Style = Style::new().fg(Color::Green);
    pub const WARNING: Style = Style::new().fg(Color::Yellow);
    pub const ERROR: Style = Style::new().fg(Color::Red);
    pub const BAR: Style = Style::new().fg(Color::Blue);
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
