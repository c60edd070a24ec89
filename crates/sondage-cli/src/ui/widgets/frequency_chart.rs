use ratatui::{
    prelude::{Buffer, Direction, Rect},
    symbols::merge::MergeStrategy,
    widgets::{Bar, BarChart, Block, Widget},
};
use sondage_analysis::distribution::Distribution;

use crate::ui::widgets::style;

/// Horizontal bar chart of a distribution: one bar per category, longest first.
#[derive(Debug)]
pub struct FrequencyChart<'a> {
    distribution: &'a Distribution,
}

impl<'a> FrequencyChart<'a> {
    pub fn new(distribution: &'a Distribution) -> Self {
        Self { distribution }
    }
}

impl Widget for FrequencyChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let bars = self
            .distribution
            .frequencies()
            .iter()
            .map(|(value, count)| {
                let count = u64::try_from(count).unwrap_or(u64::MAX);
                Bar::with_label(value.to_string(), count).text_value(count.to_string())
            })
            .collect::<Vec<_>>();

        BarChart::new(bars)
            .block(
                Block::bordered()
                    .merge_borders(MergeStrategy::Exact)
                    .title(format!("Distribution of {}", self.distribution.column())),
            )
            .direction(Direction::Horizontal)
            .bar_style(style::BAR)
            .bar_gap(0)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use sondage_table::loader;

    use super::*;
    use crate::ui::widgets::buffer_text;

    #[test]
    fn test_renders_one_bar_per_category() {
        let table = loader::load("t.csv", b"answer\nYes\nNo\nYes\n").unwrap();
        let distribution = Distribution::of(&table, "answer").unwrap();
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 4));
        FrequencyChart::new(&distribution).render(buf.area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Distribution of answer"));
        assert!(text.contains("Yes"));
        assert!(text.contains("No"));
    }
}
