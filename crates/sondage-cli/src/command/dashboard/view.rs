use ratatui::{
    layout::{Constraint, Layout, Margin},
    prelude::{Buffer, Rect},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};
use sondage_analysis::{
    sampling::SamplingMode,
    session::{Output, Section, SessionState},
};

use crate::{
    command::dashboard::{
        app::{Focus, Status},
        form::{self, Field},
    },
    ui::widgets::{DataTable, FrequencyChart, KeyBinding, StatusBar, style},
    util,
};

const SIDEBAR_WIDTH: u16 = 30;

const SIDEBAR_BINDINGS: &[KeyBinding] = &[
    (&["↑", "↓"], "Select"),
    (&["Space"], "Show/Hide"),
    (&["Enter"], "Edit"),
    (&["o"], "Open"),
    (&["e"], "Export"),
    (&["q"], "Quit"),
];
const FORM_BINDINGS: &[KeyBinding] = &[
    (&["↑", "↓"], "Field"),
    (&["←", "→"], "Change"),
    (&["Enter"], "Apply"),
    (&["e"], "Export"),
    (&["Esc"], "Back"),
];
const OPEN_FILE_BINDINGS: &[KeyBinding] = &[(&["Enter"], "Open"), (&["Esc"], "Cancel")];

/// The whole dashboard screen.
#[derive(Debug)]
pub(super) struct DashboardView<'a> {
    pub(super) session: &'a SessionState,
    pub(super) outputs: &'a [Output],
    pub(super) section: Section,
    pub(super) focus: &'a Focus,
    pub(super) field: usize,
    pub(super) option: usize,
    pub(super) input: Option<&'a str>,
    pub(super) status: Option<&'a Status>,
}

impl Widget for DashboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let [title_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let [sidebar_area, main_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                .areas(body_area);

        self.render_title(title_area, buf);
        self.render_sidebar(sidebar_area, buf);
        self.render_main(main_area, buf);
        self.render_status(status_area, buf);
    }
}

impl DashboardView<'_> {
    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled("Survey dashboard", style::TITLE)];
        if let Some(file_name) = self.session.file_name() {
            spans.push(Span::raw(format!("  {file_name}")));
        }
        if let Some(table) = self.session.table() {
            spans.push(Span::styled(
                format!(" ({} rows, {} columns)", table.row_count(), table.column_count()),
                style::MUTED,
            ));
        }
        Line::from(spans).render(area, buf);
    }

    fn render_sidebar(&self, area: Rect, buf: &mut Buffer) {
        let sections = self.session.sections();
        let lines = Section::ALL
            .iter()
            .map(|&section| {
                let mark = if sections.is_enabled(section) { "[x]" } else { "[ ]" };
                let line = Line::from(format!("{mark} {}", section.title()));
                if section == self.section {
                    line.style(style::HIGHLIGHT)
                } else {
                    line
                }
            })
            .collect::<Vec<_>>();
        let block = Block::bordered()
            .merge_borders(MergeStrategy::Exact)
            .title("Sections");
        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let bindings = match self.focus {
            Focus::Sidebar => SIDEBAR_BINDINGS,
            Focus::Form => FORM_BINDINGS,
            Focus::OpenFile(_) => OPEN_FILE_BINDINGS,
        };
        let bar = StatusBar::new(bindings);
        let bar = match self.status {
            Some(Status::Info(message)) => {
                bar.message(Span::styled(message.as_str(), style::SUCCESS))
            }
            Some(Status::Error(message)) => {
                bar.message(Span::styled(message.as_str(), style::ERROR))
            }
            None => bar,
        };
        bar.render(area, buf);
    }

    fn render_main(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .merge_borders(MergeStrategy::Exact)
            .title(self.section.title());
        let inner = block.inner(area);
        block.render(area, buf);
        let inner = inner.inner(Margin::new(1, 0));

        if let Focus::OpenFile(path) = self.focus {
            let lines = vec![
                Line::from("Path of the CSV or XLSX file to open:"),
                Line::from(vec![
                    Span::styled(path.as_str(), style::HIGHLIGHT),
                    Span::styled("_", style::MUTED),
                ]),
            ];
            Paragraph::new(lines).render(inner, buf);
            return;
        }

        if self.session.table().is_none() {
            let mut lines = vec![];
            if let Some(message) = self.session.load_error() {
                lines.push(Line::styled(message, style::ERROR));
            }
            lines.push(Line::from("Load a CSV or XLSX file to start (press o)."));
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .render(inner, buf);
            return;
        }

        if !self.session.sections().is_enabled(self.section) {
            Line::styled("Hidden section, press Space to show it.", style::MUTED)
                .render(inner, buf);
            return;
        }

        let form = self.form_lines();
        let height = u16::try_from(form.len()).unwrap_or(u16::MAX);
        let [form_area, output_area] =
            Layout::vertical([Constraint::Length(height), Constraint::Fill(1)]).areas(inner);
        Paragraph::new(form).render(form_area, buf);

        let output = self
            .outputs
            .iter()
            .find(|output| output.section() == Some(self.section));
        if let Some(output) = output {
            self.render_output(output, output_area, buf);
        }
    }

    fn form_lines(&self) -> Vec<Line<'static>> {
        let in_form = self.focus.is_form();
        let mut lines = vec![];
        for (i, field) in form::fields(self.section, self.session)
            .into_iter()
            .enumerate()
        {
            let focused = in_form && i == self.field;
            if field == Field::Columns {
                lines.extend(self.column_lines(focused));
                continue;
            }
            let line = if field.is_button() {
                Line::from(format!("[ {} ]", field.label()))
            } else {
                let value = match self.input {
                    Some(input) if focused && field.is_numeric() => format!("{input}_"),
                    _ => field.value(self.session),
                };
                Line::from(format!("{}: {value}", field.label()))
            };
            lines.push(if focused {
                line.style(style::HIGHLIGHT)
            } else {
                line
            });
        }
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines
    }

    fn column_lines(&self, focused: bool) -> Vec<Line<'static>> {
        let (options, selection) = form::column_choices(self.section, self.session);
        if options.is_empty() {
            return vec![Line::styled("No column available.", style::MUTED)];
        }
        let mut lines = vec![Line::from("Columns:")];
        lines.extend(options.iter().enumerate().map(|(i, &column)| {
            let mark = if selection.iter().any(|c| c == column) {
                "[x]"
            } else {
                "[ ]"
            };
            let line = Line::from(format!("  {mark} {column}"));
            if focused && i == self.option {
                line.style(style::HIGHLIGHT)
            } else {
                line
            }
        }));
        lines
    }

    fn render_output(&self, output: &Output, area: Rect, buf: &mut Buffer) {
        match output {
            Output::AwaitingFile | Output::LoadFailed(_) => {}
            Output::Preview(table) => {
                DataTable::new(table)
                    .title(format!("First {} rows", table.row_count()))
                    .render(area, buf);
            }
            Output::Description(table) => {
                DataTable::new(table).title("Summary").render(area, buf);
            }
            Output::Distributions(distributions) => {
                if distributions.is_empty() {
                    Line::styled("Select at least one column.", style::MUTED).render(area, buf);
                    return;
                }
                let areas = Layout::vertical(distributions.iter().map(|_| Constraint::Fill(1)))
                    .split(area);
                for (distribution, &area) in distributions.iter().zip(areas.iter()) {
                    let [chart_area, table_area] =
                        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);
                    FrequencyChart::new(distribution).render(chart_area, buf);
                    DataTable::new(&distribution.to_table())
                        .title("Frequency table")
                        .render(table_area, buf);
                }
            }
            Output::UniqueCombinations(None) => {
                Line::styled("Select at least one column.", style::MUTED).render(area, buf);
            }
            Output::UniqueCombinations(Some(unique)) => {
                let [message_area, table_area] = message_layout(area);
                Line::styled(util::unique_message(unique.len()), style::SUCCESS)
                    .render(message_area, buf);
                DataTable::new(unique.table())
                    .title("Combinations")
                    .render(table_area, buf);
            }
            Output::SampleSize(result) => {
                if let Some(result) = result {
                    Line::styled(util::sample_size_message(result), style::SUCCESS)
                        .render(area, buf);
                }
            }
            Output::Sample(None) => {}
            Output::Sample(Some(Ok(sample))) => {
                let [message_area, table_area] = message_layout(area);
                let draw = self.session.draw_form();
                let column = match draw.mode {
                    SamplingMode::Stratified => draw.stratify_column.as_deref(),
                    SamplingMode::SimpleRandom => None,
                };
                Line::styled(util::sample_message(sample, column), style::SUCCESS)
                    .render(message_area, buf);
                DataTable::new(sample.table())
                    .title("Sample")
                    .render(table_area, buf);
            }
            Output::Sample(Some(Err(e))) => {
                Line::styled(e.to_string(), style::ERROR).render(area, buf);
            }
            Output::StratificationUnavailable => {
                Line::styled("No categorical variable available.", style::WARNING)
                    .render(area, buf);
            }
            Output::PollAcknowledgment(message) => {
                if let Some(message) = message {
                    Line::styled(message.as_str(), style::SUCCESS).render(area, buf);
                }
            }
        }
    }
}

fn message_layout(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area)
}

#[cfg(test)]
mod tests {
    use sondage_analysis::session::{UserEvent, render};

    use super::*;
    use crate::ui::widgets::buffer_text;

    fn draw(session: &SessionState, outputs: &[Output], section: Section, focus: &Focus) -> String {
        let view = DashboardView {
            session,
            outputs,
            section,
            focus,
            field: 0,
            option: 0,
            input: None,
            status: None,
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, 100, 24));
        view.render(buf.area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn test_renders_without_file() {
        let (session, outputs) = render(&SessionState::default(), UserEvent::Refresh);
        let text = draw(&session, &outputs, Section::Preview, &Focus::Sidebar);
        assert!(text.contains("Survey dashboard"));
        assert!(text.contains("[ ] Data preview"));
        assert!(text.contains("Load a CSV or XLSX file to start (press o)."));
    }

    #[test]
    fn test_renders_enabled_section() {
        let load = UserEvent::Load {
            file_name: "survey.csv".to_owned(),
            bytes: b"city,age\nLyon,30\nNice,41\n".to_vec(),
        };
        let (session, _) = render(&SessionState::default(), load);
        let (session, outputs) = render(&session, UserEvent::Toggle(Section::Preview));
        let text = draw(&session, &outputs, Section::Preview, &Focus::Sidebar);
        assert!(text.contains("survey.csv (2 rows, 2 columns)"));
        assert!(text.contains("[x] Data preview"));
        assert!(text.contains("Lyon"));
        assert!(text.contains("41"));

        let text = draw(&session, &outputs, Section::Poll, &Focus::Sidebar);
        assert!(text.contains("Hidden section, press Space to show it."));
    }

    #[test]
    fn test_renders_file_prompt() {
        let (session, outputs) = render(&SessionState::default(), UserEvent::Refresh);
        let focus = Focus::OpenFile("data/survey.csv".to_owned());
        let text = draw(&session, &outputs, Section::Preview, &focus);
        assert!(text.contains("data/survey.csv_"));
        assert!(text.contains("Enter Open | Esc Cancel"));
    }
}
