use std::{
    fs,
    path::{Path, PathBuf},
};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use sondage_analysis::{
    poll::PollChoice,
    sampling::SamplingMode,
    session::{self, Output, SampleSizeInput, Section, SessionConfig, SessionState, UserEvent},
};
use sondage_table::CsvExport;

use crate::{
    command::dashboard::{
        form::{self, Field},
        view::DashboardView,
    },
    tui::App,
    util,
};

/// Which part of the dashboard receives key input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub(super) enum Focus {
    Sidebar,
    Form,
    /// Typing the path of a file to open.
    OpenFile(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug)]
pub struct DashboardApp {
    session: SessionState,
    outputs: Vec<Output>,
    output_dir: PathBuf,
    section: usize,
    focus: Focus,
    field: usize,
    option: usize,
    /// Pending text of the focused numeric field.
    input: Option<String>,
    status: Option<Status>,
    should_exit: bool,
}

impl DashboardApp {
    pub fn new(config: SessionConfig, output_dir: PathBuf) -> Self {
        let (session, outputs) = session::render(&SessionState::new(config), UserEvent::Refresh);
        Self {
            session,
            outputs,
            output_dir,
            section: 0,
            focus: Focus::Sidebar,
            field: 0,
            option: 0,
            input: None,
            status: None,
            should_exit: false,
        }
    }

    fn dispatch(&mut self, event: UserEvent) {
        let (session, outputs) = session::render(&self.session, event);
        self.session = session;
        self.outputs = outputs;
    }

    fn current_section(&self) -> Section {
        Section::ALL[self.section]
    }

    fn current_fields(&self) -> Vec<Field> {
        form::fields(self.current_section(), &self.session)
    }

    fn output(&self, section: Section) -> Option<&Output> {
        self.outputs
            .iter()
            .find(|output| output.section() == Some(section))
    }

    pub fn open(&mut self, path: &Path) {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read file");
                self.status = Some(Status::Error(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
                return;
            }
        };
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        self.dispatch(UserEvent::Load { file_name, bytes });
        self.field = 0;
        self.option = 0;
        self.input = None;
        self.status = Some(match (self.session.load_error(), self.session.table()) {
            (Some(message), _) => Status::Error(message.to_owned()),
            (None, Some(table)) => Status::Info(format!(
                "Loaded {} ({} rows, {} columns)",
                path.display(),
                table.row_count(),
                table.column_count()
            )),
            (None, None) => Status::Error(format!("Nothing loaded from {}", path.display())),
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return;
        }
        match self.focus {
            Focus::Sidebar => self.handle_sidebar_key(key.code),
            Focus::Form => self.handle_form_key(key.code),
            Focus::OpenFile(_) => self.handle_open_file_key(key.code),
        }
    }

    fn handle_sidebar_key(&mut self, code: KeyCode) {
        let count = Section::ALL.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Up => self.section = self.section.checked_sub(1).unwrap_or(count - 1),
            KeyCode::Down => self.section = (self.section + 1) % count,
            KeyCode::Char(' ') => self.dispatch(UserEvent::Toggle(self.current_section())),
            KeyCode::Char('o') => self.focus = Focus::OpenFile(String::new()),
            KeyCode::Char('e') => self.export(),
            KeyCode::Enter | KeyCode::Right | KeyCode::Tab => {
                let section = self.current_section();
                if self.session.table().is_some()
                    && self.session.sections().is_enabled(section)
                    && !self.current_fields().is_empty()
                {
                    self.focus = Focus::Form;
                    self.field = 0;
                    self.option = 0;
                }
            }
            _ => {}
        }
    }

    fn handle_open_file_key(&mut self, code: KeyCode) {
        let Focus::OpenFile(path) = &mut self.focus else {
            return;
        };
        match code {
            KeyCode::Esc => self.focus = Focus::Sidebar,
            KeyCode::Backspace => {
                path.pop();
            }
            KeyCode::Char(c) => path.push(c),
            KeyCode::Enter => {
                let path = PathBuf::from(path.trim());
                self.focus = Focus::Sidebar;
                self.open(&path);
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let fields = self.current_fields();
        let Some(field) = fields.get(self.field).copied() else {
            self.focus = Focus::Sidebar;
            return;
        };
        match (code, field) {
            (KeyCode::Esc, _) => {
                self.input = None;
                self.focus = Focus::Sidebar;
            }
            (KeyCode::Up, Field::Columns) => self.option = self.option.saturating_sub(1),
            (KeyCode::Down, Field::Columns) => {
                let (options, _) = form::column_choices(self.current_section(), &self.session);
                self.option = (self.option + 1).min(options.len().saturating_sub(1));
            }
            (KeyCode::Char(' ') | KeyCode::Enter, Field::Columns) => self.toggle_column(),
            (KeyCode::Up | KeyCode::BackTab, _) => {
                self.commit_input(field);
                self.field = self.field.checked_sub(1).unwrap_or(fields.len() - 1);
            }
            (KeyCode::Down | KeyCode::Tab, _) => {
                self.commit_input(field);
                self.field = (self.field + 1) % fields.len();
            }
            (KeyCode::Left, _) => self.adjust(field, false),
            (KeyCode::Right, _) => self.adjust(field, true),
            (KeyCode::Enter, _) => self.activate(field),
            (KeyCode::Char('e'), field) if field != Field::PollName && !field.is_numeric() => {
                self.export();
            }
            (KeyCode::Char(c), Field::PollName) => {
                let mut name = self.session.poll_form().name.clone();
                name.push(c);
                self.dispatch(UserEvent::SetPollName(name));
            }
            (KeyCode::Backspace, Field::PollName) => {
                let mut name = self.session.poll_form().name.clone();
                name.pop();
                self.dispatch(UserEvent::SetPollName(name));
            }
            (KeyCode::Char(c), field)
                if field.is_numeric() && (c.is_ascii_digit() || c == '.' || c == '-') =>
            {
                self.input.get_or_insert_with(String::new).push(c);
            }
            (KeyCode::Backspace, field) if field.is_numeric() => {
                if let Some(input) = &mut self.input {
                    input.pop();
                }
            }
            _ => {}
        }
        // the field list changes with the sampling mode
        self.field = self.field.min(self.current_fields().len().saturating_sub(1));
    }

    fn toggle_column(&mut self) {
        let section = self.current_section();
        let (options, selection) = form::column_choices(section, &self.session);
        let Some(column) = options.get(self.option) else {
            return;
        };
        let selection = form::toggle_column(selection, column);
        let event = match section {
            Section::Distribution => UserEvent::SelectDistributionColumns(selection),
            _ => UserEvent::SelectUniqueColumns(selection),
        };
        self.dispatch(event);
    }

    /// Applies the pending text of a numeric field.
    fn commit_input(&mut self, field: Field) {
        let Some(input) = self.input.take() else {
            return;
        };
        let input = input.trim();
        let event = match field {
            Field::Z | Field::P | Field::E => input.parse::<f64>().ok().map(|value| {
                UserEvent::SetSampleSizeInput(match field {
                    Field::Z => SampleSizeInput::Z(value),
                    Field::P => SampleSizeInput::P(value),
                    _ => SampleSizeInput::E(value),
                })
            }),
            Field::Population => input
                .parse()
                .ok()
                .map(|n| UserEvent::SetSampleSizeInput(SampleSizeInput::Population(n))),
            Field::DrawSize => input.parse().ok().map(UserEvent::SetDrawSize),
            Field::StratifiedSize => input.parse().ok().map(UserEvent::SetStratifiedSize),
            _ => return,
        };
        match event {
            Some(event) => self.dispatch(event),
            None => self.status = Some(Status::Error(format!("'{input}' is not a valid number"))),
        }
    }

    /// Steps a numeric field or cycles a choice field.
    fn adjust(&mut self, field: Field, forward: bool) {
        self.input = None;
        let steps = if forward { 1 } else { -1 };
        let sample_size = *self.session.sample_size_form();
        let draw = self.session.draw_form().clone();
        let event = match field {
            Field::Z => UserEvent::SetSampleSizeInput(SampleSizeInput::Z(form::step_decimal(
                sample_size.z.value(),
                0.01,
                steps,
            ))),
            Field::P => UserEvent::SetSampleSizeInput(SampleSizeInput::P(form::step_decimal(
                sample_size.p.value(),
                0.05,
                steps,
            ))),
            Field::E => UserEvent::SetSampleSizeInput(SampleSizeInput::E(form::step_decimal(
                sample_size.e.value(),
                0.005,
                steps,
            ))),
            Field::Population => {
                let n = sample_size.population.value();
                let n = if forward { n.saturating_add(100) } else { n.saturating_sub(100) };
                UserEvent::SetSampleSizeInput(SampleSizeInput::Population(n))
            }
            Field::DrawSize => UserEvent::SetDrawSize(step_size(draw.size.value(), forward)),
            Field::StratifiedSize => {
                UserEvent::SetStratifiedSize(step_size(draw.stratified_size.value(), forward))
            }
            Field::Mode => UserEvent::SetSamplingMode(match draw.mode {
                SamplingMode::SimpleRandom => SamplingMode::Stratified,
                SamplingMode::Stratified => SamplingMode::SimpleRandom,
            }),
            Field::StratifyColumn => {
                let columns = self.session.categorical_columns();
                let current = draw.stratify_column.as_deref().unwrap_or_default();
                match form::cycle(&columns, &current, forward) {
                    Some(column) => UserEvent::SetStratifyColumn(column.to_owned()),
                    None => return,
                }
            }
            Field::PollChoice => {
                let current = self.session.poll_form().choice;
                match form::cycle(&PollChoice::ALL, &current, forward) {
                    Some(choice) => UserEvent::SetPollChoice(choice),
                    None => return,
                }
            }
            Field::Columns | Field::Compute | Field::Draw | Field::PollName | Field::Submit => {
                return;
            }
        };
        self.dispatch(event);
    }

    fn activate(&mut self, field: Field) {
        match field {
            Field::Compute => self.dispatch(UserEvent::ComputeSampleSize),
            Field::Draw => self.dispatch(UserEvent::Draw),
            Field::Submit => self.dispatch(UserEvent::SubmitPoll),
            Field::Mode | Field::StratifyColumn | Field::PollChoice => self.adjust(field, true),
            field if field.is_numeric() => self.commit_input(field),
            _ => {}
        }
    }

    /// Saves the downloadable results of the current section.
    fn export(&mut self) {
        let exports = match self.output(self.current_section()) {
            Some(Output::Distributions(distributions)) => distributions
                .iter()
                .map(|distribution| distribution.export())
                .collect::<Result<Vec<_>, _>>(),
            Some(Output::UniqueCombinations(Some(unique))) => unique.export().map(|e| vec![e]),
            Some(Output::Sample(Some(Ok(sample)))) => sample.export().map(|e| vec![e]),
            _ => Ok(vec![]),
        };
        self.status = Some(match exports {
            Ok(exports) if exports.is_empty() => Status::Info("Nothing to export".to_owned()),
            Ok(exports) => self.save(&exports),
            Err(e) => Status::Error(format!("Export failed: {e}")),
        });
    }

    fn save(&self, exports: &[CsvExport]) -> Status {
        let mut saved = vec![];
        for export in exports {
            match util::save_export(export, &self.output_dir) {
                Ok(path) => saved.push(path.display().to_string()),
                Err(e) => return Status::Error(format!("{e:#}")),
            }
        }
        Status::Info(format!("Saved {}", saved.join(", ")))
    }
}

fn step_size(size: usize, forward: bool) -> usize {
    if forward {
        size.saturating_add(1)
    } else {
        size.saturating_sub(1)
    }
}

impl App for DashboardApp {
    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(key) = event.as_key_event() {
            self.handle_key(key);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let view = DashboardView {
            session: &self.session,
            outputs: &self.outputs,
            section: self.current_section(),
            focus: &self.focus,
            field: self.field,
            option: self.option,
            input: self.input.as_deref(),
            status: self.status.as_ref(),
        };
        frame.render_widget(view, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const SURVEY: &str = "city,sex,age\nLyon,F,30\nParis,M,41\nLyon,F,25\nNice,M,30\n";

    fn press(app: &mut DashboardApp, codes: &[KeyCode]) {
        for &code in codes {
            app.handle_key(KeyEvent::from(code));
        }
    }

    fn type_text(app: &mut DashboardApp, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
    }

    fn app_with_file(dir: &Path) -> DashboardApp {
        let path = dir.join("survey.csv");
        fs::write(&path, SURVEY).unwrap();
        let mut app = DashboardApp::new(SessionConfig::default(), dir.join("out"));
        app.open(&path);
        app
    }

    /// Moves the sidebar cursor to `section`, enables it and focuses its form.
    fn enter_section(app: &mut DashboardApp, section: Section) {
        app.section = Section::ALL.iter().position(|&s| s == section).unwrap();
        press(app, &[KeyCode::Char(' '), KeyCode::Enter]);
    }

    #[test]
    fn test_starts_awaiting_file() {
        let app = DashboardApp::new(SessionConfig::default(), PathBuf::from("."));
        assert_eq!(app.outputs, [Output::AwaitingFile]);
        assert!(app.focus.is_sidebar());
    }

    #[test]
    fn test_open_file_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        fs::write(&path, SURVEY).unwrap();

        let mut app = DashboardApp::new(SessionConfig::default(), dir.path().to_owned());
        press(&mut app, &[KeyCode::Char('o')]);
        type_text(&mut app, path.to_str().unwrap());
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.focus.is_sidebar());
        assert_eq!(app.session.table().unwrap().row_count(), 4);
        assert!(matches!(app.status, Some(Status::Info(_))));
    }

    #[test]
    fn test_open_failures_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = DashboardApp::new(SessionConfig::default(), dir.path().to_owned());
        app.open(&dir.path().join("missing.csv"));
        assert!(matches!(app.status, Some(Status::Error(_))));

        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        app.open(&path);
        assert!(matches!(app.status, Some(Status::Error(_))));
        assert!(matches!(app.outputs[0], Output::LoadFailed(_)));
    }

    #[test]
    fn test_toggle_and_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_file(dir.path());
        press(&mut app, &[KeyCode::Char(' ')]);
        assert_eq!(app.outputs.len(), 1);
        assert_eq!(app.outputs[0].section(), Some(Section::Preview));
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.outputs.is_empty());
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(app.should_exit());
    }

    #[test]
    fn test_distribution_selection_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_file(dir.path());
        enter_section(&mut app, Section::Distribution);
        assert!(app.focus.is_form());
        // options are city, sex
        press(&mut app, &[KeyCode::Down, KeyCode::Char(' ')]);
        assert_eq!(app.session.distribution_columns(), ["sex"]);

        press(&mut app, &[KeyCode::Char('e')]);
        let saved = fs::read_to_string(dir.path().join("out/repartition_sex.csv")).unwrap();
        assert_eq!(saved, "sex,Effectif\nF,2\nM,2\n");
    }

    #[test]
    fn test_sample_size_typed_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_file(dir.path());
        enter_section(&mut app, Section::SampleSize);
        // z, p, e, population, compute
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down]);
        type_text(&mut app, "1000");
        press(&mut app, &[KeyCode::Enter, KeyCode::Down, KeyCode::Enter]);
        let Some(Output::SampleSize(Some(result))) = app.output(Section::SampleSize) else {
            panic!("expected a sample size");
        };
        assert_eq!(result.size, 277);
        assert_eq!(
            util::sample_size_message(result),
            "Corrected size (finite population): 277"
        );
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_file(dir.path());
        enter_section(&mut app, Section::SampleSize);
        type_text(&mut app, "1.2.3");
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.status, Some(Status::Error(_))));
        assert_eq!(app.session.sample_size_form().z.value(), 1.96);
    }

    #[test]
    fn test_stratified_draw_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_file(dir.path());
        enter_section(&mut app, Section::Draw);
        // mode -> stratified; fields become mode, column, size, draw
        press(&mut app, &[KeyCode::Right]);
        assert_eq!(app.session.draw_form().mode, SamplingMode::Stratified);
        press(&mut app, &[KeyCode::Down, KeyCode::Right]);
        assert_eq!(
            app.session.draw_form().stratify_column.as_deref(),
            Some("sex")
        );
        press(&mut app, &[KeyCode::Down]);
        type_text(&mut app, "2");
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        let Some(Output::Sample(Some(Ok(sample)))) = app.output(Section::Draw) else {
            panic!("expected a sample");
        };
        assert_eq!(sample.len(), 2);

        press(&mut app, &[KeyCode::Char('e')]);
        assert!(dir.path().join("out/echantillon_stratifie.csv").exists());
    }

    #[test]
    fn test_poll_typing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_file(dir.path());
        enter_section(&mut app, Section::Poll);
        type_text(&mut app, "Zoe q");
        press(&mut app, &[KeyCode::Backspace, KeyCode::Backspace]);
        press(&mut app, &[KeyCode::Down, KeyCode::Right, KeyCode::Right]);
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(
            app.output(Section::Poll),
            Some(&Output::PollAcknowledgment(Some(
                "Thanks Zoe for your answer: Maybe".to_owned()
            )))
        );
        assert!(!app.should_exit());
    }
}
