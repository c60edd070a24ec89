//! Dashboard session state and event handling.
//!
//! A [`SessionState`] holds everything the dashboard shows: the loaded table,
//! the section toggles, every input field and the results of button-gated
//! computations. [`render`] applies one [`UserEvent`] to a state and returns
//! the next state together with the [`Output`]s of the enabled sections.

use std::{cmp::Ordering, sync::Arc};

use sondage_stats::cochran::{MARGIN_RANGE, PROPORTION_RANGE, SampleSize, SampleSizeParams};
use sondage_table::{Table, loader};

use crate::{
    describe::{self, DEFAULT_PREVIEW_ROWS},
    distribution::{self, Distribution},
    poll::{PollChoice, PollResponse},
    sampling::{self, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED, Sample, SampleError, SamplingMode},
    unique::{self, UniqueCombinations},
};

/// Dashboard sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Preview,
    Description,
    Distribution,
    Unique,
    SampleSize,
    Draw,
    Poll,
}

impl Section {
    pub const ALL: [Self; 7] = [
        Self::Preview,
        Self::Description,
        Self::Distribution,
        Self::Unique,
        Self::SampleSize,
        Self::Draw,
        Self::Poll,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Preview => "Data preview",
            Self::Description => "Descriptive statistics",
            Self::Distribution => "Distribution by category",
            Self::Unique => "Unique combinations",
            Self::SampleSize => "Sample size (Cochran)",
            Self::Draw => "Sample draw",
            Self::Poll => "Mini-poll",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Section toggles. All sections start disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sections([bool; Section::ALL.len()]);

impl Sections {
    #[must_use]
    pub fn is_enabled(self, section: Section) -> bool {
        self.0[section.index()]
    }

    pub fn set(&mut self, section: Section, enabled: bool) {
        self.0[section.index()] = enabled;
    }

    pub fn toggle(&mut self, section: Section) {
        self.0[section.index()] ^= true;
    }

    /// Enabled sections in display order.
    pub fn enabled(self) -> impl Iterator<Item = Section> {
        Section::ALL
            .into_iter()
            .filter(move |&section| self.is_enabled(section))
    }
}

/// A numeric input bounded to `min..=max`.
///
/// Values that fall outside the bounds (or do not compare, like NaN) are
/// clamped on entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberField<T> {
    value: T,
    min: T,
    max: T,
}

impl<T> NumberField<T>
where
    T: PartialOrd + Copy,
{
    #[must_use]
    pub fn new(value: T, min: T, max: T) -> Self {
        let mut field = Self {
            value: min,
            min,
            max,
        };
        field.set(value);
        field
    }

    #[must_use]
    pub fn value(&self) -> T {
        self.value
    }

    #[must_use]
    pub fn min(&self) -> T {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> T {
        self.max
    }

    /// Stores `value` clamped into bounds and reports whether the field changed.
    pub fn set(&mut self, value: T) -> bool {
        let value = match (value.partial_cmp(&self.min), value.partial_cmp(&self.max)) {
            (Some(Ordering::Less) | None, _) => self.min,
            (_, Some(Ordering::Greater)) => self.max,
            _ => value,
        };
        let changed = value.partial_cmp(&self.value) != Some(Ordering::Equal);
        self.value = value;
        changed
    }
}

/// Inputs of the sample-size calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSizeForm {
    pub z: NumberField<f64>,
    pub p: NumberField<f64>,
    pub e: NumberField<f64>,
    pub population: NumberField<u64>,
}

impl Default for SampleSizeForm {
    fn default() -> Self {
        let defaults = SampleSizeParams::default();
        Self {
            z: NumberField::new(defaults.z, f64::MIN, f64::MAX),
            p: NumberField::new(defaults.p, *PROPORTION_RANGE.start(), *PROPORTION_RANGE.end()),
            e: NumberField::new(defaults.e, *MARGIN_RANGE.start(), *MARGIN_RANGE.end()),
            population: NumberField::new(defaults.population, 0, u64::MAX),
        }
    }
}

impl SampleSizeForm {
    #[must_use]
    pub fn params(&self) -> SampleSizeParams {
        SampleSizeParams {
            z: self.z.value(),
            p: self.p.value(),
            e: self.e.value(),
            population: self.population.value(),
        }
    }
}

/// One field of the sample-size calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleSizeInput {
    Z(f64),
    P(f64),
    E(f64),
    Population(u64),
}

/// Inputs of the sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawForm {
    pub mode: SamplingMode,
    pub size: NumberField<usize>,
    pub stratify_column: Option<String>,
    pub stratified_size: NumberField<usize>,
}

impl DrawForm {
    fn for_table(table: &Table, preferred_size: usize) -> Self {
        let max = table.row_count().max(1);
        let size = sampling::default_size(table.row_count(), preferred_size);
        Self {
            mode: SamplingMode::default(),
            size: NumberField::new(size, 1, max),
            stratify_column: table.categorical_columns().first().map(|&c| c.to_owned()),
            stratified_size: NumberField::new(size, 1, max),
        }
    }
}

impl Default for DrawForm {
    fn default() -> Self {
        Self::for_table(&Table::default(), DEFAULT_SAMPLE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollForm {
    pub name: String,
    pub choice: PollChoice,
}

/// Settings that apply to a whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u64,
    pub preview_rows: usize,
    pub default_sample_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            default_sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// One user interaction with the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// Re-render without changing anything.
    Refresh,
    Load { file_name: String, bytes: Vec<u8> },
    Toggle(Section),
    SelectDistributionColumns(Vec<String>),
    SelectUniqueColumns(Vec<String>),
    SetSampleSizeInput(SampleSizeInput),
    ComputeSampleSize,
    SetSamplingMode(SamplingMode),
    SetDrawSize(usize),
    SetStratifyColumn(String),
    SetStratifiedSize(usize),
    Draw,
    SetPollName(String),
    SetPollChoice(PollChoice),
    SubmitPoll,
}

/// What the dashboard shows for one section.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    AwaitingFile,
    LoadFailed(String),
    Preview(Table),
    Description(Table),
    /// One distribution per selected column; empty without a selection.
    Distributions(Vec<Distribution>),
    /// `None` without a selection.
    UniqueCombinations(Option<UniqueCombinations>),
    /// `None` until the calculation is requested.
    SampleSize(Option<SampleSize>),
    /// `None` until a draw is requested.
    Sample(Option<Result<Arc<Sample>, SampleError>>),
    /// Stratified sampling was chosen but the table has no categorical column.
    StratificationUnavailable,
    /// `None` until the poll is submitted.
    PollAcknowledgment(Option<String>),
}

impl Output {
    /// The section this output belongs to, `None` for the file state.
    #[must_use]
    pub fn section(&self) -> Option<Section> {
        match self {
            Self::AwaitingFile | Self::LoadFailed(_) => None,
            Self::Preview(_) => Some(Section::Preview),
            Self::Description(_) => Some(Section::Description),
            Self::Distributions(_) => Some(Section::Distribution),
            Self::UniqueCombinations(_) => Some(Section::Unique),
            Self::SampleSize(_) => Some(Section::SampleSize),
            Self::Sample(_) | Self::StratificationUnavailable => Some(Section::Draw),
            Self::PollAcknowledgment(_) => Some(Section::Poll),
        }
    }
}

/// The whole dashboard state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    config: SessionConfig,
    file_name: Option<String>,
    table: Option<Arc<Table>>,
    load_error: Option<String>,
    sections: Sections,
    distribution_columns: Vec<String>,
    unique_columns: Vec<String>,
    sample_size_form: SampleSizeForm,
    sample_size: Option<SampleSize>,
    draw_form: DrawForm,
    draw_result: Option<Result<Arc<Sample>, SampleError>>,
    poll_form: PollForm,
    acknowledgment: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            draw_form: DrawForm::for_table(&Table::default(), config.default_sample_size),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub fn table(&self) -> Option<&Arc<Table>> {
        self.table.as_ref()
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    #[must_use]
    pub fn sections(&self) -> Sections {
        self.sections
    }

    #[must_use]
    pub fn distribution_columns(&self) -> &[String] {
        &self.distribution_columns
    }

    #[must_use]
    pub fn unique_columns(&self) -> &[String] {
        &self.unique_columns
    }

    #[must_use]
    pub fn sample_size_form(&self) -> &SampleSizeForm {
        &self.sample_size_form
    }

    #[must_use]
    pub fn draw_form(&self) -> &DrawForm {
        &self.draw_form
    }

    #[must_use]
    pub fn poll_form(&self) -> &PollForm {
        &self.poll_form
    }

    /// Columns offered by the distribution selector.
    #[must_use]
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.table
            .as_deref()
            .map(Table::categorical_columns)
            .unwrap_or_default()
    }

    /// Columns offered by the unique-combination selector.
    #[must_use]
    pub fn all_columns(&self) -> Vec<&str> {
        self.table
            .as_deref()
            .map(|table| table.column_names().collect())
            .unwrap_or_default()
    }

    fn apply(&mut self, event: UserEvent) {
        match event {
            UserEvent::Refresh => {}
            UserEvent::Load { file_name, bytes } => self.load(file_name, &bytes),
            UserEvent::Toggle(section) => self.sections.toggle(section),
            UserEvent::SelectDistributionColumns(columns) => {
                let offered = self.categorical_columns();
                self.distribution_columns = retain_offered(columns, &offered);
            }
            UserEvent::SelectUniqueColumns(columns) => {
                let offered = self.all_columns();
                self.unique_columns = retain_offered(columns, &offered);
            }
            UserEvent::SetSampleSizeInput(input) => {
                let form = &mut self.sample_size_form;
                let changed = match input {
                    SampleSizeInput::Z(z) => form.z.set(z),
                    SampleSizeInput::P(p) => form.p.set(p),
                    SampleSizeInput::E(e) => form.e.set(e),
                    SampleSizeInput::Population(n) => form.population.set(n),
                };
                if changed {
                    self.sample_size = None;
                }
            }
            UserEvent::ComputeSampleSize => {
                if self.is_active(Section::SampleSize) {
                    let result = self.sample_size_form.params().compute();
                    tracing::debug!(size = result.size, "sample size computed");
                    self.sample_size = Some(result);
                }
            }
            UserEvent::SetSamplingMode(mode) => {
                if self.draw_form.mode != mode {
                    self.draw_form.mode = mode;
                    self.draw_result = None;
                }
            }
            UserEvent::SetDrawSize(size) => {
                if self.draw_form.size.set(size) {
                    self.draw_result = None;
                }
            }
            UserEvent::SetStratifyColumn(column) => self.set_stratify_column(column),
            UserEvent::SetStratifiedSize(size) => {
                if self.draw_form.stratified_size.set(size) {
                    self.draw_result = None;
                }
            }
            UserEvent::Draw => {
                if self.is_active(Section::Draw) {
                    self.draw();
                }
            }
            UserEvent::SetPollName(name) => {
                if self.poll_form.name != name {
                    self.poll_form.name = name;
                    self.acknowledgment = None;
                }
            }
            UserEvent::SetPollChoice(choice) => {
                if self.poll_form.choice != choice {
                    self.poll_form.choice = choice;
                    self.acknowledgment = None;
                }
            }
            UserEvent::SubmitPoll => {
                if self.is_active(Section::Poll) {
                    let response =
                        PollResponse::new(self.poll_form.name.clone(), self.poll_form.choice);
                    self.acknowledgment = Some(response.acknowledge());
                }
            }
        }
    }

    /// A button of `section` can only be pressed while it is shown.
    fn is_active(&self, section: Section) -> bool {
        self.table.is_some() && self.sections.is_enabled(section)
    }

    fn load(&mut self, file_name: String, bytes: &[u8]) {
        match loader::load(&file_name, bytes) {
            Ok(table) => {
                self.draw_form = DrawForm::for_table(&table, self.config.default_sample_size);
                self.table = Some(Arc::new(table));
                self.file_name = Some(file_name);
                self.load_error = None;
            }
            Err(e) => {
                tracing::warn!(%file_name, error = %e, "failed to load file");
                self.draw_form =
                    DrawForm::for_table(&Table::default(), self.config.default_sample_size);
                self.table = None;
                self.file_name = None;
                self.load_error = Some(e.to_string());
            }
        }
        self.distribution_columns.clear();
        self.unique_columns.clear();
        self.sample_size = None;
        self.draw_result = None;
        self.acknowledgment = None;
    }

    fn set_stratify_column(&mut self, column: String) {
        if !self.categorical_columns().contains(&column.as_str()) {
            tracing::warn!(%column, "stratification column is not categorical");
            return;
        }
        if self.draw_form.stratify_column.as_ref() != Some(&column) {
            self.draw_form.stratify_column = Some(column);
            self.draw_result = None;
        }
    }

    fn draw(&mut self) {
        let Some(table) = self.table.as_deref() else {
            return;
        };
        let seed = self.config.seed;
        let form = &self.draw_form;
        let result = match form.mode {
            SamplingMode::SimpleRandom => sampling::simple_random(table, form.size.value(), seed),
            SamplingMode::Stratified => match &form.stratify_column {
                Some(column) => {
                    sampling::stratified(table, column, form.stratified_size.value(), seed)
                }
                None => Err(SampleError::NoCategoricalColumn),
            },
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "sample draw failed");
        }
        self.draw_result = Some(result.map(Arc::new));
    }

    fn outputs(&self) -> Vec<Output> {
        let Some(table) = self.table.as_deref() else {
            let mut outputs = Vec::with_capacity(2);
            if let Some(message) = &self.load_error {
                outputs.push(Output::LoadFailed(message.clone()));
            }
            outputs.push(Output::AwaitingFile);
            return outputs;
        };
        self.sections
            .enabled()
            .map(|section| self.section_output(table, section))
            .collect()
    }

    fn section_output(&self, table: &Table, section: Section) -> Output {
        match section {
            Section::Preview => {
                Output::Preview(describe::preview_head(table, self.config.preview_rows))
            }
            Section::Description => Output::Description(describe::describe(table)),
            Section::Distribution => {
                let distributions = distribution::distributions(table, &self.distribution_columns);
                Output::Distributions(distributions)
            }
            Section::Unique => {
                let unique = unique::find_unique_combinations(table, &self.unique_columns)
                    .unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "unique combinations unavailable");
                        None
                    });
                Output::UniqueCombinations(unique)
            }
            Section::SampleSize => Output::SampleSize(self.sample_size),
            Section::Draw => {
                if self.draw_form.mode.is_stratified() && table.categorical_columns().is_empty() {
                    Output::StratificationUnavailable
                } else {
                    Output::Sample(self.draw_result.clone())
                }
            }
            Section::Poll => Output::PollAcknowledgment(self.acknowledgment.clone()),
        }
    }
}

/// Keeps the offered columns of a selection, in selection order, without repeats.
fn retain_offered(selection: Vec<String>, offered: &[&str]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(selection.len());
    for column in selection {
        if !offered.contains(&column.as_str()) {
            tracing::warn!(%column, "ignoring selection of unavailable column");
        } else if !kept.contains(&column) {
            kept.push(column);
        }
    }
    kept
}

/// Applies `event` to `state`, returning the next state and the outputs of
/// every enabled section.
///
/// Without a loaded table the only outputs are an optional
/// [`Output::LoadFailed`] followed by [`Output::AwaitingFile`].
///
/// # Examples
///
/// ```
/// use sondage_analysis::session::{Output, Section, SessionState, UserEvent, render};
///
/// let state = SessionState::default();
/// let (state, outputs) = render(&state, UserEvent::Toggle(Section::Poll));
/// assert_eq!(outputs, [Output::AwaitingFile]);
///
/// let load = UserEvent::Load { file_name: "a.csv".into(), bytes: b"x\n1\n".to_vec() };
/// let (state, _) = render(&state, load);
/// let (_, outputs) = render(&state, UserEvent::SubmitPoll);
/// assert_eq!(
///     outputs,
///     [Output::PollAcknowledgment(Some("Thanks  for your answer: Yes".into()))]
/// );
/// ```
#[must_use]
pub fn render(state: &SessionState, event: UserEvent) -> (SessionState, Vec<Output>) {
    let mut next = state.clone();
    next.apply(event);
    let outputs = next.outputs();
    (next, outputs)
}
