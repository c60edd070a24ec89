//! Input fields shown for each dashboard section.

use sondage_analysis::{
    poll::PollChoice,
    sampling::SamplingMode,
    session::{Section, SessionState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Field {
    /// Multi-select list of columns.
    Columns,
    Z,
    P,
    E,
    Population,
    Compute,
    Mode,
    DrawSize,
    StratifyColumn,
    StratifiedSize,
    Draw,
    PollName,
    PollChoice,
    Submit,
}

impl Field {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Columns => "Columns",
            Self::Z => "Z score (e.g. 1.96)",
            Self::P => "Estimated proportion p",
            Self::E => "Margin of error e",
            Self::Population => "Population size (0 if infinite)",
            Self::Compute => "Compute",
            Self::Mode => "Sampling type",
            Self::DrawSize => "Sample size",
            Self::StratifyColumn => "Stratification variable",
            Self::StratifiedSize => "Total sample size",
            Self::Draw => "Draw sample",
            Self::PollName => "Your name",
            Self::PollChoice => "Are you satisfied with the app?",
            Self::Submit => "Send",
        }
    }

    pub(super) fn is_button(self) -> bool {
        matches!(self, Self::Compute | Self::Draw | Self::Submit)
    }

    /// Fields edited by typing a number and pressing Enter.
    pub(super) fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Z | Self::P | Self::E | Self::Population | Self::DrawSize | Self::StratifiedSize
        )
    }

    /// Current value as shown next to the label.
    pub(super) fn value(self, session: &SessionState) -> String {
        let sample_size = session.sample_size_form();
        let draw = session.draw_form();
        let poll = session.poll_form();
        match self {
            Self::Columns | Self::Compute | Self::Draw | Self::Submit => String::new(),
            Self::Z => sample_size.z.value().to_string(),
            Self::P => sample_size.p.value().to_string(),
            Self::E => sample_size.e.value().to_string(),
            Self::Population => sample_size.population.value().to_string(),
            Self::Mode => draw.mode.to_string(),
            Self::DrawSize => draw.size.value().to_string(),
            Self::StratifyColumn => draw.stratify_column.clone().unwrap_or_default(),
            Self::StratifiedSize => draw.stratified_size.value().to_string(),
            Self::PollName => poll.name.clone(),
            Self::PollChoice => PollChoice::ALL
                .iter()
                .map(|&choice| {
                    let mark = if choice == poll.choice { "(*)" } else { "( )" };
                    format!("{mark} {choice}")
                })
                .collect::<Vec<_>>()
                .join("  "),
        }
    }
}

/// Fields of `section`, top to bottom.
pub(super) fn fields(section: Section, session: &SessionState) -> Vec<Field> {
    match section {
        Section::Preview | Section::Description => vec![],
        Section::Distribution | Section::Unique => vec![Field::Columns],
        Section::SampleSize => vec![
            Field::Z,
            Field::P,
            Field::E,
            Field::Population,
            Field::Compute,
        ],
        Section::Draw => match session.draw_form().mode {
            SamplingMode::SimpleRandom => vec![Field::Mode, Field::DrawSize, Field::Draw],
            SamplingMode::Stratified if session.categorical_columns().is_empty() => {
                vec![Field::Mode]
            }
            SamplingMode::Stratified => vec![
                Field::Mode,
                Field::StratifyColumn,
                Field::StratifiedSize,
                Field::Draw,
            ],
        },
        Section::Poll => vec![Field::PollName, Field::PollChoice, Field::Submit],
    }
}

/// Columns offered by the column picker of `section`, with the current selection.
pub(super) fn column_choices(
    section: Section,
    session: &SessionState,
) -> (Vec<&str>, &[String]) {
    match section {
        Section::Distribution => (
            session.categorical_columns(),
            session.distribution_columns(),
        ),
        Section::Unique => (session.all_columns(), session.unique_columns()),
        _ => (vec![], &[]),
    }
}

/// `selection` with `column` added at the end, or removed if already present.
pub(super) fn toggle_column(selection: &[String], column: &str) -> Vec<String> {
    if selection.iter().any(|c| c == column) {
        selection.iter().filter(|c| *c != column).cloned().collect()
    } else {
        selection
            .iter()
            .cloned()
            .chain([column.to_owned()])
            .collect()
    }
}

/// Adds `steps` increments to a decimal field, keeping three decimals.
pub(super) fn step_decimal(value: f64, step: f64, steps: i32) -> f64 {
    ((value + step * f64::from(steps)) * 1000.0).round() / 1000.0
}

/// Next element of `items` after `current`, wrapping around.
pub(super) fn cycle<T>(items: &[T], current: &T, forward: bool) -> Option<T>
where
    T: PartialEq + Clone,
{
    if items.is_empty() {
        return None;
    }
    let len = items.len();
    let next = match items.iter().position(|item| item == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(items[next].clone())
}

#[cfg(test)]
mod tests {
    use sondage_analysis::session::{UserEvent, render};

    use super::*;

    fn loaded(csv: &[u8]) -> SessionState {
        let load = UserEvent::Load {
            file_name: "t.csv".to_owned(),
            bytes: csv.to_vec(),
        };
        render(&SessionState::default(), load).0
    }

    #[test]
    fn test_draw_fields_follow_mode() {
        let session = loaded(b"city,n\nLyon,1\n");
        assert_eq!(
            fields(Section::Draw, &session),
            [Field::Mode, Field::DrawSize, Field::Draw]
        );
        let (session, _) = render(
            &session,
            UserEvent::SetSamplingMode(SamplingMode::Stratified),
        );
        assert_eq!(fields(Section::Draw, &session).len(), 4);

        let numeric = loaded(b"n\n1\n");
        let (numeric, _) = render(
            &numeric,
            UserEvent::SetSamplingMode(SamplingMode::Stratified),
        );
        assert_eq!(fields(Section::Draw, &numeric), [Field::Mode]);
    }

    #[test]
    fn test_column_choices() {
        let session = loaded(b"city,n\nLyon,1\n");
        assert_eq!(column_choices(Section::Distribution, &session).0, ["city"]);
        assert_eq!(column_choices(Section::Unique, &session).0, ["city", "n"]);
    }

    #[test]
    fn test_toggle_column_keeps_selection_order() {
        let selection = toggle_column(&[], "b");
        let selection = toggle_column(&selection, "a");
        assert_eq!(selection, ["b", "a"]);
        assert_eq!(toggle_column(&selection, "b"), ["a"]);
    }

    #[test]
    fn test_steps() {
        assert_eq!(step_decimal(0.05, 0.01, 1), 0.06);
        assert_eq!(step_decimal(1.96, 0.01, -1), 1.95);
    }

    #[test]
    fn test_cycle_wraps() {
        let items = [1, 2, 3];
        assert_eq!(cycle(&items, &3, true), Some(1));
        assert_eq!(cycle(&items, &1, false), Some(3));
        assert_eq!(cycle(&items, &9, true), Some(1));
        assert_eq!(cycle::<i32>(&[], &1, true), None);
    }

    #[test]
    fn test_poll_choice_display() {
        let session = loaded(b"a\n1\n");
        assert_eq!(
            Field::PollChoice.value(&session),
            "(*) Yes  ( ) No  ( ) Maybe"
        );
    }
}
