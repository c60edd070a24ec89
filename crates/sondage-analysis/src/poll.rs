//! A toy satisfaction poll that echoes the answer back.

#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr,
)]
pub enum PollChoice {
    #[default]
    Yes,
    No,
    Maybe,
}

impl PollChoice {
    pub const ALL: [Self; 3] = [Self::Yes, Self::No, Self::Maybe];
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollResponse {
    pub name: String,
    pub choice: PollChoice,
}

impl PollResponse {
    pub fn new(name: impl Into<String>, choice: PollChoice) -> Self {
        Self {
            name: name.into(),
            choice,
        }
    }

    /// The message shown after submission.
    #[must_use]
    pub fn acknowledge(&self) -> String {
        format!("Thanks {} for your answer: {}", self.name, self.choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledge() {
        let response = PollResponse::new("Alice", PollChoice::Maybe);
        assert_eq!(response.acknowledge(), "Thanks Alice for your answer: Maybe");
    }

    #[test]
    fn test_empty_name_is_accepted() {
        let response = PollResponse::default();
        assert_eq!(response.acknowledge(), "Thanks  for your answer: Yes");
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!("No".parse::<PollChoice>().unwrap(), PollChoice::No);
        assert_eq!("yes".parse::<PollChoice>().unwrap(), PollChoice::Yes);
        assert_eq!("MAYBE".parse::<PollChoice>().unwrap(), PollChoice::Maybe);
        assert_eq!("Maybe".parse::<PollChoice>().unwrap(), PollChoice::Maybe);
        assert!("perhaps".parse::<PollChoice>().is_err());
    }
}
