use serde::{Deserialize, Serialize};

use crate::model::ids::OptionId;

/// A player's submission, shaped by the question type it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// One option id, for single-choice questions.
    Choice(OptionId),
    /// Any number of option ids, for multiple-choice questions.
    Choices(Vec<OptionId>),
    /// Free text, for text-input questions.
    Text(String),
}

impl Answer {
    #[must_use]
    pub fn choice(id: impl Into<String>) -> Self {
        Self::Choice(OptionId::new(id))
    }

    #[must_use]
    pub fn choices<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::Choices(ids.into_iter().map(OptionId::new).collect())
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// True when nothing was selected or typed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Choice(id) => id.is_empty(),
            Self::Choices(ids) => ids.iter().all(OptionId::is_empty),
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Render the answer for the review screen.
    #[must_use]
    pub fn display(&self) -> String {
        if self.is_blank() {
            return NO_ANSWER.to_owned();
        }
        match self {
            Self::Choice(id) => id.to_string(),
            Self::Choices(ids) => ids
                .iter()
                .filter(|id| !id.is_empty())
                .map(OptionId::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Shown in place of a blank submission.
pub const NO_ANSWER: &str = "No answer provided";
