use serde::{Deserialize, Serialize};

use crate::model::ids::{OptionId, QuestionId};

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
    TextInput,
    /// Any type tag this build does not know. Always graded incorrect.
    #[serde(other)]
    Unknown,
}

impl QuestionKind {
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultipleChoice)
    }
}

/// Comparison rule for text-input questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Exact,
    #[default]
    Fuzzy,
}

//
// ─── OPTIONS ───────────────────────────────────────────────────────────────────
//

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: OptionId::new(id),
            text: text.into(),
            is_correct,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// An externally supplied, immutable question.
///
/// Missing `options` or `accepted_answers` deserialize as empty collections;
/// grading treats them as "nothing is correct".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_answers: Vec<String>,
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Build a single-choice question.
    #[must_use]
    pub fn single_choice(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self::with_kind(id, QuestionKind::SingleChoice, text, options, Vec::new())
    }

    /// Build a multiple-choice question.
    #[must_use]
    pub fn multiple_choice(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self::with_kind(id, QuestionKind::MultipleChoice, text, options, Vec::new())
    }

    /// Build a text-input question using the default (fuzzy) match mode.
    #[must_use]
    pub fn text_input<S: Into<String>>(
        id: impl Into<String>,
        text: impl Into<String>,
        accepted_answers: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::with_kind(
            id,
            QuestionKind::TextInput,
            text,
            Vec::new(),
            accepted_answers.into_iter().map(Into::into).collect(),
        )
    }

    fn with_kind(
        id: impl Into<String>,
        kind: QuestionKind,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
        accepted_answers: Vec<String>,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            kind,
            text: text.into(),
            options,
            accepted_answers,
            match_mode: MatchMode::default(),
            image_context: None,
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Options flagged correct, in option-list order.
    pub fn correct_options(&self) -> impl Iterator<Item = &AnswerOption> {
        self.options.iter().filter(|opt| opt.is_correct)
    }

    #[must_use]
    pub fn option(&self, id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|opt| &opt.id == id)
    }
}
