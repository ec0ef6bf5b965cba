use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Answer, BlockId, Question};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Top-level position of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Menu,
    Playing,
    GameOver,
    Win,
    ReviewErrors,
}

impl Phase {
    /// `Win` and `GameOver` end a pass.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::GameOver)
    }
}

//
// ─── WRONG ANSWER RECORD ───────────────────────────────────────────────────────
//

/// Snapshot of an incorrect submission.
///
/// `question` shares the playlist entry; `correct_answer` is rendered at
/// submission time and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswerRecord {
    pub question: Arc<Question>,
    pub user_answer: Answer,
    pub correct_answer: String,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Accuracy at or above this value wins the pass.
pub const WIN_THRESHOLD: f64 = 0.7;

/// The mutable core of a game session.
///
/// `Default` is the initial menu state: no block, empty playlist, zeroed counters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub phase: Phase,
    pub current_block: Option<BlockId>,
    pub questions: Vec<Arc<Question>>,
    pub current_index: usize,
    pub score: usize,
    pub wrong_answers: Vec<WrongAnswerRecord>,
    pub accuracy: f64,
}

impl SessionState {
    /// Fresh playing state over the given playlist.
    #[must_use]
    pub fn playing(current_block: Option<BlockId>, questions: Vec<Arc<Question>>) -> Self {
        Self {
            phase: Phase::Playing,
            current_block,
            questions,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Arc<Question>> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// True when the current question is the last of the playlist.
    #[must_use]
    pub fn on_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Submissions graded in this pass.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.score + self.wrong_answers.len()
    }

    /// True once the current question has been graded and is waiting for
    /// `move_to_next_question`.
    #[must_use]
    pub fn current_answered(&self) -> bool {
        self.answered() > self.current_index
    }

    /// `score / max(len, 1)`.
    #[must_use]
    pub fn compute_accuracy(&self) -> f64 {
        let total = self.questions.len().max(1);
        self.score as f64 / total as f64
    }

    /// Whether this state should have a persisted snapshot.
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        self.phase == Phase::Playing && !self.questions.is_empty()
    }
}

//
// ─── PERSISTED SNAPSHOT ────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("saved progress has no questions")]
    NoQuestions,

    #[error("saved question index {index} is out of range for {total} questions")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("saved score {score} exceeds {total} questions")]
    ScoreOutOfRange { score: usize, total: usize },

    #[error("saved progress grades {answered} answers but stands on question {index}")]
    AnswerCountOutOfRange { answered: usize, index: usize },
}

/// Durable blob for an in-progress session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProgress {
    pub current_block: Option<BlockId>,
    pub current_question_index: usize,
    pub questions: Vec<Arc<Question>>,
    pub score: usize,
    #[serde(default)]
    pub wrong_answers: Vec<WrongAnswerRecord>,
    pub saved_at: DateTime<Utc>,
}

impl SavedProgress {
    /// Capture the resumable parts of a session.
    #[must_use]
    pub fn capture(state: &SessionState, saved_at: DateTime<Utc>) -> Self {
        Self {
            current_block: state.current_block,
            current_question_index: state.current_index,
            questions: state.questions.clone(),
            score: state.score,
            wrong_answers: state.wrong_answers.clone(),
            saved_at,
        }
    }

    /// Check that the blob can be resumed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the playlist is empty, the index does not
    /// point at a question, the score exceeds the playlist length, or more
    /// answers were graded than questions reached.
    pub fn validate(&self) -> Result<(), ProgressError> {
        let total = self.questions.len();
        if total == 0 {
            return Err(ProgressError::NoQuestions);
        }
        if self.current_question_index >= total {
            return Err(ProgressError::IndexOutOfRange {
                index: self.current_question_index,
                total,
            });
        }
        if self.score > total {
            return Err(ProgressError::ScoreOutOfRange {
                score: self.score,
                total,
            });
        }
        let answered = self.score + self.wrong_answers.len();
        if answered > self.current_question_index + 1 {
            return Err(ProgressError::AnswerCountOutOfRange {
                answered,
                index: self.current_question_index,
            });
        }
        Ok(())
    }

    /// The question the player will see on resume.
    #[must_use]
    pub fn current_question(&self) -> Option<&Arc<Question>> {
        self.questions.get(self.current_question_index)
    }
}
