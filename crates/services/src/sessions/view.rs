use chrono::{DateTime, Utc};

use defense_core::NOT_AVAILABLE;
use defense_core::model::{BlockId, SavedProgress, SessionState, WrongAnswerRecord};

use super::engine::SubmitOutcome;

/// Characters of the current question shown in the resume prompt.
const EXCERPT_CHARS: usize = 60;

/// Presentation-agnostic summary of a resumable session.
///
/// Timestamps stay as `DateTime<Utc>`; the UI decides how to render them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePreview {
    pub block: Option<BlockId>,
    /// 1-based number of the question the player will resume on.
    pub question_number: usize,
    pub total: usize,
    /// Share of the playlist already behind the player, rounded to a whole percent.
    pub progress_percent: u8,
    pub score: usize,
    pub saved_at: DateTime<Utc>,
    pub current_excerpt: Option<String>,
}

impl ResumePreview {
    #[must_use]
    pub fn from_saved(saved: &SavedProgress) -> Self {
        let total = saved.questions.len();
        let percent = if total == 0 {
            0
        } else {
            (saved.current_question_index * 100 + total / 2) / total
        };
        Self {
            block: saved.current_block,
            question_number: saved.current_question_index + 1,
            total,
            progress_percent: u8::try_from(percent.min(100)).unwrap_or(100),
            score: saved.score,
            saved_at: saved.saved_at,
            current_excerpt: saved
                .current_question()
                .map(|q| q.text.chars().take(EXCERPT_CHARS).collect()),
        }
    }
}

/// One entry of the mistake review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub label: String,
    pub question_text: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

impl ReviewItem {
    #[must_use]
    pub fn from_record(record: &WrongAnswerRecord) -> Self {
        let question = &record.question;
        let correct_answer = if record.correct_answer.trim().is_empty() {
            NOT_AVAILABLE.to_owned()
        } else {
            record.correct_answer.clone()
        };
        Self {
            label: format!("Q{}", question.id),
            question_text: question.text.clone(),
            user_answer: record.user_answer.display(),
            correct_answer,
            explanation: question.explanation.clone(),
        }
    }
}

/// Review entries for the mistakes of the current pass, in submission order.
#[must_use]
pub fn review_items(state: &SessionState) -> Vec<ReviewItem> {
    state.wrong_answers.iter().map(ReviewItem::from_record).collect()
}

/// One-line feedback shown after a submission.
#[must_use]
pub fn feedback_line(outcome: &SubmitOutcome) -> String {
    let verdict = if outcome.is_correct {
        "ACCESS GRANTED - CORRECT"
    } else {
        "ACCESS DENIED - INCORRECT"
    };
    format!("{verdict} ({}/{})", outcome.score, outcome.total_questions)
}
