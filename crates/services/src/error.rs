//! Shared error types for the services crate.

use thiserror::Error;

use defense_core::model::{BlockId, Phase, ProgressError, QuestionId};

/// Errors emitted by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("sector {0} not found")]
    NotFound(BlockId),
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed question payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("sector {0} has no questions")]
    EmptyQuestionSet(BlockId),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted by the session engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("operation requires an active game, session is in {0:?}")]
    NotPlaying(Phase),
    #[error("answer submitted for question {got}, current question is {expected}")]
    QuestionMismatch {
        expected: QuestionId,
        got: QuestionId,
    },
    #[error("question {0} has already been answered")]
    AlreadyAnswered(QuestionId),
    #[error("review requires a finished pass, session is in {0:?}")]
    PassNotFinished(Phase),
    #[error(transparent)]
    InvalidProgress(#[from] ProgressError),
}

/// Errors emitted while launching a game from the menu.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LauncherError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
