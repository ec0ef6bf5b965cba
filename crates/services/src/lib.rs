#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod sources;

pub use defense_core::Clock;
pub use sessions as session;

pub use error::{FetchError, LauncherError, SessionError};
pub use sessions::{
    GameLauncher, PendingResume, ResumePreview, ReviewItem, SessionEngine, SessionProgress,
    StartedGame, SubmitOutcome, feedback_line, review_items,
};
pub use sources::{
    FileQuestionSource, HttpQuestionSource, HttpSourceConfig, QuestionSet, QuestionSetMeta,
    QuestionSource,
};
