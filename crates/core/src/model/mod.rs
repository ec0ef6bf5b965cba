mod answer;
mod ids;
mod question;
mod session;

pub use answer::{Answer, NO_ANSWER};
pub use ids::{BlockId, OptionId, QuestionId};
pub use question::{AnswerOption, MatchMode, Question, QuestionKind};
pub use session::{
    Phase, ProgressError, SavedProgress, SessionState, WIN_THRESHOLD, WrongAnswerRecord,
};
