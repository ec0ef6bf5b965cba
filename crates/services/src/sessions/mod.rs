mod engine;
mod launcher;
mod progress;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::{SessionEngine, SubmitOutcome};
pub use launcher::{GameLauncher, PendingResume, StartedGame};
pub use progress::SessionProgress;
pub use view::{ResumePreview, ReviewItem, feedback_line, review_items};
