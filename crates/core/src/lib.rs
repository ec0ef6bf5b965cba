#![forbid(unsafe_code)]

pub mod format;
pub mod grading;
pub mod model;
pub mod time;

pub use format::{NOT_AVAILABLE, correct_answer_display};
pub use grading::{GradeResult, grade};
pub use time::Clock;
