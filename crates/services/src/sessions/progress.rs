use defense_core::model::SessionState;

/// Aggregated view of playlist progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based number of the question on screen.
    pub question_number: usize,
}

impl SessionProgress {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        let total = state.total_questions();
        Self {
            total,
            answered: state.answered(),
            remaining: total.saturating_sub(state.current_index),
            question_number: (state.current_index + 1).min(total),
        }
    }
}
