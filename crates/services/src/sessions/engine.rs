use std::fmt;
use std::sync::Arc;

use defense_core::model::{
    Answer, BlockId, Phase, Question, SavedProgress, SessionState, WIN_THRESHOLD,
    WrongAnswerRecord,
};
use defense_core::{Clock, correct_answer_display, grade};
use storage::ProgressStore;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::SessionError;

//
// ─── SUBMIT OUTCOME ────────────────────────────────────────────────────────────
//

/// Result of grading the current question.
///
/// `finished` means "this was the last question of the playlist"; the phase
/// only changes on the following `move_to_next_question`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub is_correct: bool,
    pub finished: bool,
    pub score: usize,
    pub total_questions: usize,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Owner of the single game session.
///
/// Every mutation persists (or clears) the durable snapshot and then publishes
/// the new state to subscribers. Persistence failures are logged and never
/// surface to the caller; in-memory state stays authoritative.
pub struct SessionEngine {
    clock: Clock,
    store: Arc<dyn ProgressStore>,
    state: SessionState,
    updates: watch::Sender<SessionState>,
}

impl SessionEngine {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn ProgressStore>) -> Self {
        let state = SessionState::default();
        let (updates, _) = watch::channel(state.clone());
        Self {
            clock,
            store,
            state,
            updates,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Receive a snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.updates.subscribe()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Arc<Question>> {
        match self.state.phase {
            Phase::Playing => self.state.current_question(),
            _ => None,
        }
    }

    /// Begin a new pass over `questions` for `block`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty; state is left untouched.
    pub fn start_game(
        &mut self,
        block: BlockId,
        questions: Vec<Question>,
    ) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let questions: Vec<_> = questions.into_iter().map(Arc::new).collect();
        info!(%block, total = questions.len(), "starting game");

        self.state = SessionState::playing(Some(block), questions);
        self.persist();
        self.publish();
        Ok(())
    }

    /// Continue a previously persisted session.
    ///
    /// The snapshot is already durable, so nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidProgress` if the snapshot cannot be resumed.
    pub fn resume_game(&mut self, saved: SavedProgress) -> Result<(), SessionError> {
        saved.validate()?;
        info!(
            block = ?saved.current_block,
            index = saved.current_question_index,
            "resuming game"
        );

        let wrong_answers = relink_records(&saved.questions, saved.wrong_answers);
        self.state = SessionState {
            phase: Phase::Playing,
            current_block: saved.current_block,
            questions: saved.questions,
            current_index: saved.current_question_index,
            score: saved.score,
            wrong_answers,
            accuracy: 0.0,
        };
        self.publish();
        Ok(())
    }

    /// Grade `answer` for `question`, which must be the current question.
    ///
    /// Does not advance; call [`Self::move_to_next_question`] for that.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPlaying` outside a game,
    /// `SessionError::QuestionMismatch` if `question` is not the current one
    /// and `SessionError::AlreadyAnswered` on a second submission.
    pub fn submit_answer(
        &mut self,
        answer: Answer,
        question: &Question,
    ) -> Result<SubmitOutcome, SessionError> {
        let current = self.require_current()?;
        if current.id != question.id {
            return Err(SessionError::QuestionMismatch {
                expected: current.id.clone(),
                got: question.id.clone(),
            });
        }
        self.record(current, answer)
    }

    /// Grade `answer` against the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPlaying` outside a game and
    /// `SessionError::AlreadyAnswered` on a second submission.
    pub fn submit_current(&mut self, answer: Answer) -> Result<SubmitOutcome, SessionError> {
        let current = self.require_current()?;
        self.record(current, answer)
    }

    fn require_current(&self) -> Result<Arc<Question>, SessionError> {
        self.current_question()
            .cloned()
            .ok_or(SessionError::NotPlaying(self.state.phase))
    }

    fn record(
        &mut self,
        question: Arc<Question>,
        answer: Answer,
    ) -> Result<SubmitOutcome, SessionError> {
        // One grading per slot keeps score <= len(questions).
        if self.state.current_answered() {
            return Err(SessionError::AlreadyAnswered(question.id.clone()));
        }
        let is_correct = grade(&question, &answer).is_correct;
        debug!(question = %question.id, is_correct, "answer graded");

        if is_correct {
            self.state.score += 1;
        } else {
            let correct_answer = correct_answer_display(&question);
            self.state.wrong_answers.push(WrongAnswerRecord {
                question,
                user_answer: answer,
                correct_answer,
            });
        }

        self.persist();
        self.publish();

        Ok(SubmitOutcome {
            is_correct,
            finished: self.state.on_last_question(),
            score: self.state.score,
            total_questions: self.state.total_questions(),
        })
    }

    /// Advance to the next question, or finish the pass on the last one.
    ///
    /// Finishing computes accuracy, enters `Win` or `GameOver` and clears the
    /// snapshot. Returns the resulting phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPlaying` outside a game.
    pub fn move_to_next_question(&mut self) -> Result<Phase, SessionError> {
        if self.state.phase != Phase::Playing {
            return Err(SessionError::NotPlaying(self.state.phase));
        }

        if self.state.on_last_question() {
            let accuracy = self.state.compute_accuracy();
            self.state.accuracy = accuracy;
            self.state.phase = if accuracy >= WIN_THRESHOLD {
                Phase::Win
            } else {
                Phase::GameOver
            };
            info!(
                score = self.state.score,
                total = self.state.total_questions(),
                accuracy,
                phase = ?self.state.phase,
                "pass finished"
            );
            self.clear_snapshot();
        } else {
            self.state.current_index += 1;
            self.persist();
        }

        self.publish();
        Ok(self.state.phase)
    }

    /// Return to the menu and drop any saved progress.
    pub fn reset_game(&mut self) {
        self.state = SessionState::default();
        self.clear_snapshot();
        self.publish();
    }

    /// Discard a resumable session without playing it.
    pub fn clear_progress(&mut self) {
        self.clear_snapshot();
        self.state = SessionState::default();
        self.publish();
    }

    /// Show the mistakes of the last pass.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PassNotFinished` unless the pass has ended, so a
    /// game in progress keeps its snapshot.
    pub fn go_to_review(&mut self) -> Result<(), SessionError> {
        let phase = self.state.phase;
        if !(phase.is_terminal() || phase == Phase::ReviewErrors) {
            return Err(SessionError::PassNotFinished(phase));
        }
        self.state.phase = Phase::ReviewErrors;
        self.publish();
        Ok(())
    }

    /// Replay the questions answered incorrectly in this pass.
    ///
    /// Each wrong record contributes its own playlist slot, in record order.
    /// Returns `false` and changes nothing when there is nothing to retry.
    pub fn retry_wrong_questions(&mut self) -> bool {
        if self.state.wrong_answers.is_empty() {
            return false;
        }

        let questions: Vec<_> = self
            .state
            .wrong_answers
            .iter()
            .map(|record| Arc::clone(&record.question))
            .collect();
        info!(total = questions.len(), "retrying failed questions");

        self.state = SessionState::playing(self.state.current_block, questions);
        self.persist();
        self.publish();
        true
    }

    /// Load the saved snapshot, treating unreadable or invalid blobs as absent.
    #[must_use]
    pub fn saved_progress(&self) -> Option<SavedProgress> {
        match self.store.load() {
            Ok(saved) => saved,
            Err(err) => {
                warn!(error = %err, "failed to load saved progress");
                None
            }
        }
    }

    fn persist(&self) {
        if !self.state.is_resumable() {
            return;
        }
        let snapshot = SavedProgress::capture(&self.state, self.clock.now());
        if let Err(err) = self.store.save(&snapshot) {
            warn!(error = %err, "failed to save progress");
        }
    }

    fn clear_snapshot(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear saved progress");
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }
}

/// Point each record back at the playlist entry it was answered from.
///
/// A deserialized snapshot holds separate copies; records whose question is
/// not in the playlist keep their own.
fn relink_records(
    questions: &[Arc<Question>],
    records: Vec<WrongAnswerRecord>,
) -> Vec<WrongAnswerRecord> {
    records
        .into_iter()
        .map(|mut record| {
            if let Some(shared) = questions.iter().find(|q| **q == record.question) {
                record.question = Arc::clone(shared);
            }
            record
        })
        .collect()
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("phase", &self.state.phase)
            .field("current_block", &self.state.current_block)
            .field("questions_len", &self.state.questions.len())
            .field("current_index", &self.state.current_index)
            .field("score", &self.state.score)
            .field("wrong_len", &self.state.wrong_answers.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
