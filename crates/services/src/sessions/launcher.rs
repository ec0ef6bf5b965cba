use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;
use tracing::warn;

use defense_core::model::{BlockId, SavedProgress};

use super::engine::SessionEngine;
use super::view::ResumePreview;
use crate::error::{FetchError, LauncherError};
use crate::sources::{QuestionSetMeta, QuestionSource};

/// A valid saved session waiting for the player's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResume {
    pub saved: SavedProgress,
    pub preview: ResumePreview,
}

/// Details of a freshly started game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedGame {
    pub block: BlockId,
    pub total_questions: usize,
    pub meta: Option<QuestionSetMeta>,
}

/// Orchestrates the menu: sector listing, fetch-then-start, resume and discard.
///
/// Fetching happens before the engine is touched, so a failed fetch leaves the
/// session in the menu with nothing persisted.
#[derive(Clone)]
pub struct GameLauncher {
    source: Arc<dyn QuestionSource>,
    shuffle: bool,
}

impl GameLauncher {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            shuffle: false,
        }
    }

    /// Shuffle each fetched sector before playing it.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sectors offered by the source.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the source cannot list its sectors.
    pub async fn list_blocks(&self) -> Result<Vec<BlockId>, FetchError> {
        self.source.list_blocks().await
    }

    /// Check storage for a session the player may continue.
    #[must_use]
    pub fn pending_resume(&self, engine: &SessionEngine) -> Option<PendingResume> {
        let saved = engine.saved_progress()?;
        let preview = ResumePreview::from_saved(&saved);
        Some(PendingResume { saved, preview })
    }

    /// Fetch `block` and start playing it.
    ///
    /// # Errors
    ///
    /// Returns `LauncherError::Fetch` if the questions cannot be loaded; the
    /// engine is not modified in that case.
    pub async fn start_block(
        &self,
        engine: &mut SessionEngine,
        block: BlockId,
    ) -> Result<StartedGame, LauncherError> {
        let set = match self.source.fetch_questions(block).await {
            Ok(set) => set,
            Err(err) => {
                warn!(%block, error = %err, "failed to load sector");
                return Err(err.into());
            }
        };

        let mut questions = set.questions;
        if self.shuffle {
            questions.as_mut_slice().shuffle(&mut rng());
        }
        let total_questions = questions.len();
        engine.start_game(block, questions)?;

        Ok(StartedGame {
            block,
            total_questions,
            meta: set.meta,
        })
    }

    /// Continue the pending session.
    ///
    /// # Errors
    ///
    /// Returns `LauncherError::Session` if the snapshot is no longer valid.
    pub fn resume(
        &self,
        engine: &mut SessionEngine,
        pending: PendingResume,
    ) -> Result<(), LauncherError> {
        engine.resume_game(pending.saved)?;
        Ok(())
    }

    /// Discard the pending session and stay in the menu.
    pub fn new_game(&self, engine: &mut SessionEngine) {
        engine.clear_progress();
    }
}
