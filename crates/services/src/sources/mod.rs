//! Where question sets come from.
//!
//! A source is the only asynchronous collaborator of a game: it runs before
//! `SessionEngine::start_game` and its failures never reach the engine.

mod file;
mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use defense_core::model::{BlockId, Question};

use crate::error::FetchError;

pub use file::FileQuestionSource;
pub use http::{HttpQuestionSource, HttpSourceConfig};

/// Descriptive header some question banks carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSetMeta {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub total_questions: Option<usize>,
}

/// Payload of a question fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default)]
    pub meta: Option<QuestionSetMeta>,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Parse a question bank body and make sure it can be played.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Malformed` for unparseable bodies and
    /// `FetchError::EmptyQuestionSet` when no questions are present.
    pub fn parse(block: BlockId, body: &str) -> Result<Self, FetchError> {
        let set: Self = serde_json::from_str(body)?;
        if set.questions.is_empty() {
            return Err(FetchError::EmptyQuestionSet(block));
        }
        Ok(set)
    }
}

/// Read access to the question banks.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Sectors this source can serve, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the listing cannot be retrieved.
    async fn list_blocks(&self) -> Result<Vec<BlockId>, FetchError>;

    /// Load the questions of one sector.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` for missing sectors, transport failures, malformed
    /// bodies, or empty question lists.
    async fn fetch_questions(&self, block: BlockId) -> Result<QuestionSet, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_meta_and_questions() {
        let body = r#"{
            "meta": {"topic": "Firewalls", "version": "1.0", "total_questions": 1},
            "questions": [{"id": 1, "type": "single_choice", "text": "?",
                           "options": [{"id": "A", "text": "yes", "is_correct": true}]}]
        }"#;
        let set = QuestionSet::parse(BlockId::new(1), body).unwrap();
        assert_eq!(set.meta.unwrap().topic.as_deref(), Some("Firewalls"));
        assert_eq!(set.questions.len(), 1);
    }

    #[test]
    fn parse_rejects_empty_and_malformed_bodies() {
        assert!(matches!(
            QuestionSet::parse(BlockId::new(2), r#"{"questions": []}"#),
            Err(FetchError::EmptyQuestionSet(_))
        ));
        assert!(matches!(
            QuestionSet::parse(BlockId::new(2), r#"{"items": []}"#),
            Err(FetchError::Malformed(_))
        ));
    }
}
