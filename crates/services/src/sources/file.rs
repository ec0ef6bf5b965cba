use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use defense_core::model::BlockId;

use super::{QuestionSet, QuestionSource};
use crate::error::FetchError;

/// Question source reading `block<N>.json` files from a local directory.
///
/// Files use the same body as the HTTP API, so a bank can be played offline.
#[derive(Clone, Debug)]
pub struct FileQuestionSource {
    dir: PathBuf,
}

impl FileQuestionSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn block_path(&self, block: BlockId) -> PathBuf {
        self.dir.join(format!("block{block}.json"))
    }
}

fn block_from_file_name(name: &str) -> Option<BlockId> {
    name.strip_prefix("block")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

#[async_trait]
impl QuestionSource for FileQuestionSource {
    async fn list_blocks(&self) -> Result<Vec<BlockId>, FetchError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut blocks = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(block) = entry.file_name().to_str().and_then(block_from_file_name) {
                blocks.push(block);
            }
        }
        blocks.sort();
        Ok(blocks)
    }

    async fn fetch_questions(&self, block: BlockId) -> Result<QuestionSet, FetchError> {
        let path = self.block_path(block);
        debug!(path = %path.display(), "reading questions");

        let body = match fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(FetchError::NotFound(block));
            }
            Err(err) => return Err(err.into()),
        };
        QuestionSet::parse(block, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_file_names_parse() {
        assert_eq!(block_from_file_name("block3.json"), Some(BlockId::new(3)));
        assert_eq!(block_from_file_name("block12.json"), Some(BlockId::new(12)));
        assert_eq!(block_from_file_name("blockx.json"), None);
        assert_eq!(block_from_file_name("notes.txt"), None);
    }
}
