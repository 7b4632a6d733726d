//! Mock tagger for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::tagger::{Tagger, TaggerError, TrackTags};

/// A recorded tag write for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTagWrite {
    pub path: PathBuf,
    pub tags: TrackTags,
    pub success: bool,
}

/// Mock implementation of the Tagger trait.
///
/// Records every call without touching the files. A failure can be injected
/// for the next call or for the call at a given position.
#[derive(Debug, Clone, Default)]
pub struct MockTagger {
    writes: Arc<RwLock<Vec<RecordedTagWrite>>>,
    next_error: Arc<RwLock<Option<TaggerError>>>,
    /// 0-based index of the call that fails.
    fail_on_call: Arc<RwLock<Option<usize>>>,
}

impl MockTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded tag writes.
    pub async fn recorded_writes(&self) -> Vec<RecordedTagWrite> {
        self.writes.read().await.clone()
    }

    /// Get the number of tag writes attempted.
    pub async fn write_count(&self) -> usize {
        self.writes.read().await.len()
    }

    /// Configure the next write to fail with the given error.
    pub async fn set_next_error(&self, error: TaggerError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make the write at `index` (0-based, counted over the mock's lifetime) fail.
    pub async fn fail_on_call(&self, index: usize) {
        *self.fail_on_call.write().await = Some(index);
    }
}

#[async_trait]
impl Tagger for MockTagger {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports(&self, _path: &Path) -> bool {
        true
    }

    async fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<(), TaggerError> {
        let mut writes = self.writes.write().await;
        let call = writes.len();

        let error = match self.next_error.write().await.take() {
            Some(err) => Some(err),
            None if *self.fail_on_call.read().await == Some(call) => {
                Some(TaggerError::write_failed(path, "injected failure"))
            }
            None => None,
        };

        writes.push(RecordedTagWrite {
            path: path.to_path_buf(),
            tags: tags.clone(),
            success: error.is_none(),
        });

        match error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
