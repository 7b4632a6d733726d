use std::sync::Arc;
use playlist2album_core::{
    Config, Fetcher, Finalizer, JobManager, ProgressStore, StorageConfig, Tagger,
};

/// Shared application state
pub struct AppState {
    config: Config,
    jobs: JobManager,
    finalizer: Finalizer,
}

impl AppState {
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>, tagger: Arc<dyn Tagger>) -> Self {
        let jobs = JobManager::new(config.storage.clone(), ProgressStore::new(), fetcher);
        let finalizer = Finalizer::new(config.storage.clone(), tagger);
        Self {
            config,
            jobs,
            finalizer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.config.storage
    }

    pub fn jobs(&self) -> &JobManager {
        &self.jobs
    }

    pub fn finalizer(&self) -> &Finalizer {
        &self.finalizer
    }
}
