//! CLI configuration: where state lives and how to reach the model.

use std::path::PathBuf;

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub model_cmd: Option<String>,
}

impl AppConfig {
    pub fn new(data_dir: PathBuf, model_cmd: Option<String>) -> Self {
        Self { data_dir, model_cmd }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("events.json")
    }

    pub fn sync_state_path(&self) -> PathBuf {
        self.data_dir.join("sync_state.json")
    }
}
