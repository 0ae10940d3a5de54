use std::path::PathBuf;

use cliptrail_server::history::{RepositoryKind, RepositoryOptions};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub driver: RepositoryKind,

    #[serde(default = "cliptrail_base::config::default_history_dir")]
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { driver: RepositoryKind::default(), path: cliptrail_base::config::default_history_dir() }
    }
}

impl From<HistoryConfig> for RepositoryOptions {
    fn from(HistoryConfig { driver, path }: HistoryConfig) -> Self { Self::new(driver, path) }
}
