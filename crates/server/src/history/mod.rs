mod driver;
mod error;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cliptrail_base::{ClipEntry, EntryId};
use serde::{Deserialize, Serialize};

pub use self::{
    driver::{FileSystemRepository, MemoryRepository, SqliteRepository},
    error::Error,
};

/// Durable row store for history entries.
///
/// Every call is atomic on its own. `update` writes the entry whether or not
/// a row already exists for its id, and deleting a missing row succeeds.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn insert(&mut self, entry: &ClipEntry) -> Result<(), Error>;

    async fn update(&mut self, entry: &ClipEntry) -> Result<(), Error>;

    async fn delete(&mut self, id: EntryId) -> Result<(), Error>;

    /// Every persisted entry, most recent first.
    async fn list_all(&mut self) -> Result<Vec<ClipEntry>, Error>;
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryKind {
    #[default]
    Sqlite,

    FileSystem,

    Memory,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepositoryOptions {
    pub kind: RepositoryKind,

    /// Directory holding the history.
    pub path: PathBuf,
}

impl RepositoryOptions {
    #[must_use]
    pub fn new<P: AsRef<Path>>(kind: RepositoryKind, path: P) -> Self {
        Self { kind, path: path.as_ref().to_path_buf() }
    }
}

/// # Errors
///
/// Returns an error if the underlying storage cannot be opened.
pub async fn open(options: &RepositoryOptions) -> Result<Box<dyn Repository>, Error> {
    let RepositoryOptions { kind, path } = options;
    Ok(match kind {
        RepositoryKind::Sqlite => Box::new(SqliteRepository::open(path).await?),
        RepositoryKind::FileSystem => Box::new(FileSystemRepository::open(path).await?),
        RepositoryKind::Memory => Box::new(MemoryRepository::new()),
    })
}
