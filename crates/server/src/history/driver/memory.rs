use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use cliptrail_base::{ClipEntry, EntryId};
use parking_lot::Mutex;

use crate::history::{Error, Repository};

/// Ephemeral repository, the history is lost on exit.
///
/// Clones share the same rows.
#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    rows: Arc<Mutex<HashMap<EntryId, ClipEntry>>>,
}

impl MemoryRepository {
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ClipEntry>,
    {
        let rows = entries.into_iter().map(|entry| (entry.id(), entry)).collect();
        Self { rows: Arc::new(Mutex::new(rows)) }
    }

    /// Persisted rows, most recent first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ClipEntry> {
        let mut entries = self.rows.lock().values().cloned().collect::<Vec<_>>();
        entries.sort_unstable();
        entries
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: EntryId) -> bool { self.rows.lock().contains_key(&id) }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn insert(&mut self, entry: &ClipEntry) -> Result<(), Error> {
        drop(self.rows.lock().insert(entry.id(), entry.clone()));
        Ok(())
    }

    async fn update(&mut self, entry: &ClipEntry) -> Result<(), Error> {
        drop(self.rows.lock().insert(entry.id(), entry.clone()));
        Ok(())
    }

    async fn delete(&mut self, id: EntryId) -> Result<(), Error> {
        drop(self.rows.lock().remove(&id));
        Ok(())
    }

    async fn list_all(&mut self) -> Result<Vec<ClipEntry>, Error> { Ok(self.snapshot()) }
}
