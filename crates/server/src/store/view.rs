use std::sync::Arc;

use cliptrail_base::{ClipEntry, ClipEntryMetadata, EntryId, SearchQuery};
use parking_lot::RwLock;

use crate::store::HistoryStore;

/// Read-only handle on the history.
///
/// Every call observes a consistent snapshot, readers never block each
/// other and are only held back while the capture pipeline applies a
/// mutation.
#[derive(Clone, Debug)]
pub struct HistoryView {
    store: Arc<RwLock<HistoryStore>>,
}

impl HistoryView {
    #[inline]
    #[must_use]
    pub const fn new(store: Arc<RwLock<HistoryStore>>) -> Self { Self { store } }

    /// Visible entries, most recent first.
    #[must_use]
    pub fn query(&self, query: &SearchQuery) -> Vec<ClipEntry> { self.store.read().query(query) }

    #[must_use]
    pub fn list(&self, query: &SearchQuery, preview_length: usize) -> Vec<ClipEntryMetadata> {
        self.store.read().list(query, preview_length)
    }

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<ClipEntry> { self.store.read().get(id).cloned() }

    #[must_use]
    pub fn len(&self) -> usize { self.store.read().len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.store.read().is_empty() }

    #[must_use]
    pub fn limit(&self) -> usize { self.store.read().limit() }
}
