mod view;

use std::collections::{BTreeMap, HashMap};

use cliptrail_base::{
    Classified, ClipEntry, ClipEntryMetadata, EntryId, Fingerprint, SearchQuery,
    DEFAULT_MAX_HISTORY,
};
use time::{Duration, OffsetDateTime};

pub use self::view::HistoryView;

/// Outcome of committing classified content.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Commit {
    Inserted(EntryId),
    Bumped(EntryId),
}

impl Commit {
    #[inline]
    #[must_use]
    pub const fn id(self) -> EntryId {
        match self {
            Self::Inserted(id) | Self::Bumped(id) => id,
        }
    }
}

/// Bounded, recency-ordered, favorite-aware clipboard history.
///
/// At most one entry exists per fingerprint. Non-favorite entries beyond the
/// limit are evicted oldest first, favorites are never evicted.
#[derive(Debug)]
pub struct HistoryStore {
    limit: usize,

    // use id of ClipEntry as the key
    entries: HashMap<EntryId, ClipEntry>,

    fingerprint_to_id: HashMap<Fingerprint, EntryId>,

    // recency index, timestamps are unique
    timestamp_to_id: BTreeMap<OffsetDateTime, EntryId>,

    favorite_count: usize,

    next_id: EntryId,
}

impl Default for HistoryStore {
    fn default() -> Self { Self::with_limit(DEFAULT_MAX_HISTORY) }
}

impl HistoryStore {
    /// A limit of zero falls back to [`DEFAULT_MAX_HISTORY`].
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: effective_limit(limit),
            entries: HashMap::new(),
            fingerprint_to_id: HashMap::new(),
            timestamp_to_id: BTreeMap::new(),
            favorite_count: 0,
            next_id: EntryId::new(1),
        }
    }

    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize { self.limit }

    /// Takes effect on the next commit.
    #[inline]
    pub fn set_limit(&mut self, limit: usize) -> usize {
        self.limit = effective_limit(limit);
        self.limit
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[inline]
    #[must_use]
    pub fn non_favorite_count(&self) -> usize { self.entries.len() - self.favorite_count }

    #[inline]
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&ClipEntry> { self.entries.get(&id) }

    #[inline]
    #[must_use]
    pub fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Option<&ClipEntry> {
        self.fingerprint_to_id.get(fingerprint).and_then(|id| self.entries.get(id))
    }

    /// Entries from the most recent to the oldest.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ClipEntry> {
        self.timestamp_to_id.values().rev().filter_map(|id| self.entries.get(id))
    }

    #[must_use]
    pub fn query(&self, query: &SearchQuery) -> Vec<ClipEntry> {
        self.iter().filter(|entry| entry.matches_query(query)).cloned().collect()
    }

    #[must_use]
    pub fn list(&self, query: &SearchQuery, preview_length: usize) -> Vec<ClipEntryMetadata> {
        self.iter()
            .filter(|entry| entry.matches_query(query))
            .map(|entry| entry.metadata(Some(preview_length)))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn newest_timestamp(&self) -> Option<OffsetDateTime> {
        self.timestamp_to_id.last_key_value().map(|(timestamp, _)| *timestamp)
    }

    /// Inserts new content or bumps the entry already holding the same
    /// fingerprint.
    pub fn commit(&mut self, classified: Classified, at: OffsetDateTime) -> Commit {
        match self.bump_to_front(&classified.fingerprint, at) {
            Some(id) => Commit::Bumped(id),
            None => Commit::Inserted(self.insert(classified, at)),
        }
    }

    /// Inserts content not yet in the history at the front.
    ///
    /// Content whose fingerprint is already present is bumped instead, the
    /// history never holds two entries with the same fingerprint.
    pub fn insert(&mut self, classified: Classified, at: OffsetDateTime) -> EntryId {
        if let Some(id) = self.bump_to_front(&classified.fingerprint, at) {
            return id;
        }

        let id = self.next_id;
        self.next_id = id.next();
        let at = self.vacant_timestamp(at);
        let entry = ClipEntry::new(id, classified, at);
        let _ = self.fingerprint_to_id.insert(entry.fingerprint(), id);
        let _ = self.timestamp_to_id.insert(at, id);
        drop(self.entries.insert(id, entry));
        id
    }

    /// Moves the entry holding `fingerprint` to the front. Only its
    /// timestamp changes.
    pub fn bump_to_front(&mut self, fingerprint: &Fingerprint, at: OffsetDateTime) -> Option<EntryId> {
        let id = *self.fingerprint_to_id.get(fingerprint)?;
        let old_timestamp = self.entries.get(&id)?.created_at();
        let _ = self.timestamp_to_id.remove(&old_timestamp);
        let at = self.vacant_timestamp(at);
        let _ = self.timestamp_to_id.insert(at, id);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.touch(at);
        }
        Some(id)
    }

    /// Returns the new favorite state, `None` if there is no such entry.
    pub fn toggle_favorite(&mut self, id: EntryId) -> Option<bool> {
        let entry = self.entries.get_mut(&id)?;
        let is_favorite = !entry.is_favorite();
        entry.set_favorite(is_favorite);
        if is_favorite {
            self.favorite_count += 1;
        } else {
            self.favorite_count -= 1;
        }
        Some(is_favorite)
    }

    pub fn evict_oldest_non_favorite(&mut self) -> Option<ClipEntry> {
        let id = self
            .timestamp_to_id
            .values()
            .copied()
            .find(|id| self.entries.get(id).is_some_and(|entry| !entry.is_favorite()))?;
        tracing::trace!("Evict oldest non-favorite entry (id: {id})");
        self.remove(id)
    }

    /// Evicts until the non-favorite count fits the limit.
    pub fn evict_overflow(&mut self) -> Vec<ClipEntry> {
        let mut evicted = Vec::new();
        while self.non_favorite_count() > self.limit {
            match self.evict_oldest_non_favorite() {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }
        evicted
    }

    pub fn remove(&mut self, id: EntryId) -> Option<ClipEntry> {
        let entry = self.entries.remove(&id)?;
        let _ = self.timestamp_to_id.remove(&entry.created_at());
        let _ = self.fingerprint_to_id.remove(&entry.fingerprint());
        if entry.is_favorite() {
            self.favorite_count -= 1;
        }
        Some(entry)
    }

    /// Removes every non-favorite entry.
    pub fn clear_non_favorites(&mut self) -> Vec<ClipEntry> {
        let ids = self
            .entries
            .values()
            .filter(|entry| !entry.is_favorite())
            .map(ClipEntry::id)
            .collect::<Vec<_>>();
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Replaces the content with rehydrated entries.
    ///
    /// Returns the entries that were dropped, either because a more recent
    /// entry holds the same fingerprint or because they overflow the limit.
    /// The id sequence continues after the largest imported id.
    pub fn import<I>(&mut self, entries: I) -> Vec<ClipEntry>
    where
        I: IntoIterator<Item = ClipEntry>,
    {
        self.entries.clear();
        self.fingerprint_to_id.clear();
        self.timestamp_to_id.clear();
        self.favorite_count = 0;

        let mut entries = entries.into_iter().collect::<Vec<_>>();
        // most recent first, so the survivor of a fingerprint clash is the newest
        entries.sort_unstable();

        let mut max_id = EntryId::default();
        let mut dropped = Vec::new();
        for mut entry in entries {
            max_id = max_id.max(entry.id());
            if self.fingerprint_to_id.contains_key(&entry.fingerprint())
                || self.entries.contains_key(&entry.id())
            {
                dropped.push(entry);
                continue;
            }

            let at = self.vacant_timestamp_before(entry.created_at());
            entry.touch(at);
            if entry.is_favorite() {
                self.favorite_count += 1;
            }
            let _ = self.fingerprint_to_id.insert(entry.fingerprint(), entry.id());
            let _ = self.timestamp_to_id.insert(at, entry.id());
            drop(self.entries.insert(entry.id(), entry));
        }
        self.next_id = max_id.next();

        dropped.extend(self.evict_overflow());
        dropped
    }

    #[inline]
    #[must_use]
    pub fn export(&self) -> Vec<ClipEntry> { self.iter().cloned().collect() }

    // timestamps handed in by the pipeline are already unique; this keeps the
    // index consistent when the store is driven directly
    fn vacant_timestamp(&self, mut at: OffsetDateTime) -> OffsetDateTime {
        while self.timestamp_to_id.contains_key(&at) {
            at += Duration::nanoseconds(1);
        }
        at
    }

    fn vacant_timestamp_before(&self, mut at: OffsetDateTime) -> OffsetDateTime {
        while self.timestamp_to_id.contains_key(&at) {
            at -= Duration::nanoseconds(1);
        }
        at
    }
}

#[inline]
const fn effective_limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_MAX_HISTORY
    } else {
        limit
    }
}
