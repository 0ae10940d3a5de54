use std::{borrow::Cow, cmp::Ordering, fmt, path::PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    classifier, payload::encode_file_list, Classified, ClassifyError, ClipboardPayload,
    ContentKind, Fingerprint, SearchQuery,
};

/// Number of characters of a text entry kept in its lowercase search key.
pub const SEARCHABLE_PREFIX_CHARS: usize = 2048;

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 { self.0 }

    #[inline]
    #[must_use]
    pub const fn next(self) -> Self { Self(self.0 + 1) }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self { Self(id) }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Classified clipboard content.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ClipContent {
    Text(String),
    Image(Bytes),
    FileList(Vec<PathBuf>),
}

impl ClipContent {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Image(_) => ContentKind::Image,
            Self::FileList(_) => ContentKind::FileList,
        }
    }

    /// Serialized payload: UTF-8 text, PNG bytes or NUL-separated raw paths.
    #[must_use]
    pub fn as_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_bytes()),
            Self::Image(bytes) => Cow::Borrowed(bytes),
            Self::FileList(paths) => Cow::Owned(encode_file_list(paths)),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.as_bytes().len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Image(bytes) => bytes.is_empty(),
            Self::FileList(paths) => paths.is_empty(),
        }
    }

    #[must_use]
    pub fn to_payload(&self) -> ClipboardPayload {
        match self {
            Self::Text(text) => ClipboardPayload::Text(Bytes::from(text.clone())),
            Self::Image(bytes) => ClipboardPayload::Image(bytes.clone()),
            Self::FileList(paths) => ClipboardPayload::FileList(paths.clone()),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct SearchKey {
    text: String,

    // the key holds only a prefix of the content
    truncated: bool,
}

impl SearchKey {
    fn new(content: &ClipContent) -> Self {
        match content {
            ClipContent::Text(text) => match text.char_indices().nth(SEARCHABLE_PREFIX_CHARS) {
                None => Self { text: text.to_lowercase(), truncated: false },
                Some((idx, _)) => Self { text: text[..idx].to_lowercase(), truncated: true },
            },
            ClipContent::Image(_) => {
                Self { text: ContentKind::Image.label().to_string(), truncated: false }
            }
            ClipContent::FileList(paths) => {
                let text = paths
                    .iter()
                    .map(|path| path.to_string_lossy().to_lowercase())
                    .collect::<Vec<_>>()
                    .join("\n");
                Self { text, truncated: false }
            }
        }
    }
}

/// One historical clipboard item.
#[derive(Clone, Debug, Eq)]
pub struct Entry {
    id: EntryId,

    content: ClipContent,

    fingerprint: Fingerprint,

    created_at: OffsetDateTime,

    is_favorite: bool,

    search_key: SearchKey,
}

impl Entry {
    #[must_use]
    pub fn new(id: EntryId, classified: Classified, created_at: OffsetDateTime) -> Self {
        let Classified { content, fingerprint } = classified;
        let search_key = SearchKey::new(&content);
        Self { id, content, fingerprint, created_at, is_favorite: false, search_key }
    }

    /// Rebuilds an entry from a persisted row. The fingerprint is recomputed
    /// from the payload so a stale stored value can never break deduplication.
    ///
    /// # Errors
    pub fn restore(
        id: EntryId,
        kind: ContentKind,
        data: &[u8],
        created_at: OffsetDateTime,
        is_favorite: bool,
    ) -> Result<Self, ClassifyError> {
        let classified = classifier::classify(ClipboardPayload::from_raw(kind, data))?;
        let mut entry = Self::new(id, classified, created_at);
        entry.is_favorite = is_favorite;
        Ok(entry)
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntryId { self.id }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ContentKind { self.content.kind() }

    #[inline]
    #[must_use]
    pub const fn content(&self) -> &ClipContent { &self.content }

    #[inline]
    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint { self.fingerprint }

    #[inline]
    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime { self.created_at }

    #[inline]
    #[must_use]
    pub const fn is_favorite(&self) -> bool { self.is_favorite }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.content.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.content.is_empty() }

    #[inline]
    #[must_use]
    pub fn payload_bytes(&self) -> Cow<'_, [u8]> { self.content.as_bytes() }

    /// Payload to hand back to the clipboard writer.
    #[inline]
    #[must_use]
    pub fn copy_back(&self) -> ClipboardPayload { self.content.to_payload() }

    #[must_use]
    pub fn matches_query(&self, query: &SearchQuery) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.needle();
        if self.search_key.text.contains(needle) {
            return true;
        }
        match &self.content {
            ClipContent::Text(text) if self.search_key.truncated => {
                text.to_lowercase().contains(needle)
            }
            _ => false,
        }
    }

    /// One-line, human readable rendering of the content.
    #[must_use]
    pub fn summarize(&self, line_length: Option<usize>) -> String {
        fn truncate(s: &str, max_chars: usize) -> &str {
            match s.char_indices().nth(max_chars) {
                None => s,
                Some((idx, _)) => &s[..idx],
            }
        }

        let data = match &self.content {
            ClipContent::Text(text) => text.clone(),
            ClipContent::Image(bytes) => {
                let size = humansize::format_size(bytes.len(), humansize::BINARY);
                format!("[image/png {size}]")
            }
            ClipContent::FileList(paths) => match paths.as_slice() {
                [single] => single.display().to_string(),
                [first, rest @ ..] => {
                    format!("{first} (+{count} more)", first = first.display(), count = rest.len())
                }
                [] => String::new(),
            },
        };

        let data = match line_length {
            None | Some(0) => data,
            Some(limit) => {
                let char_count = data.chars().count();
                let line_count = data.lines().count();
                if char_count > limit {
                    let line_info = if line_count > 1 {
                        format!("...({line_count} lines)")
                    } else {
                        "...".to_owned()
                    };
                    let mut data =
                        truncate(&data, limit.saturating_sub(line_info.len())).to_owned();
                    data.push_str(&line_info);
                    data
                } else {
                    data
                }
            }
        };

        data.replace('\n', "\\n").replace('\r', "\\r").replace('\t', "\\t")
    }

    /// Bump-to-front: only the recency changes.
    #[inline]
    pub fn touch(&mut self, at: OffsetDateTime) { self.created_at = at; }

    #[inline]
    pub fn set_favorite(&mut self, is_favorite: bool) { self.is_favorite = is_favorite; }

    #[inline]
    #[must_use]
    pub fn metadata(&self, preview_length: Option<usize>) -> Metadata {
        Metadata {
            id: self.id,
            kind: self.kind(),
            created_at: self.created_at,
            is_favorite: self.is_favorite,
            preview: self.summarize(preview_length),
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.fingerprint == other.fingerprint
            && self.created_at == other.created_at
            && self.is_favorite == other.is_favorite
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

// Most recent first.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.created_at.cmp(&self.created_at) {
            Ordering::Equal => other.id.cmp(&self.id),
            ord => ord,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    pub id: EntryId,

    pub kind: ContentKind,

    pub created_at: OffsetDateTime,

    pub is_favorite: bool,

    pub preview: String,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use bytes::Bytes;
    use time::OffsetDateTime;

    use super::{Entry, EntryId, SEARCHABLE_PREFIX_CHARS};
    use crate::{classify, ClipboardPayload, ContentKind, SearchQuery};

    fn text_entry(text: &str) -> Entry {
        let classified = classify(ClipboardPayload::text(text)).unwrap();
        Entry::new(EntryId::new(1), classified, OffsetDateTime::now_utc())
    }

    #[test]
    fn test_text_search_is_case_insensitive() {
        let entry = text_entry("Hello FooBar");
        assert!(entry.matches_query(&SearchQuery::new("foo")));
        assert!(entry.matches_query(&SearchQuery::new("  HELLO ")));
        assert!(!entry.matches_query(&SearchQuery::new("baz")));
        assert!(entry.matches_query(&SearchQuery::all()));
        assert!(entry.matches_query(&SearchQuery::new("   ")));
    }

    #[test]
    fn test_search_falls_back_to_full_text_beyond_prefix() {
        let mut text = "x".repeat(SEARCHABLE_PREFIX_CHARS + 100);
        text.push_str("NeedleAtTheEnd");
        let entry = text_entry(&text);
        assert!(entry.matches_query(&SearchQuery::new("needleattheend")));
        assert!(!entry.matches_query(&SearchQuery::new("missing")));
    }

    #[test]
    fn test_image_searchable_by_label_only() {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        bytes.extend_from_slice(b"cat picture");
        let classified = classify(ClipboardPayload::Image(Bytes::from(bytes))).unwrap();
        let entry = Entry::new(EntryId::new(2), classified, OffsetDateTime::now_utc());
        assert!(entry.matches_query(&SearchQuery::new("Image")));
        assert!(!entry.matches_query(&SearchQuery::new("cat")));
    }

    #[test]
    fn test_file_list_searchable_by_path() {
        let classified = classify(ClipboardPayload::FileList(vec![
            PathBuf::from("/home/user/Report.pdf"),
            PathBuf::from("/home/user/photo.png"),
        ]))
        .unwrap();
        let entry = Entry::new(EntryId::new(3), classified, OffsetDateTime::now_utc());
        assert!(entry.matches_query(&SearchQuery::new("report")));
        assert!(entry.matches_query(&SearchQuery::new("PHOTO")));
        assert!(!entry.matches_query(&SearchQuery::new("image")));
        assert_eq!(entry.summarize(None), "/home/user/Report.pdf (+1 more)");
    }

    #[test]
    fn test_summarize_truncates_and_escapes() {
        let entry = text_entry("line one\nline two\nline three");
        assert_eq!(entry.summarize(None), "line one\\nline two\\nline three");
        let summary = entry.summarize(Some(20));
        assert!(summary.ends_with("...(3 lines)"));
        assert!(summary.chars().count() <= 20);
    }

    #[test]
    fn test_restore_recomputes_fingerprint() {
        let original = text_entry("persist me");
        let restored = Entry::restore(
            original.id(),
            ContentKind::Text,
            &original.payload_bytes(),
            original.created_at(),
            true,
        )
        .unwrap();
        assert_eq!(restored.fingerprint(), original.fingerprint());
        assert!(restored.is_favorite());
        assert_eq!(restored.copy_back(), ClipboardPayload::text("persist me"));
    }

    #[cfg(unix)]
    #[test]
    fn test_restore_keeps_exact_file_list() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let paths = vec![
            PathBuf::from("/tmp/line\nbreak"),
            PathBuf::from(OsStr::from_bytes(b"/tmp/\xfe")),
        ];
        let classified = classify(ClipboardPayload::FileList(paths.clone())).unwrap();
        let original = Entry::new(EntryId::new(4), classified, OffsetDateTime::now_utc());
        let restored = Entry::restore(
            original.id(),
            ContentKind::FileList,
            &original.payload_bytes(),
            original.created_at(),
            false,
        )
        .unwrap();
        assert_eq!(restored.fingerprint(), original.fingerprint());
        assert_eq!(restored.copy_back(), ClipboardPayload::FileList(paths));
    }

    #[test]
    fn test_ordering_is_most_recent_first() {
        let older = text_entry("older");
        let mut newer = text_entry("newer");
        newer.touch(older.created_at() + time::Duration::seconds(1));
        let mut entries = vec![older.clone(), newer.clone()];
        entries.sort();
        assert_eq!(entries, vec![newer, older]);
    }
}
