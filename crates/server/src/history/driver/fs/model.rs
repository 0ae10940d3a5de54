use cliptrail_base::{ClipEntry, ContentKind, EntryId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FileHeader {
    pub schema: u64,

    #[serde(with = "time::serde::iso8601")]
    pub last_update: OffsetDateTime,
}

impl FileHeader {
    pub const SCHEMA_VERSION: u64 = 1;

    pub fn now() -> Self {
        Self { schema: Self::SCHEMA_VERSION, last_update: OffsetDateTime::now_utc() }
    }
}

/// One entry in the `clips` file. Images keep only their fingerprint here,
/// the PNG bytes live in the `images` directory.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClipRecord {
    pub id: EntryId,

    pub kind: ContentKind,

    pub created_at: OffsetDateTime,

    pub is_favorite: bool,

    pub data: Vec<u8>,
}

impl From<&ClipEntry> for ClipRecord {
    fn from(entry: &ClipEntry) -> Self {
        let data = match entry.kind() {
            ContentKind::Image => entry.fingerprint().as_bytes().to_vec(),
            ContentKind::Text | ContentKind::FileList => entry.payload_bytes().into_owned(),
        };
        Self {
            id: entry.id(),
            kind: entry.kind(),
            created_at: entry.created_at(),
            is_favorite: entry.is_favorite(),
            data,
        }
    }
}
