use cliptrail_base::{ClipRejection, ContentKind, EntryId, Fingerprint};

/// Status feed of the capture pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HistoryEvent {
    Committed { id: EntryId, kind: ContentKind },

    Bumped { id: EntryId },

    Evicted { id: EntryId },

    FavoriteToggled { id: EntryId, is_favorite: bool },

    Removed { id: EntryId },

    Cleared { count: usize },

    EchoSuppressed { fingerprint: Fingerprint },

    SuppressionTimedOut { fingerprint: Fingerprint },

    CaptureRejected { reason: CaptureRejection },

    /// The entry stays in memory, writing it is retried on its next change.
    PersistenceFailed { id: EntryId, message: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CaptureRejection {
    /// The payload could not be classified.
    Unsupported { kind: ContentKind, message: String },

    /// The capture filter refused the content.
    Filtered { kind: ContentKind, rejection: ClipRejection },
}
