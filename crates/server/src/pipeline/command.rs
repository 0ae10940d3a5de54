use std::time::Duration;

use cliptrail_base::{ClipboardPayload, EntryId, Fingerprint};
use tokio::sync::oneshot;

/// Everything that mutates the history travels through the pipeline queue
/// in this form.
#[derive(Debug)]
pub enum Command {
    Capture { payload: ClipboardPayload },

    ToggleFavorite { id: EntryId, reply: oneshot::Sender<Option<bool>> },

    Remove { id: EntryId, reply: oneshot::Sender<bool> },

    /// Removes every non-favorite entry.
    Clear { reply: oneshot::Sender<usize> },

    SetLimit { limit: usize, reply: oneshot::Sender<usize> },

    /// The next capture with this fingerprint is the manager's own write.
    BeginSuppression { fingerprint: Fingerprint, timeout: Duration },

    EndSuppression { fingerprint: Fingerprint },
}
