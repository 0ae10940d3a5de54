use async_trait::async_trait;
use cliptrail_base::ClipboardPayload;
use cliptrail_clipboard::{ClipboardLoad, ClipboardStore, ClipboardSubscribe, LocalClipboard};
use snafu::ResultExt;
use tokio::task;

use crate::backend::{error, ClipboardBackend, Error, Subscriber};

/// In-process clipboard, every write is reported back to subscribers like a
/// system clipboard reports the manager's own writes.
#[derive(Clone, Debug, Default)]
pub struct LocalClipboardBackend(LocalClipboard);

impl LocalClipboardBackend {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Access for tests playing the part of other applications.
    #[inline]
    #[must_use]
    pub const fn clipboard(&self) -> &LocalClipboard { &self.0 }
}

#[async_trait]
impl ClipboardBackend for LocalClipboardBackend {
    #[inline]
    async fn load(&self) -> Result<ClipboardPayload, Error> {
        let clipboard = self.0.clone();
        task::spawn_blocking(move || clipboard.load().map_err(Error::from_load))
            .await
            .context(error::SpawnBlockingTaskSnafu)?
    }

    #[inline]
    async fn store(&self, payload: ClipboardPayload) -> Result<(), Error> {
        let clipboard = self.0.clone();
        task::spawn_blocking(move || clipboard.store(payload))
            .await
            .context(error::SpawnBlockingTaskSnafu)?
            .context(error::StoreDataToClipboardSnafu)
    }

    #[inline]
    async fn clear(&self) -> Result<(), Error> {
        let clipboard = self.0.clone();
        task::spawn_blocking(move || clipboard.clear())
            .await
            .context(error::SpawnBlockingTaskSnafu)?
            .context(error::ClearClipboardSnafu)
    }

    #[inline]
    fn subscribe(&self) -> Result<Subscriber, Error> {
        self.0
            .subscribe()
            .map(|subscriber| Subscriber::from([subscriber]))
            .context(error::SubscribeClipboardSnafu)
    }
}
