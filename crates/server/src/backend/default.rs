use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use cliptrail_base::ClipboardPayload;
use cliptrail_clipboard::{Clipboard, ClipboardLoad, ClipboardStore, ClipboardSubscribe};
use snafu::ResultExt;
use tokio::task;

use crate::backend::{error, ClipboardBackend, Error, Subscriber};

/// The system clipboard.
#[derive(Clone)]
pub struct DefaultClipboardBackend {
    clipboard: Arc<Clipboard>,
}

impl DefaultClipboardBackend {
    /// # Errors
    pub fn new(poll_interval: Duration) -> Result<Self, Error> {
        let clipboard = Clipboard::new(poll_interval).context(error::InitializeClipboardSnafu)?;
        Ok(Self { clipboard: Arc::new(clipboard) })
    }
}

#[async_trait]
impl ClipboardBackend for DefaultClipboardBackend {
    #[inline]
    async fn load(&self) -> Result<ClipboardPayload, Error> {
        let clipboard = self.clipboard.clone();
        task::spawn_blocking(move || clipboard.load().map_err(Error::from_load))
            .await
            .context(error::SpawnBlockingTaskSnafu)?
    }

    #[inline]
    async fn store(&self, payload: ClipboardPayload) -> Result<(), Error> {
        let clipboard = self.clipboard.clone();
        task::spawn_blocking(move || clipboard.store(payload))
            .await
            .context(error::SpawnBlockingTaskSnafu)?
            .context(error::StoreDataToClipboardSnafu)
    }

    #[inline]
    async fn clear(&self) -> Result<(), Error> {
        let clipboard = self.clipboard.clone();
        task::spawn_blocking(move || clipboard.clear())
            .await
            .context(error::SpawnBlockingTaskSnafu)?
            .context(error::ClearClipboardSnafu)
    }

    #[inline]
    fn subscribe(&self) -> Result<Subscriber, Error> {
        self.clipboard
            .subscribe()
            .map(|subscriber| Subscriber::from([subscriber]))
            .context(error::SubscribeClipboardSnafu)
    }
}
