//! Watches the system clipboard and forwards every change to the capture
//! pipeline.

mod error;
mod options;
mod toggle;

use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

pub use self::{
    error::Error,
    options::{Error as ClipboardWatcherOptionsError, Options as ClipboardWatcherOptions},
    toggle::Toggle as ClipboardWatcherToggle,
    Worker as ClipboardWatcherWorker,
};
use crate::{
    backend::{ClipboardBackend, Error as BackendError},
    pipeline::CapturePipeline,
};

#[derive(Clone, Debug)]
pub struct ClipboardWatcher {
    is_watching: Arc<AtomicBool>,
}

impl ClipboardWatcher {
    pub fn new(
        backend: Arc<dyn ClipboardBackend>,
        opts: ClipboardWatcherOptions,
        pipeline: CapturePipeline,
    ) -> (Self, ClipboardWatcherWorker) {
        let is_watching = Arc::new(AtomicBool::new(true));
        let watcher = Self { is_watching: is_watching.clone() };
        let worker = ClipboardWatcherWorker { backend, pipeline, is_watching, opts };
        (watcher, worker)
    }

    #[inline]
    #[must_use]
    pub fn get_toggle(&self) -> ClipboardWatcherToggle {
        ClipboardWatcherToggle::new(self.is_watching.clone())
    }

    #[inline]
    #[must_use]
    pub fn is_watching(&self) -> bool { self.is_watching.load(Ordering::Acquire) }
}

pub struct Worker {
    backend: Arc<dyn ClipboardBackend>,
    pipeline: CapturePipeline,
    is_watching: Arc<AtomicBool>,
    opts: ClipboardWatcherOptions,
}

impl Worker {
    /// Runs until `shutdown_signal` resolves.
    ///
    /// # Errors
    /// Fails when the clipboard subscription or the capture pipeline closes.
    #[allow(clippy::redundant_pub_crate)]
    pub async fn serve<F>(self, shutdown_signal: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send,
    {
        let Self { backend, pipeline, is_watching, opts: ClipboardWatcherOptions { load_current, .. } } =
            self;
        let mut subscriber = backend.subscribe()?;
        tokio::pin!(shutdown_signal);

        if load_current {
            forward(backend.as_ref(), &pipeline).await?;
        }

        loop {
            let maybe_event = tokio::select! {
                event = subscriber.next() => event,
                () = &mut shutdown_signal => {
                    tracing::info!("ClipboardWatcher is stopped");
                    return Ok(());
                }
            };
            if maybe_event.is_none() {
                return Err(Error::SubscriberClosed);
            }
            if is_watching.load(Ordering::Acquire) {
                forward(backend.as_ref(), &pipeline).await?;
            }
        }
    }
}

/// Loads the clipboard and hands it to the pipeline.
///
/// Repeated content is left to the pipeline: it bumps the entry or drops the
/// echo of an own write.
async fn forward(backend: &dyn ClipboardBackend, pipeline: &CapturePipeline) -> Result<(), Error> {
    match backend.load().await {
        Ok(payload) => pipeline.capture(payload).await.map_err(|_| {
            tracing::info!("Capture pipeline is closed");
            Error::PipelineClosed
        }),
        Err(BackendError::EmptyClipboard) => Ok(()),
        Err(error) => {
            tracing::error!("Failed to load clipboard, error: {error}");
            Ok(())
        }
    }
}
