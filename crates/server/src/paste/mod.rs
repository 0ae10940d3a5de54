//! Paste-back of history entries into the window the user came from.

mod error;
mod input;

use std::{sync::Arc, time::Duration};

use cliptrail_base::{ClipEntry, EntryId, Fingerprint};
use parking_lot::Mutex;
use snafu::OptionExt;
use tokio::time::timeout;

pub use self::{
    error::Error,
    input::{Error as InputError, InputSimulator},
};
use crate::{
    backend::ClipboardBackend,
    pipeline::CapturePipeline,
    window::{self, ForegroundTracker, WindowId, WindowSystem},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PasteOptions {
    pub write_timeout: Duration,

    pub focus_timeout: Duration,

    /// How long the echo of the clipboard write is waited for.
    pub suppression_timeout: Duration,

    /// Pause between restoring focus and sending the keystroke.
    pub settle_delay: Duration,
}

impl Default for PasteOptions {
    fn default() -> Self {
        Self {
            write_timeout: Duration::from_millis(500),
            focus_timeout: Duration::from_millis(500),
            suppression_timeout: Duration::from_secs(1),
            settle_delay: Duration::from_millis(50),
        }
    }
}

pub struct PasteOrchestrator {
    backend: Arc<dyn ClipboardBackend>,
    pipeline: CapturePipeline,
    tracker: ForegroundTracker,
    windows: Arc<dyn WindowSystem>,
    input: Arc<dyn InputSimulator>,
    options: PasteOptions,
    target: Mutex<Option<WindowId>>,
}

impl PasteOrchestrator {
    pub fn new(
        backend: Arc<dyn ClipboardBackend>,
        pipeline: CapturePipeline,
        tracker: ForegroundTracker,
        windows: Arc<dyn WindowSystem>,
        input: Arc<dyn InputSimulator>,
        options: PasteOptions,
    ) -> Self {
        Self { backend, pipeline, tracker, windows, input, options, target: Mutex::new(None) }
    }

    /// Remembers the window to paste into. Called when the history view
    /// opens, before the view itself takes focus.
    pub fn capture_target(&self) -> Option<WindowId> {
        let target = self.tracker.last_external();
        *self.target.lock() = target;
        if let Some(window) = target {
            tracing::debug!("Paste target is window {window}");
        }
        target
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<WindowId> { *self.target.lock() }

    /// Puts entry `id` back on the clipboard and pastes it into the captured
    /// target window.
    ///
    /// When focus cannot be restored the clipboard keeps the entry, the user
    /// can still paste it by hand.
    ///
    /// # Errors
    pub async fn paste(&self, id: EntryId) -> Result<(), Error> {
        let window = self.target().context(error::NoPasteTargetSnafu)?;
        let entry = self.lookup(id)?;

        self.reinject(&entry).await?;
        self.restore_focus(window).await?;
        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }
        self.input.send_paste().await.context(error::SimulatePasteSnafu)?;

        tracing::info!("Pasted clip {id} into window {window}");
        Ok(())
    }

    /// Puts entry `id` back on the clipboard without pasting it.
    ///
    /// # Errors
    pub async fn copy(&self, id: EntryId) -> Result<(), Error> {
        let entry = self.lookup(id)?;
        self.reinject(&entry).await?;
        tracing::info!("Copied clip {id} to clipboard");
        Ok(())
    }

    fn lookup(&self, id: EntryId) -> Result<ClipEntry, Error> {
        self.pipeline.view().get(id).context(error::EntryNotFoundSnafu { id })
    }

    async fn reinject(&self, entry: &ClipEntry) -> Result<(), Error> {
        let fingerprint = entry.fingerprint();
        self.pipeline
            .begin_suppression(fingerprint, self.options.suppression_timeout)
            .await
            .map_err(|_| Error::PipelineClosed)?;

        let write_timeout = self.options.write_timeout;
        match timeout(write_timeout, self.backend.store(entry.copy_back())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => {
                self.abort_suppression(fingerprint).await;
                Err(Error::WriteClipboard { source })
            }
            Err(_) => {
                // the write may still land, its echo is dropped until the
                // suppression deadline passes
                tracing::debug!("Clipboard write of {} is late", fingerprint.short());
                Err(Error::WriteClipboardTimeout { timeout: write_timeout })
            }
        }
    }

    async fn abort_suppression(&self, fingerprint: Fingerprint) {
        if let Err(err) = self.pipeline.end_suppression(fingerprint).await {
            tracing::warn!("Could not end echo suppression, error: {err}");
        }
    }

    async fn restore_focus(&self, window: WindowId) -> Result<(), Error> {
        let focus_timeout = self.options.focus_timeout;
        let activate = async {
            if !self.windows.is_alive(window).await {
                return Err(window::Error::WindowGone { window });
            }
            self.windows.activate(window).await
        };

        match timeout(focus_timeout, activate).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(window::Error::WindowGone { window })) => {
                self.tracker.forget(window);
                let mut target = self.target.lock();
                if *target == Some(window) {
                    *target = None;
                }
                Err(Error::TargetWindowGone { window })
            }
            Ok(Err(source)) => Err(Error::RestoreFocus { source }),
            Err(_) => Err(Error::RestoreFocusTimeout { window, timeout: focus_timeout }),
        }
    }
}
