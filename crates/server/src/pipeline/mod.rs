//! Serialized ingestion of clipboard changes and history mutations.
//!
//! [`CapturePipeline`] is the cheap, clonable front of the pipeline. Every
//! call enqueues a [`Command`] on a bounded queue that the [`Worker`]
//! drains in order, so the history has exactly one writer.

mod command;
mod error;
mod event;
mod suppression;
mod worker;

use std::{collections::HashMap, sync::Arc, time::Duration};

use cliptrail_base::{ClipFilter, ClipboardPayload, EntryId, Fingerprint};
use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc, oneshot};

pub use self::{
    command::Command,
    error::Error,
    event::{CaptureRejection, HistoryEvent},
    suppression::Suppression,
    worker::Worker,
};
use crate::{
    clock::MonotonicClock,
    history::{self, Repository},
    store::{HistoryStore, HistoryView},
};

const COMMAND_QUEUE_CAPACITY: usize = 64;
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone, Debug)]
pub struct CapturePipeline {
    command_sender: mpsc::Sender<Command>,
    event_sender: broadcast::Sender<HistoryEvent>,
    view: HistoryView,
}

impl CapturePipeline {
    pub fn new(
        store: HistoryStore,
        repository: Box<dyn Repository>,
        filter: ClipFilter,
    ) -> (Self, Worker) {
        let (command_sender, command_receiver) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (event_sender, _event_receiver) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let clock = MonotonicClock::starting_after(store.newest_timestamp());
        let store = Arc::new(RwLock::new(store));

        let pipeline = Self {
            command_sender,
            event_sender: event_sender.clone(),
            view: HistoryView::new(store.clone()),
        };
        let worker = Worker {
            store,
            repository,
            filter,
            command_receiver,
            event_sender,
            clock,
            suppression: None,
            pending: HashMap::new(),
        };
        (pipeline, worker)
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> HistoryView { self.view.clone() }

    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> { self.event_sender.subscribe() }

    /// Enqueues a clipboard change, waiting while the queue is full.
    ///
    /// # Errors
    pub async fn capture(&self, payload: ClipboardPayload) -> Result<(), Error> {
        self.send(Command::Capture { payload }).await
    }

    /// Returns the new favorite state, `None` if there is no such entry.
    ///
    /// # Errors
    pub async fn toggle_favorite(&self, id: EntryId) -> Result<Option<bool>, Error> {
        self.request(|reply| Command::ToggleFavorite { id, reply }).await
    }

    /// # Errors
    pub async fn remove(&self, id: EntryId) -> Result<bool, Error> {
        self.request(|reply| Command::Remove { id, reply }).await
    }

    /// Removes every non-favorite entry and returns how many were removed.
    ///
    /// # Errors
    pub async fn clear(&self) -> Result<usize, Error> {
        self.request(|reply| Command::Clear { reply }).await
    }

    /// Returns the limit in effect, zero selects the default.
    ///
    /// # Errors
    pub async fn set_limit(&self, limit: usize) -> Result<usize, Error> {
        self.request(|reply| Command::SetLimit { limit, reply }).await
    }

    /// # Errors
    pub async fn begin_suppression(
        &self,
        fingerprint: Fingerprint,
        timeout: Duration,
    ) -> Result<(), Error> {
        self.send(Command::BeginSuppression { fingerprint, timeout }).await
    }

    /// # Errors
    pub async fn end_suppression(&self, fingerprint: Fingerprint) -> Result<(), Error> {
        self.send(Command::EndSuppression { fingerprint }).await
    }

    async fn send(&self, command: Command) -> Result<(), Error> {
        self.command_sender.send(command).await.map_err(|_| Error::PipelineClosed)
    }

    async fn request<T, F>(&self, command: F) -> Result<T, Error>
    where
        F: FnOnce(oneshot::Sender<T>) -> Command,
    {
        let (reply, response) = oneshot::channel();
        self.send(command(reply)).await?;
        response.await.map_err(|_| Error::PipelineClosed)
    }
}

/// Loads the persisted history into `store`.
///
/// Entries the store refuses, duplicates and overflow, are deleted from the
/// repository. Returns the number of entries kept.
///
/// # Errors
pub async fn rehydrate(
    store: &mut HistoryStore,
    repository: &mut dyn Repository,
) -> Result<usize, history::Error> {
    let entries = repository.list_all().await?;
    let dropped = store.import(entries);
    for entry in dropped {
        let id = entry.id();
        tracing::debug!("Drop persisted clip {id}");
        if let Err(err) = repository.delete(id).await {
            tracing::warn!("Could not delete persisted clip {id}, error: {err}");
        }
    }
    Ok(store.len())
}
