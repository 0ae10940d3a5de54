use std::{collections::HashMap, future::Future, sync::Arc};

use cliptrail_base::{classify, ClipFilter, ClipboardPayload, EntryId, Fingerprint};
use parking_lot::RwLock;
use tokio::{
    sync::{broadcast, mpsc},
    time::Instant,
};

use crate::{
    clock::MonotonicClock,
    history::Repository,
    pipeline::{CaptureRejection, Command, HistoryEvent, Suppression},
    store::{Commit, HistoryStore},
};

/// Repository write that has not succeeded yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum PendingWrite {
    Insert,
    Update,
    Delete,
}

impl PendingWrite {
    // a row that was never inserted still needs an insert after an update
    const fn then(self, next: Self) -> Self {
        match (self, next) {
            (Self::Insert, Self::Update) => Self::Insert,
            (_, next) => next,
        }
    }
}

enum Wake {
    Command(Command),
    SuppressionExpired,
    Stop,
}

/// The single writer of the history: drains the command queue in order,
/// one command at a time.
pub struct Worker {
    pub(super) store: Arc<RwLock<HistoryStore>>,
    pub(super) repository: Box<dyn Repository>,
    pub(super) filter: ClipFilter,
    pub(super) command_receiver: mpsc::Receiver<Command>,
    pub(super) event_sender: broadcast::Sender<HistoryEvent>,
    pub(super) clock: MonotonicClock,
    pub(super) suppression: Option<Suppression>,
    pub(super) pending: HashMap<EntryId, PendingWrite>,
}

impl Worker {
    /// Runs until `shutdown` resolves or every pipeline handle is dropped.
    pub async fn serve<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);

        loop {
            let deadline = self.suppression.map(|suppression| suppression.deadline());
            let wake = tokio::select! {
                biased;
                () = &mut shutdown => Wake::Stop,
                () = sleep_until(deadline) => Wake::SuppressionExpired,
                command = self.command_receiver.recv() => command.map_or(Wake::Stop, Wake::Command),
            };

            match wake {
                Wake::Command(command) => self.handle(command).await,
                Wake::SuppressionExpired => self.expire_suppression(),
                Wake::Stop => break,
            }
        }

        self.flush_pending().await;
        tracing::info!("Capture pipeline is stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Capture { payload } => self.capture(payload).await,
            Command::ToggleFavorite { id, reply } => {
                let is_favorite = self.toggle_favorite(id).await;
                let _unused = reply.send(is_favorite);
            }
            Command::Remove { id, reply } => {
                let removed = self.remove(id).await;
                let _unused = reply.send(removed);
            }
            Command::Clear { reply } => {
                let count = self.clear().await;
                let _unused = reply.send(count);
            }
            Command::SetLimit { limit, reply } => {
                let limit = self.store.write().set_limit(limit);
                tracing::info!("History limit is set to {limit}");
                let _unused = reply.send(limit);
            }
            Command::BeginSuppression { fingerprint, timeout } => {
                tracing::debug!("Expect own write of {}", fingerprint.short());
                self.suppression = Some(Suppression::new(fingerprint, Instant::now() + timeout));
            }
            Command::EndSuppression { fingerprint } => {
                if self.suppression.is_some_and(|suppression| suppression.matches(&fingerprint)) {
                    tracing::debug!("Stop expecting own write of {}", fingerprint.short());
                    self.suppression = None;
                }
            }
        }
    }

    async fn capture(&mut self, payload: ClipboardPayload) {
        let kind = payload.kind();
        let classified = match classify(payload) {
            Ok(classified) => classified,
            Err(err) => {
                tracing::warn!("Drop clipboard content, error: {err}");
                self.emit(HistoryEvent::CaptureRejected {
                    reason: CaptureRejection::Unsupported { kind, message: err.to_string() },
                });
                return;
            }
        };

        if self.take_echo(&classified.fingerprint) {
            tracing::debug!("Drop echo of own write {}", classified.fingerprint.short());
            self.emit(HistoryEvent::EchoSuppressed { fingerprint: classified.fingerprint });
            return;
        }

        if let Some(rejection) = self.filter.filter_clip_content(&classified.content) {
            tracing::debug!("Drop {kind} content, {rejection}");
            self.emit(HistoryEvent::CaptureRejected {
                reason: CaptureRejection::Filtered { kind, rejection },
            });
            return;
        }

        let now = self.clock.now();
        let (commit, summary, evicted) = {
            let mut store = self.store.write();
            let commit = store.commit(classified, now);
            let summary = store.get(commit.id()).map(|entry| entry.summarize(Some(30)));
            (commit, summary.unwrap_or_default(), store.evict_overflow())
        };

        self.retry_pending_deletes().await;

        match commit {
            Commit::Inserted(id) => {
                tracing::info!("New clip {id}: {kind} [{summary}]");
                self.emit(HistoryEvent::Committed { id, kind });
                self.persist(id, PendingWrite::Insert).await;
            }
            Commit::Bumped(id) => {
                tracing::info!("Bump clip {id}: {kind} [{summary}]");
                self.emit(HistoryEvent::Bumped { id });
                self.persist(id, PendingWrite::Update).await;
            }
        }

        for entry in evicted {
            let id = entry.id();
            tracing::debug!("Evict clip {id}");
            self.emit(HistoryEvent::Evicted { id });
            self.persist(id, PendingWrite::Delete).await;
        }
    }

    async fn toggle_favorite(&mut self, id: EntryId) -> Option<bool> {
        let is_favorite = self.store.write().toggle_favorite(id)?;
        tracing::info!("Clip {id} is {}a favorite", if is_favorite { "" } else { "no longer " });
        self.emit(HistoryEvent::FavoriteToggled { id, is_favorite });
        self.persist(id, PendingWrite::Update).await;
        Some(is_favorite)
    }

    async fn remove(&mut self, id: EntryId) -> bool {
        let removed = self.store.write().remove(id).is_some();
        if removed {
            tracing::info!("Remove clip {id}");
            self.emit(HistoryEvent::Removed { id });
            self.persist(id, PendingWrite::Delete).await;
        }
        removed
    }

    async fn clear(&mut self) -> usize {
        let cleared = self.store.write().clear_non_favorites();
        let count = cleared.len();
        tracing::info!("Clear {count} clip(s) from history");
        for entry in cleared {
            self.persist(entry.id(), PendingWrite::Delete).await;
        }
        self.emit(HistoryEvent::Cleared { count });
        count
    }

    fn take_echo(&mut self, fingerprint: &Fingerprint) -> bool {
        let suppression = self.suppression;
        match suppression {
            Some(suppression) if suppression.is_expired(Instant::now()) => {
                self.expire_suppression();
                false
            }
            Some(suppression) if suppression.matches(fingerprint) => {
                self.suppression = None;
                true
            }
            _ => false,
        }
    }

    fn expire_suppression(&mut self) {
        if let Some(suppression) = self.suppression.take() {
            let fingerprint = suppression.fingerprint();
            tracing::debug!("Own write of {} was not observed in time", fingerprint.short());
            self.emit(HistoryEvent::SuppressionTimedOut { fingerprint });
        }
    }

    /// Writes the current state of entry `id`, folding in any write of the
    /// same entry that failed earlier.
    async fn persist(&mut self, id: EntryId, write: PendingWrite) {
        let write = self.pending.remove(&id).map_or(write, |previous| previous.then(write));
        let result = match write {
            PendingWrite::Insert | PendingWrite::Update => {
                let entry = self.store.read().get(id).cloned();
                let Some(entry) = entry else {
                    return;
                };
                if write == PendingWrite::Insert {
                    self.repository.insert(&entry).await
                } else {
                    self.repository.update(&entry).await
                }
            }
            PendingWrite::Delete => self.repository.delete(id).await,
        };

        if let Err(err) = result {
            tracing::warn!("Could not persist clip {id}, it will be retried, error: {err}");
            let _ = self.pending.insert(id, write);
            self.emit(HistoryEvent::PersistenceFailed { id, message: err.to_string() });
        }
    }

    // deleted entries never change again, their writes are retried with the
    // next capture instead
    async fn retry_pending_deletes(&mut self) {
        let ids = self
            .pending
            .iter()
            .filter(|(_, write)| **write == PendingWrite::Delete)
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        for id in ids {
            self.persist(id, PendingWrite::Delete).await;
        }
    }

    async fn flush_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return;
        }
        tracing::info!("Retry {} unpersisted write(s) before exit", pending.len());
        for (id, write) in pending {
            self.persist(id, write).await;
        }
    }

    fn emit(&self, event: HistoryEvent) {
        // nobody listening is fine
        let _unused = self.event_sender.send(event);
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::PendingWrite;

    #[test]
    fn test_pending_write_folding() {
        assert_eq!(PendingWrite::Insert.then(PendingWrite::Update), PendingWrite::Insert);
        assert_eq!(PendingWrite::Insert.then(PendingWrite::Delete), PendingWrite::Delete);
        assert_eq!(PendingWrite::Update.then(PendingWrite::Update), PendingWrite::Update);
        assert_eq!(PendingWrite::Update.then(PendingWrite::Delete), PendingWrite::Delete);
    }
}
