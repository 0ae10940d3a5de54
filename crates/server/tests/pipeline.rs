use std::{
    io,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use cliptrail_base::{
    classify, ClipContent, ClipEntry, ClipFilter, ClipboardPayload, ContentKind, EntryId,
    SearchQuery,
};
use cliptrail_server::{
    history::{self, MemoryRepository, Repository},
    pipeline::{self, CapturePipeline, HistoryEvent},
    store::HistoryStore,
    ClipboardWatcherOptions,
};
use time::macros::datetime;
use tokio::{
    sync::{broadcast, oneshot},
    task::JoinHandle,
};

/// Memory repository whose writes fail while `failing` is set.
#[derive(Clone, Default)]
struct FlakyRepository {
    inner: MemoryRepository,
    failing: Arc<AtomicBool>,
}

impl FlakyRepository {
    fn set_failing(&self, failing: bool) { self.failing.store(failing, Ordering::SeqCst); }

    fn check(&self) -> Result<(), history::Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(history::Error::WriteFile {
                source: io::Error::new(io::ErrorKind::Other, "disk is full"),
                file_path: PathBuf::from("/flaky"),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Repository for FlakyRepository {
    async fn insert(&mut self, entry: &ClipEntry) -> Result<(), history::Error> {
        self.check()?;
        self.inner.insert(entry).await
    }

    async fn update(&mut self, entry: &ClipEntry) -> Result<(), history::Error> {
        self.check()?;
        self.inner.update(entry).await
    }

    async fn delete(&mut self, id: EntryId) -> Result<(), history::Error> {
        self.check()?;
        self.inner.delete(id).await
    }

    async fn list_all(&mut self) -> Result<Vec<ClipEntry>, history::Error> {
        self.inner.list_all().await
    }
}

struct Running {
    pipeline: CapturePipeline,
    events: broadcast::Receiver<HistoryEvent>,
    stop: oneshot::Sender<()>,
    worker: JoinHandle<()>,
}

impl Running {
    fn start<R>(store: HistoryStore, repository: R, filter: ClipFilter) -> Self
    where
        R: Repository + 'static,
    {
        let (pipeline, worker) = CapturePipeline::new(store, Box::new(repository), filter);
        let events = pipeline.subscribe();
        let (stop, stopped) = oneshot::channel::<()>();
        let worker = tokio::spawn(worker.serve(async {
            let _unused = stopped.await;
        }));
        Self { pipeline, events, stop, worker }
    }

    async fn capture(&self, text: &str) {
        self.pipeline.capture(ClipboardPayload::text(text)).await.unwrap();
        self.settle().await;
    }

    // commands are handled in order, a reply means everything before it is done
    async fn settle(&self) {
        assert_eq!(self.pipeline.toggle_favorite(EntryId::new(u64::MAX)).await.unwrap(), None);
    }

    fn texts(&self) -> Vec<String> {
        self.pipeline
            .view()
            .query(&SearchQuery::all())
            .into_iter()
            .map(|entry| match entry.content() {
                ClipContent::Text(text) => text.clone(),
                other => panic!("unexpected content {other:?}"),
            })
            .collect()
    }

    fn id_of(&self, text: &str) -> EntryId {
        self.pipeline.view().query(&SearchQuery::from(text))[0].id()
    }

    fn drain_events(&mut self) -> Vec<HistoryEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    async fn stop(self) {
        let _unused = self.stop.send(());
        self.worker.await.unwrap();
    }
}

fn restored(id: u64, text: &str, minute: u8, is_favorite: bool) -> ClipEntry {
    let at = datetime!(2024-01-01 0:00 UTC) + time::Duration::minutes(minute.into());
    ClipEntry::restore(EntryId::new(id), ContentKind::Text, text.as_bytes(), at, is_favorite)
        .unwrap()
}

#[tokio::test]
async fn test_bounded_history_keeps_favorites() {
    let repository = MemoryRepository::new();
    let running = Running::start(HistoryStore::with_limit(3), repository.clone(), ClipFilter::new());

    for text in ["a", "b", "c", "d"] {
        running.capture(text).await;
    }
    assert_eq!(running.texts(), ["d", "c", "b"]);

    let b = running.id_of("b");
    assert_eq!(running.pipeline.toggle_favorite(b).await.unwrap(), Some(true));

    running.capture("e").await;
    assert_eq!(running.texts(), ["e", "d", "b"]);

    let persisted = repository.snapshot();
    assert_eq!(persisted, running.pipeline.view().query(&SearchQuery::all()));
    assert!(persisted.iter().any(|entry| entry.id() == b && entry.is_favorite()));

    running.stop().await;
}

#[tokio::test]
async fn test_recapture_bumps_instead_of_duplicating() {
    let mut running =
        Running::start(HistoryStore::default(), MemoryRepository::new(), ClipFilter::new());

    running.capture("A").await;
    running.capture("B").await;
    let a = running.id_of("A");
    running.capture("A").await;
    running.capture("A").await;

    assert_eq!(running.texts(), ["A", "B"]);
    assert_eq!(running.id_of("A"), a);
    let bumps = running
        .drain_events()
        .into_iter()
        .filter(|event| *event == HistoryEvent::Bumped { id: a })
        .count();
    assert_eq!(bumps, 2);

    running.stop().await;
}

#[tokio::test]
async fn test_search_and_mutations() {
    let running =
        Running::start(HistoryStore::default(), MemoryRepository::new(), ClipFilter::new());

    let long = format!("{}needle", "x".repeat(5000));
    running.capture("Hello World").await;
    running.capture(&long).await;
    running.capture("goodbye").await;

    let view = running.pipeline.view();
    assert_eq!(view.query(&SearchQuery::from("WORLD")).len(), 1);
    assert_eq!(view.query(&SearchQuery::from("needle")).len(), 1);
    assert_eq!(view.query(&SearchQuery::from("  ")).len(), 3);

    let hello = running.id_of("hello");
    assert!(running.pipeline.remove(hello).await.unwrap());
    assert!(!running.pipeline.remove(hello).await.unwrap());

    let goodbye = running.id_of("goodbye");
    assert_eq!(running.pipeline.toggle_favorite(goodbye).await.unwrap(), Some(true));
    assert_eq!(running.pipeline.clear().await.unwrap(), 1);
    assert_eq!(running.texts(), ["goodbye"]);

    assert_eq!(running.pipeline.set_limit(0).await.unwrap(), cliptrail_base::DEFAULT_MAX_HISTORY);
    assert_eq!(view.limit(), cliptrail_base::DEFAULT_MAX_HISTORY);

    running.stop().await;
}

#[tokio::test]
async fn test_filtered_capture_is_reported() {
    let opts = ClipboardWatcherOptions {
        denied_text_regex_patterns: ["^password:".to_string()].into_iter().collect(),
        ..ClipboardWatcherOptions::default()
    };
    let mut running = Running::start(
        HistoryStore::default(),
        MemoryRepository::new(),
        opts.generate_clip_filter().unwrap(),
    );

    running.capture("password: hunter2").await;
    running.pipeline.capture(ClipboardPayload::Image(bytes::Bytes::from_static(b"GIF89a"))).await.unwrap();
    running.settle().await;

    assert!(running.pipeline.view().is_empty());
    let rejections = running
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, HistoryEvent::CaptureRejected { .. }))
        .count();
    assert_eq!(rejections, 2);

    running.stop().await;
}

#[tokio::test]
async fn test_persistence_failure_is_retried() {
    let repository = FlakyRepository::default();
    let mut running =
        Running::start(HistoryStore::with_limit(1), repository.clone(), ClipFilter::new());

    running.capture("first").await;
    let first = running.id_of("first");

    repository.set_failing(true);
    running.capture("second").await;
    let second = running.id_of("second");
    assert_eq!(running.texts(), ["second"]);
    assert!(running
        .drain_events()
        .iter()
        .any(|event| matches!(event, HistoryEvent::PersistenceFailed { id, .. } if *id == second)));
    assert!(repository.inner.contains(first));
    assert!(!repository.inner.contains(second));

    // the next change of the entry writes it
    repository.set_failing(false);
    assert_eq!(running.pipeline.toggle_favorite(second).await.unwrap(), Some(true));
    assert!(repository.inner.snapshot().iter().any(|entry| entry.id() == second && entry.is_favorite()));

    // a failed delete is retried with the next capture
    assert!(repository.inner.contains(first));
    running.capture("third").await;
    assert!(!repository.inner.contains(first));
    assert!(repository.inner.contains(second));

    running.stop().await;
}

#[tokio::test]
async fn test_pending_writes_are_flushed_on_shutdown() {
    let repository = FlakyRepository::default();
    let running = Running::start(HistoryStore::default(), repository.clone(), ClipFilter::new());

    repository.set_failing(true);
    running.capture("unsaved").await;
    let id = running.id_of("unsaved");
    assert!(!repository.inner.contains(id));

    repository.set_failing(false);
    running.stop().await;
    assert!(repository.inner.contains(id));
}

#[tokio::test]
async fn test_echo_of_own_write_is_suppressed_once() {
    let mut running =
        Running::start(HistoryStore::default(), MemoryRepository::new(), ClipFilter::new());
    let fingerprint = classify(ClipboardPayload::text("mine")).unwrap().fingerprint;

    running.pipeline.begin_suppression(fingerprint, Duration::from_secs(60)).await.unwrap();
    running.capture("someone else").await;
    running.capture("mine").await;
    assert_eq!(running.texts(), ["someone else"]);
    assert!(running.drain_events().contains(&HistoryEvent::EchoSuppressed { fingerprint }));

    running.capture("mine").await;
    assert_eq!(running.texts(), ["mine", "someone else"]);

    running.stop().await;
}

#[tokio::test]
async fn test_end_suppression_only_for_matching_fingerprint() {
    let running =
        Running::start(HistoryStore::default(), MemoryRepository::new(), ClipFilter::new());
    let mine = classify(ClipboardPayload::text("mine")).unwrap().fingerprint;
    let other = classify(ClipboardPayload::text("other")).unwrap().fingerprint;

    running.pipeline.begin_suppression(mine, Duration::from_secs(60)).await.unwrap();
    running.pipeline.end_suppression(other).await.unwrap();
    running.capture("mine").await;
    assert!(running.texts().is_empty());

    running.pipeline.begin_suppression(mine, Duration::from_secs(60)).await.unwrap();
    running.pipeline.end_suppression(mine).await.unwrap();
    running.capture("mine").await;
    assert_eq!(running.texts(), ["mine"]);

    running.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_suppression_times_out() {
    let mut running =
        Running::start(HistoryStore::default(), MemoryRepository::new(), ClipFilter::new());
    let fingerprint = classify(ClipboardPayload::text("late")).unwrap().fingerprint;

    running.pipeline.begin_suppression(fingerprint, Duration::from_secs(1)).await.unwrap();
    loop {
        if running.events.recv().await.unwrap() == (HistoryEvent::SuppressionTimedOut { fingerprint })
        {
            break;
        }
    }

    running.capture("late").await;
    assert_eq!(running.texts(), ["late"]);

    running.stop().await;
}

#[tokio::test]
async fn test_rehydrate_restores_order_favorites_and_ids() {
    let mut repository = MemoryRepository::with_entries([
        restored(1, "a", 0, false),
        restored(2, "b", 1, true),
        restored(3, "c", 2, false),
        restored(4, "d", 3, false),
        // same content as `d`, the newer copy wins
        restored(5, "d", 4, false),
    ]);

    let mut store = HistoryStore::with_limit(2);
    let kept = pipeline::rehydrate(&mut store, &mut repository).await.unwrap();
    assert_eq!(kept, 3);
    assert!(!repository.contains(EntryId::new(1)));
    assert!(!repository.contains(EntryId::new(4)));

    let running = Running::start(store, repository.clone(), ClipFilter::new());
    assert_eq!(running.texts(), ["d", "c", "b"]);
    assert!(running.pipeline.view().get(EntryId::new(2)).unwrap().is_favorite());

    running.capture("e").await;
    assert_eq!(running.texts(), ["e", "d", "b"]);
    let e = running.pipeline.view().get(running.id_of("e")).unwrap();
    assert_eq!(e.id(), EntryId::new(6));
    assert!(e.created_at() > datetime!(2024-01-01 0:04 UTC));
    assert!(!repository.contains(EntryId::new(3)));

    running.stop().await;
}
