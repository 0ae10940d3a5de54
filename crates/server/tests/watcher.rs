use std::{sync::Arc, time::Duration};

use cliptrail_base::{ClipFilter, ClipboardPayload, SearchQuery};
use cliptrail_clipboard::ClipboardStore;
use cliptrail_server::{
    backend::LocalClipboardBackend,
    history::MemoryRepository,
    pipeline::{CapturePipeline, HistoryEvent},
    store::HistoryStore,
    watcher::ClipboardWatcher,
    ClipboardWatcherOptions,
};
use tokio::{sync::oneshot, time::timeout};

#[tokio::test]
async fn test_watcher_forwards_changes_unless_disabled() {
    let backend = Arc::new(LocalClipboardBackend::new());
    backend.clipboard().store(ClipboardPayload::text("already there")).unwrap();

    let (pipeline, pipeline_worker) = CapturePipeline::new(
        HistoryStore::default(),
        Box::new(MemoryRepository::new()),
        ClipFilter::new(),
    );
    let mut events = pipeline.subscribe();
    let (stop_pipeline, pipeline_stopped) = oneshot::channel::<()>();
    let pipeline_join = tokio::spawn(pipeline_worker.serve(async {
        let _unused = pipeline_stopped.await;
    }));

    let (watcher, watcher_worker) =
        ClipboardWatcher::new(backend.clone(), ClipboardWatcherOptions::default(), pipeline.clone());
    let (stop_watcher, watcher_stopped) = oneshot::channel::<()>();
    let watcher_join = tokio::spawn(watcher_worker.serve(async {
        let _unused = watcher_stopped.await;
    }));

    let event = timeout(Duration::from_secs(5), events.recv()).await.unwrap().unwrap();
    assert!(matches!(event, HistoryEvent::Committed { .. }));

    let toggle = watcher.get_toggle();
    toggle.disable();
    assert!(!watcher.is_watching());
    backend.clipboard().store(ClipboardPayload::text("while paused")).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    toggle.toggle();
    assert!(watcher.is_watching());
    backend.clipboard().store(ClipboardPayload::text("after resume")).unwrap();
    let event = timeout(Duration::from_secs(5), events.recv()).await.unwrap().unwrap();
    assert!(matches!(event, HistoryEvent::Committed { .. }));

    let texts = pipeline
        .view()
        .query(&SearchQuery::all())
        .iter()
        .map(|entry| entry.summarize(None))
        .collect::<Vec<_>>();
    assert_eq!(texts, ["after resume", "already there"]);

    let _unused = stop_watcher.send(());
    watcher_join.await.unwrap().unwrap();
    let _unused = stop_pipeline.send(());
    pipeline_join.await.unwrap();
}
