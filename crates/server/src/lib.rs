pub mod backend;
mod clock;
pub mod config;
mod error;
pub mod history;
pub mod paste;
pub mod pipeline;
pub mod store;
pub mod watcher;
pub mod window;

use std::{future::Future, pin::Pin, sync::Arc};

use futures::FutureExt;
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};
use snafu::ResultExt;

pub use self::{
    config::Config,
    error::{Error, Result},
    watcher::{ClipboardWatcherOptions, ClipboardWatcherToggle},
};
use self::{
    backend::ClipboardBackend,
    paste::{InputSimulator, PasteOptions, PasteOrchestrator},
    pipeline::{CapturePipeline, Worker as PipelineWorker},
    store::HistoryStore,
    watcher::{ClipboardWatcher, ClipboardWatcherWorker},
    window::{ForegroundTracker, WindowSystem},
};

/// Handles a front end uses to drive the running core.
///
/// The core has no access to the window system itself: the front end must
/// feed every focus change to `tracker` through
/// [`ForegroundTracker::observe`], otherwise no paste target is ever known.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn ClipboardBackend>,

    pub pipeline: CapturePipeline,

    pub watcher_toggle: ClipboardWatcherToggle,

    /// Fed by the front end, see above.
    pub tracker: ForegroundTracker,

    pub paste_options: PasteOptions,
}

impl Services {
    /// Builds a paste orchestrator on top of the platform window and input
    /// integrations.
    #[must_use]
    pub fn paste_orchestrator(
        &self,
        windows: Arc<dyn WindowSystem>,
        input: Arc<dyn InputSimulator>,
    ) -> PasteOrchestrator {
        PasteOrchestrator::new(
            self.backend.clone(),
            self.pipeline.clone(),
            self.tracker.clone(),
            windows,
            input,
            self.paste_options,
        )
    }
}

/// Runs the clipboard watcher and the capture pipeline until SIGINT or
/// SIGTERM. `on_ready` receives the [`Services`] once history is loaded.
///
/// # Errors
///
/// This function will return an error if the server fails to start.
pub async fn serve_with_shutdown<F>(
    Config { max_history, history, watcher: watcher_opts, paste, poll_interval }: Config,
    on_ready: F,
) -> Result<()>
where
    F: FnOnce(Services),
{
    let clipboard_backend =
        backend::new_shared(poll_interval).context(error::CreateClipboardBackendSnafu)?;
    let clip_filter =
        watcher_opts.generate_clip_filter().context(error::GenerateClipFilterSnafu)?;

    tracing::info!(
        "History path: `{path}`, driver: {kind:?}",
        path = history.path.display(),
        kind = history.kind
    );
    let mut repository = history::open(&history).await.context(error::OpenRepositorySnafu)?;

    tracing::info!("Initialize HistoryStore with limit {max_history}");
    let mut store = HistoryStore::with_limit(max_history);
    match pipeline::rehydrate(&mut store, repository.as_mut()).await {
        Ok(0) => {}
        Ok(clip_count) => tracing::info!("{clip_count} clip(s) loaded"),
        Err(err) => tracing::error!(
            "Could not load history, data might be corrupted, please remove `{path}`, error: \
             {err}",
            path = history.path.display()
        ),
    }

    let (capture_pipeline, pipeline_worker) = CapturePipeline::new(store, repository, clip_filter);
    let (clipboard_watcher, watcher_worker) =
        ClipboardWatcher::new(clipboard_backend.clone(), watcher_opts, capture_pipeline.clone());

    on_ready(Services {
        backend: clipboard_backend,
        pipeline: capture_pipeline,
        watcher_toggle: clipboard_watcher.get_toggle(),
        tracker: ForegroundTracker::for_current_process(),
        paste_options: paste,
    });

    let lifecycle_manager = LifecycleManager::<Error>::new();
    let _handle = lifecycle_manager
        .spawn("Capture pipeline", create_pipeline_future(pipeline_worker))
        .spawn("Clipboard watcher", create_watcher_future(watcher_worker));

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

fn create_pipeline_future(
    worker: PipelineWorker,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>> {
    move |shutdown_signal| {
        async move {
            worker.serve(shutdown_signal).await;
            ExitStatus::Success
        }
        .boxed()
    }
}

fn create_watcher_future(
    worker: ClipboardWatcherWorker,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>> {
    move |shutdown_signal| {
        async move {
            match worker.serve(shutdown_signal).await.context(error::WatchClipboardSnafu) {
                Ok(()) => {
                    tracing::info!("ClipboardWatcher is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::Failure(err),
            }
        }
        .boxed()
    }
}
