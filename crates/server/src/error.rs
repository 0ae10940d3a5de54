use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not create clipboard backend, error: {source}"))]
    CreateClipboardBackend { source: crate::backend::Error },

    #[snafu(display("Could not open history repository, error: {source}"))]
    OpenRepository { source: crate::history::Error },

    #[snafu(display("Could not generate clip filter, error: {source}"))]
    GenerateClipFilter { source: crate::watcher::ClipboardWatcherOptionsError },

    #[snafu(display("ClipboardWatcher stopped unexpectedly, error: {source}"))]
    WatchClipboard { source: crate::watcher::Error },
}
