use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not spawn tokio task, error: {source}"))]
    SpawnBlockingTask { source: tokio::task::JoinError },

    #[snafu(display("Clipboard is empty"))]
    EmptyClipboard,

    #[snafu(display("Could not initialize clipboard, error: {source}"))]
    InitializeClipboard { source: cliptrail_clipboard::Error },

    #[snafu(display("Could not clear clipboard, error: {source}"))]
    ClearClipboard { source: cliptrail_clipboard::Error },

    #[snafu(display("Could not store data to clipboard, error: {source}"))]
    StoreDataToClipboard { source: cliptrail_clipboard::Error },

    #[snafu(display("Could not load data from clipboard, error: {source}"))]
    LoadDataFromClipboard { source: cliptrail_clipboard::Error },

    #[snafu(display("Could not subscribe clipboard, error: {source}"))]
    SubscribeClipboard { source: cliptrail_clipboard::Error },
}

impl Error {
    pub(crate) fn from_load(source: cliptrail_clipboard::Error) -> Self {
        match source {
            cliptrail_clipboard::Error::Empty => Self::EmptyClipboard,
            source => Self::LoadDataFromClipboard { source },
        }
    }
}
