use std::time::Duration;

use crate::{history::RepositoryOptions, paste::PasteOptions, ClipboardWatcherOptions};

#[derive(Clone, Debug)]
pub struct Config {
    /// Number of non-favorite entries kept, zero selects the default.
    pub max_history: usize,

    pub history: RepositoryOptions,

    pub watcher: ClipboardWatcherOptions,

    pub paste: PasteOptions,

    /// Interval the system clipboard is polled for changes.
    pub poll_interval: Duration,
}
