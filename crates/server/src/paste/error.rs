use std::time::Duration;

use cliptrail_base::EntryId;
use snafu::Snafu;

use crate::{backend, paste::input, window, window::WindowId};

/// Failure of a paste-back, named after the step that failed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Clip {id} is not in the history"))]
    EntryNotFound { id: EntryId },

    #[snafu(display("No window to paste into was captured"))]
    NoPasteTarget,

    #[snafu(display("Capture pipeline is closed"))]
    PipelineClosed,

    #[snafu(display("Could not write clipboard, error: {source}"))]
    WriteClipboard { source: backend::Error },

    #[snafu(display("Could not write clipboard within {timeout:?}"))]
    WriteClipboardTimeout { timeout: Duration },

    #[snafu(display("Paste target {window} does not exist anymore"))]
    TargetWindowGone { window: WindowId },

    #[snafu(display("Could not restore focus, error: {source}"))]
    RestoreFocus { source: window::Error },

    #[snafu(display("Could not restore focus to {window} within {timeout:?}"))]
    RestoreFocusTimeout { window: WindowId, timeout: Duration },

    #[snafu(display("Could not simulate paste, error: {source}"))]
    SimulatePaste { source: input::Error },
}

impl Error {
    /// The clipboard was not changed.
    #[must_use]
    pub const fn is_clipboard_write_failure(&self) -> bool {
        matches!(self, Self::WriteClipboard { .. } | Self::WriteClipboardTimeout { .. })
    }
}
