mod default;
mod error;
mod listener;
mod local;
mod pubsub;
mod traits;

pub use cliptrail_base::{ClipboardPayload, ContentKind};

pub use self::{
    default::Clipboard,
    error::Error,
    local::Clipboard as LocalClipboard,
    pubsub::Subscriber,
    traits::{
        Load as ClipboardLoad, LoadExt as ClipboardLoadExt, LoadWait as ClipboardLoadWait,
        Store as ClipboardStore, StoreExt as ClipboardStoreExt, Subscribe as ClipboardSubscribe,
        Wait as ClipboardWait,
    },
};
