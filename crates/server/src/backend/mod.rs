mod default;
mod error;
mod local;
mod subscriber;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use cliptrail_base::ClipboardPayload;

pub use self::{
    default::DefaultClipboardBackend, error::Error, local::LocalClipboardBackend,
    subscriber::Subscriber,
};

/// # Errors
pub fn new_shared(poll_interval: Duration) -> Result<Arc<dyn ClipboardBackend>, Error> {
    Ok(Arc::new(DefaultClipboardBackend::new(poll_interval)?))
}

#[async_trait]
pub trait ClipboardBackend: Sync + Send {
    async fn load(&self) -> Result<ClipboardPayload, Error>;

    async fn store(&self, payload: ClipboardPayload) -> Result<(), Error>;

    async fn clear(&self) -> Result<(), Error>;

    /// # Errors
    fn subscribe(&self) -> Result<Subscriber, Error>;
}
