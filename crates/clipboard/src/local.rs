use std::sync::{Arc, RwLock};

use cliptrail_base::ClipboardPayload;

use crate::{
    pubsub::{self, Publisher, Subscriber},
    ClipboardLoad, ClipboardStore, ClipboardSubscribe, Error,
};

/// In-process clipboard. Every successful `store` notifies subscribers, the
/// same way a system clipboard reports the manager's own writes.
#[derive(Clone, Debug)]
pub struct Clipboard {
    data: Arc<RwLock<Option<ClipboardPayload>>>,
    publisher: Arc<Publisher>,
    subscriber: Subscriber,
}

impl Default for Clipboard {
    fn default() -> Self {
        let (publisher, subscriber) = pubsub::new();
        let data = Arc::default();
        Self { publisher: Arc::new(publisher), subscriber, data }
    }
}

impl Clipboard {
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[inline]
    #[must_use]
    pub fn with_payload(payload: ClipboardPayload) -> Self {
        let data = Arc::new(RwLock::new(Some(payload)));
        let (publisher, subscriber) = pubsub::new();
        Self { data, publisher: Arc::new(publisher), subscriber }
    }
}

impl ClipboardSubscribe for Clipboard {
    type Subscriber = Subscriber;

    fn subscribe(&self) -> Result<Subscriber, Error> { Ok(self.subscriber.clone()) }
}

impl ClipboardLoad for Clipboard {
    fn load(&self) -> Result<ClipboardPayload, Error> {
        self.data.read().map_or_else(
            |_| Err(Error::PrimitivePoisoned),
            |data| data.as_ref().map_or_else(|| Err(Error::Empty), |data| Ok(data.clone())),
        )
    }
}

impl ClipboardStore for Clipboard {
    #[inline]
    fn store(&self, payload: ClipboardPayload) -> Result<(), Error> {
        match self.data.write() {
            Ok(mut data) => {
                *data = Some(payload);
                drop(data);
                self.publisher.notify_all();
                Ok(())
            }
            Err(_err) => Err(Error::PrimitivePoisoned),
        }
    }

    fn clear(&self) -> Result<(), Error> {
        match self.data.write() {
            Ok(mut data) => {
                *data = None;
                Ok(())
            }
            Err(_err) => Err(Error::PrimitivePoisoned),
        }
    }
}
