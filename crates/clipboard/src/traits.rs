use cliptrail_base::ClipboardPayload;

use crate::Error;

pub trait Load {
    /// # Errors
    fn load(&self) -> Result<ClipboardPayload, Error>;

    fn is_empty(&self) -> bool { matches!(self.load(), Err(Error::Empty)) }
}

pub trait Store {
    /// # Errors
    fn store(&self, payload: ClipboardPayload) -> Result<(), Error>;

    /// # Errors
    fn clear(&self) -> Result<(), Error>;
}

pub trait Wait {
    /// Blocks until the clipboard content changes.
    ///
    /// # Errors
    fn wait(&self) -> Result<(), Error>;
}

pub trait Subscribe: Send + Sync {
    type Subscriber: Wait + Send;

    /// # Errors
    fn subscribe(&self) -> Result<Self::Subscriber, Error>;
}

pub trait LoadExt: Load {
    /// # Errors
    fn load_string(&self) -> Result<String, Error> {
        match self.load()? {
            ClipboardPayload::Text(bytes) => {
                String::from_utf8(bytes.to_vec()).map_err(|_| Error::Empty)
            }
            _ => Err(Error::Empty),
        }
    }
}

impl<C: Load + ?Sized> LoadExt for C {}

pub trait StoreExt: Store {
    /// # Errors
    fn store_string(&self, data: &str) -> Result<(), Error> {
        self.store(ClipboardPayload::text(data))
    }
}

impl<C: Store + ?Sized> StoreExt for C {}

pub trait LoadWait: Load + Subscribe {
    /// # Errors
    fn load_wait(&self) -> Result<ClipboardPayload, Error> {
        self.subscribe()?.wait()?;
        self.load()
    }
}

impl<C: Load + Subscribe + ?Sized> LoadWait for C {}
