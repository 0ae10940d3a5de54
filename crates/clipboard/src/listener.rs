use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Weak,
    time::Duration,
};

use parking_lot::Mutex;
use snafu::ResultExt;

use crate::{error, pubsub::Publisher, Error};

/// Polls the system clipboard and notifies subscribers whenever its content
/// digest changes. The thread exits once the owning clipboard is dropped.
pub fn spawn(
    arboard: Weak<Mutex<arboard::Clipboard>>,
    publisher: Weak<Publisher>,
    poll_interval: Duration,
) -> Result<(), Error> {
    let _join_handle = std::thread::Builder::new()
        .name("clipboard-listener".to_string())
        .spawn(move || {
            let mut last_digest = None;
            let mut primed = false;
            loop {
                std::thread::sleep(poll_interval);
                let (Some(arboard), Some(publisher)) = (arboard.upgrade(), publisher.upgrade())
                else {
                    tracing::debug!("Clipboard is dropped, stop polling");
                    break;
                };

                let digest = sample(&mut arboard.lock());
                if digest != last_digest {
                    last_digest = digest;
                    // the content present before the first poll is not a change
                    if primed && digest.is_some() {
                        publisher.notify_all();
                    }
                }
                primed = true;
            }
        })
        .context(error::SpawnListenerSnafu)?;
    Ok(())
}

fn sample(arboard: &mut arboard::Clipboard) -> Option<u64> {
    let mut hasher = DefaultHasher::new();
    if let Ok(text) = arboard.get_text() {
        0_u8.hash(&mut hasher);
        text.hash(&mut hasher);
        return Some(hasher.finish());
    }
    match arboard.get_image() {
        Ok(image) => {
            1_u8.hash(&mut hasher);
            image.width.hash(&mut hasher);
            image.height.hash(&mut hasher);
            image.bytes.hash(&mut hasher);
            Some(hasher.finish())
        }
        Err(arboard::Error::ContentNotAvailable) => None,
        Err(err) => {
            tracing::debug!("Could not sample clipboard, error: {err}");
            None
        }
    }
}
