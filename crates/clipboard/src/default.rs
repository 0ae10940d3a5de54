use std::{borrow::Cow, sync::Arc, time::Duration};

use bytes::Bytes;
use cliptrail_base::ClipboardPayload;
use image::ImageEncoder as _;
use parking_lot::Mutex;
use snafu::ResultExt;

use crate::{
    error, listener,
    pubsub::{self, Publisher, Subscriber},
    ClipboardLoad, ClipboardStore, ClipboardSubscribe, Error,
};

/// System clipboard backed by `arboard`.
///
/// One `arboard::Clipboard` is kept alive for the lifetime of this value so
/// that content written by `store` stays owned by this process on platforms
/// where the clipboard is served by its owner.
#[derive(Clone)]
pub struct Clipboard {
    arboard: Arc<Mutex<arboard::Clipboard>>,
    _publisher: Arc<Publisher>,
    subscriber: Subscriber,
}

impl Clipboard {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

    /// # Errors
    pub fn new(poll_interval: Duration) -> Result<Self, Error> {
        let arboard = Arc::new(Mutex::new(arboard::Clipboard::new()?));
        let (publisher, subscriber) = pubsub::new();
        let publisher = Arc::new(publisher);
        listener::spawn(Arc::downgrade(&arboard), Arc::downgrade(&publisher), poll_interval)?;
        Ok(Self { arboard, _publisher: publisher, subscriber })
    }
}

impl ClipboardSubscribe for Clipboard {
    type Subscriber = Subscriber;

    fn subscribe(&self) -> Result<Self::Subscriber, Error> { Ok(self.subscriber.clone()) }
}

impl ClipboardLoad for Clipboard {
    fn load(&self) -> Result<ClipboardPayload, Error> {
        let mut arboard = self.arboard.lock();
        match arboard.get_text() {
            Ok(text) => return Ok(ClipboardPayload::text(text)),
            Err(arboard::Error::ContentNotAvailable) => {}
            Err(err) => return Err(Error::from(err)),
        }

        let image = arboard.get_image()?;
        drop(arboard);
        encode_png(&image).map(|png| ClipboardPayload::Image(Bytes::from(png)))
    }
}

impl ClipboardStore for Clipboard {
    fn store(&self, payload: ClipboardPayload) -> Result<(), Error> {
        match payload {
            ClipboardPayload::Text(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                self.arboard.lock().set_text(text)?;
            }
            ClipboardPayload::Image(png) => {
                let image = decode_png(&png)?;
                self.arboard.lock().set_image(image)?;
            }
            payload @ ClipboardPayload::FileList(_) => {
                return Err(Error::UnsupportedContent { kind: payload.kind() });
            }
        }
        // the listener reports the change, as it would for any other writer
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> { self.arboard.lock().clear().map_err(Error::from) }
}

fn encode_png(image: &arboard::ImageData<'_>) -> Result<Vec<u8>, Error> {
    let (width, height) = (
        u32::try_from(image.width).unwrap_or_default(),
        u32::try_from(image.height).unwrap_or_default(),
    );
    if image.bytes.is_empty() || width == 0 || height == 0 {
        return Err(Error::Empty);
    }

    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes)
        .write_image(&image.bytes, width, height, image::ExtendedColorType::Rgba8)
        .context(error::EncodeImageSnafu)?;

    Ok(png_bytes)
}

fn decode_png(png: &[u8]) -> Result<arboard::ImageData<'static>, Error> {
    let rgba = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .context(error::DecodeImageSnafu)?
        .into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(arboard::ImageData {
        width: width as usize,
        height: height as usize,
        bytes: Cow::Owned(rgba.into_raw()),
    })
}
