use snafu::Snafu;

use crate::ContentKind;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{error}"))]
    Arboard { error: arboard::Error },

    #[snafu(display("Clipboard is empty"))]
    Empty,

    #[snafu(display("Clipboard does not support storing {kind} content"))]
    UnsupportedContent { kind: ContentKind },

    #[snafu(display("Could not encode image as PNG, error: {source}"))]
    EncodeImage { source: image::ImageError },

    #[snafu(display("Could not decode PNG image, error: {source}"))]
    DecodeImage { source: image::ImageError },

    #[snafu(display("Could not spawn clipboard listener thread, error: {source}"))]
    SpawnListener { source: std::io::Error },

    #[snafu(display("Primitive was poisoned"))]
    PrimitivePoisoned,

    #[snafu(display("Notifier is closed"))]
    NotifierClosed,
}

impl From<arboard::Error> for Error {
    fn from(error: arboard::Error) -> Self {
        match error {
            arboard::Error::ContentNotAvailable => Self::Empty,
            error => Self::Arboard { error },
        }
    }
}
