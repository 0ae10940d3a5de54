//! Turns raw clipboard payloads into typed, content-addressed content.
//!
//! Classification is pure: it validates the payload for its kind and computes
//! the [`Fingerprint`] that identifies the content for deduplication.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use snafu::Snafu;

use crate::{payload::encode_file_list, ClipContent, ClipboardPayload, ContentKind, Fingerprint};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Content accepted by the classifier together with its fingerprint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Classified {
    pub content: ClipContent,

    pub fingerprint: Fingerprint,
}

impl Classified {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ContentKind { self.content.kind() }
}

/// # Errors
///
/// Returns an error if the payload cannot be interpreted as content of its
/// declared kind.
pub fn classify(payload: ClipboardPayload) -> Result<Classified, Error> {
    let kind = payload.kind();
    if payload.is_empty() {
        return Err(Error::EmptyPayload { kind });
    }

    match payload {
        ClipboardPayload::Text(bytes) => classify_text(&bytes),
        ClipboardPayload::Image(bytes) => classify_image(bytes),
        ClipboardPayload::FileList(paths) => classify_file_list(paths),
    }
}

fn classify_text(bytes: &[u8]) -> Result<Classified, Error> {
    let text = simdutf8::basic::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
    let fingerprint = Fingerprint::compute(ContentKind::Text, bytes);
    Ok(Classified { content: ClipContent::Text(text.to_owned()), fingerprint })
}

fn classify_image(bytes: Bytes) -> Result<Classified, Error> {
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(Error::NotPng);
    }
    let fingerprint = Fingerprint::compute(ContentKind::Image, &bytes);
    Ok(Classified { content: ClipContent::Image(bytes), fingerprint })
}

fn classify_file_list(paths: Vec<PathBuf>) -> Result<Classified, Error> {
    if let Some(path) = paths.iter().find(|path| !is_absolute(path)) {
        return Err(Error::RelativePath { path: path.clone() });
    }
    let fingerprint = Fingerprint::compute(ContentKind::FileList, &normalize_file_list(&paths));
    Ok(Classified { content: ClipContent::FileList(paths), fingerprint })
}

/// Selection order is kept; only the casing is folded, and only where the
/// filesystem ignores it.
fn normalize_file_list(paths: &[PathBuf]) -> Vec<u8> {
    let encoded = encode_file_list(paths);
    if !cfg!(any(windows, target_os = "macos")) {
        return encoded;
    }
    match String::from_utf8(encoded) {
        Ok(text) => text.to_lowercase().into_bytes(),
        Err(err) => err.into_bytes().to_ascii_lowercase(),
    }
}

// `Path::is_absolute` rejects `/foo` on Windows, clipboard sources sometimes
// hand those out for the current drive.
fn is_absolute(path: &Path) -> bool { path.is_absolute() || path.has_root() }

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unsupported {kind} content, payload is empty"))]
    EmptyPayload { kind: ContentKind },

    #[snafu(display("Unsupported text content, payload is not valid UTF-8"))]
    InvalidUtf8,

    #[snafu(display("Unsupported image content, payload is not PNG-encoded"))]
    NotPng,

    #[snafu(display("Unsupported file list content, `{}` is not an absolute path", path.display()))]
    RelativePath { path: PathBuf },
}
