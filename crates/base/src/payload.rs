use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use bytes::Bytes;

use crate::ContentKind;

/// Raw content as delivered by a clipboard change source, before
/// classification.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Payload {
    /// Text bytes, expected to be UTF-8.
    Text(Bytes),

    /// PNG-encoded image.
    Image(Bytes),

    /// Absolute paths in selection order.
    FileList(Vec<PathBuf>),
}

impl Payload {
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self { Self::Text(Bytes::from(text.into())) }

    /// Rebuilds a payload from its serialized form, the inverse of
    /// [`encode_file_list`] for file lists.
    #[must_use]
    pub fn from_raw(kind: ContentKind, data: &[u8]) -> Self {
        match kind {
            ContentKind::Text => Self::Text(Bytes::copy_from_slice(data)),
            ContentKind::Image => Self::Image(Bytes::copy_from_slice(data)),
            ContentKind::FileList => Self::FileList(decode_file_list(data)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Image(_) => ContentKind::Image,
            Self::FileList(_) => ContentKind::FileList,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(bytes) | Self::Image(bytes) => bytes.is_empty(),
            Self::FileList(paths) => paths.is_empty(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(bytes) | Self::Image(bytes) => bytes.len(),
            Self::FileList(paths) => paths.iter().map(|path| path.as_os_str().len()).sum(),
        }
    }

    #[inline]
    #[must_use]
    pub fn basic_information(&self) -> String {
        let kind = self.kind();
        match self {
            Self::FileList(paths) => format!("{kind}, {count} path(s)", count = paths.len()),
            Self::Text(_) | Self::Image(_) => {
                let size = humansize::format_size(self.len(), humansize::BINARY);
                format!("{kind}, {size}")
            }
        }
    }
}

const PATH_SEPARATOR: u8 = 0;

/// Serializes a path list from the raw bytes of each path, NUL-separated.
///
/// NUL never occurs inside a path, so the encoding is unambiguous and
/// [`Payload::from_raw`] restores the exact paths.
#[must_use]
pub fn encode_file_list(paths: &[PathBuf]) -> Vec<u8> {
    let mut data = Vec::with_capacity(paths.iter().map(|path| path.as_os_str().len() + 1).sum());
    for (idx, path) in paths.iter().enumerate() {
        if idx > 0 {
            data.push(PATH_SEPARATOR);
        }
        data.extend_from_slice(&path_bytes(path));
    }
    data
}

fn decode_file_list(data: &[u8]) -> Vec<PathBuf> {
    data.split(|byte| *byte == PATH_SEPARATOR)
        .filter(|chunk| !chunk.is_empty())
        .map(path_from_bytes)
        .collect()
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;

    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(path) => Cow::Borrowed(path.as_bytes()),
        Cow::Owned(path) => Cow::Owned(path.into_bytes()),
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{encode_file_list, Payload};
    use crate::ContentKind;

    #[test]
    fn test_file_list_from_raw_keeps_order() {
        let payload = Payload::from_raw(ContentKind::FileList, b"/tmp/b\0/tmp/a\0");
        assert_eq!(
            payload,
            Payload::FileList(vec![PathBuf::from("/tmp/b"), PathBuf::from("/tmp/a")])
        );
        assert_eq!(payload.kind(), ContentKind::FileList);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_list_encoding_keeps_raw_path_bytes() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let paths = vec![
            PathBuf::from("/tmp/line\nbreak"),
            PathBuf::from(OsStr::from_bytes(b"/tmp/\xff")),
        ];
        let data = encode_file_list(&paths);
        assert_eq!(Payload::from_raw(ContentKind::FileList, &data), Payload::FileList(paths));
    }

    #[test]
    fn test_emptiness() {
        assert!(Payload::text("").is_empty());
        assert!(Payload::FileList(Vec::new()).is_empty());
        assert!(!Payload::text("x").is_empty());
        assert_eq!(Payload::text("abc").len(), 3);
    }
}
