use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use snafu::Snafu;

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    #[default]
    Text = 0,
    Image = 1,
    FileList = 2,
}

impl Kind {
    pub const MAX_LENGTH: usize = 3;

    #[inline]
    #[must_use]
    pub const fn all_kinds() -> [Self; Self::MAX_LENGTH] { [Self::Text, Self::Image, Self::FileList] }

    /// Byte prepended to the payload when computing a fingerprint.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> u8 { self as u8 }

    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::FileList => "files",
        }
    }
}

impl From<Kind> for usize {
    fn from(kind: Kind) -> Self { kind as Self }
}

impl TryFrom<u8> for Kind {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Text),
            1 => Ok(Self::Image),
            2 => Ok(Self::FileList),
            _ => Err(Error::ParseContentKind { value: tag.to_string() }),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "files" | "file-list" => Ok(Self::FileList),
            _ => Err(Error::ParseContentKind { value: s.to_string() }),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not parse content kind, value: {value}"))]
    ParseContentKind { value: String },
}
