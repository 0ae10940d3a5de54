use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use snafu::{ResultExt, Snafu};

use crate::ContentKind;

/// SHA-256 over the content-kind tag followed by the payload bytes.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fingerprint([u8; Self::LENGTH]);

impl Fingerprint {
    pub const LENGTH: usize = 32;

    #[must_use]
    pub fn compute(kind: ContentKind, data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([kind.tag()]);
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::LENGTH] { &self.0 }

    /// # Errors
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        <[u8; Self::LENGTH]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidLength { length: bytes.len() })
    }

    #[inline]
    #[must_use]
    pub fn to_hex(&self) -> String { hex::encode(self.0) }

    /// First twelve hex digits, enough to tell entries apart in logs.
    #[inline]
    #[must_use]
    pub fn short(&self) -> String { hex::encode(&self.0[..6]) }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

impl FromStr for Fingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).context(DecodeHexSnafu)?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Fingerprint must be 32 bytes long, got {length}"))]
    InvalidLength { length: usize },

    #[snafu(display("Could not decode fingerprint, error: {source}"))]
    DecodeHex { source: hex::FromHexError },
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Fingerprint;
    use crate::ContentKind;

    #[test]
    fn test_kind_participates_in_fingerprint() {
        let text = Fingerprint::compute(ContentKind::Text, b"/tmp/a");
        let files = Fingerprint::compute(ContentKind::FileList, b"/tmp/a");
        assert_ne!(text, files);
        assert_eq!(text, Fingerprint::compute(ContentKind::Text, b"/tmp/a"));
    }

    #[test]
    fn test_hex_representation() {
        let fingerprint = Fingerprint::compute(ContentKind::Image, b"\x89PNG");
        let hex = fingerprint.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with(&fingerprint.short()));
        assert_eq!(Fingerprint::from_str(&hex).unwrap(), fingerprint);
        assert!(Fingerprint::from_str("abcd").is_err());
        assert!(Fingerprint::from_str("not hex").is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let fingerprint = Fingerprint::compute(ContentKind::Text, b"hello");
        let json = serde_json::to_string(&fingerprint).unwrap();
        assert_eq!(json, format!("\"{}\"", fingerprint.to_hex()));
        let decoded: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, fingerprint);
    }
}
