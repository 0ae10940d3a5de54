/// Normalized search input: trimmed and case-folded once, so entries can be
/// matched against it without re-normalizing per entry.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new<S: AsRef<str>>(raw: S) -> Self { Self { needle: raw.as_ref().trim().to_lowercase() } }

    /// Matches every entry.
    #[inline]
    #[must_use]
    pub const fn all() -> Self { Self { needle: String::new() } }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.needle.is_empty() }

    #[inline]
    #[must_use]
    pub fn needle(&self) -> &str { &self.needle }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self { Self::new(raw) }
}

impl From<Option<&str>> for SearchQuery {
    fn from(raw: Option<&str>) -> Self { raw.map_or_else(Self::all, Self::new) }
}
