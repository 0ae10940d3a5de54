use cliptrail_base::Fingerprint;
use tokio::time::Instant;

/// Window during which the clipboard change caused by a paste-back is
/// recognized and dropped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Suppression {
    fingerprint: Fingerprint,
    deadline: Instant,
}

impl Suppression {
    #[inline]
    #[must_use]
    pub const fn new(fingerprint: Fingerprint, deadline: Instant) -> Self {
        Self { fingerprint, deadline }
    }

    #[inline]
    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint { self.fingerprint }

    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Instant { self.deadline }

    #[inline]
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool { now >= self.deadline }

    #[inline]
    #[must_use]
    pub fn matches(&self, fingerprint: &Fingerprint) -> bool { self.fingerprint == *fingerprint }
}
