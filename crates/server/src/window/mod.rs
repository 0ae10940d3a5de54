mod error;
mod tracker;

use std::fmt;

use async_trait::async_trait;

pub use self::{
    error::Error,
    tracker::{FocusState, ForegroundTracker},
};

/// Opaque handle of a top-level window.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct WindowId(u64);

impl WindowId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self { Self(raw) }

    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 { self.0 }
}

impl From<u64> for WindowId {
    fn from(raw: u64) -> Self { Self(raw) }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}

/// A window received input focus.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FocusEvent {
    pub window: WindowId,

    /// Process owning `window`.
    pub process_id: u32,
}

/// Window operations provided by the desktop environment.
#[async_trait]
pub trait WindowSystem: Send + Sync {
    /// Whether `window` still exists.
    async fn is_alive(&self, window: WindowId) -> bool;

    /// Gives input focus to `window`.
    async fn activate(&self, window: WindowId) -> Result<(), Error>;
}
