use time::{Duration, OffsetDateTime};

/// Hands out capture timestamps that never repeat and never go backwards,
/// so the recency of two entries is always decidable.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock {
    last: Option<OffsetDateTime>,
}

impl MonotonicClock {
    #[inline]
    #[must_use]
    pub const fn new() -> Self { Self { last: None } }

    /// Continues after the newest timestamp already handed out, typically the
    /// most recent entry of a rehydrated history.
    #[inline]
    #[must_use]
    pub const fn starting_after(last: Option<OffsetDateTime>) -> Self { Self { last } }

    #[inline]
    pub fn now(&mut self) -> OffsetDateTime { self.stamp(OffsetDateTime::now_utc()) }

    pub fn stamp(&mut self, wall_clock: OffsetDateTime) -> OffsetDateTime {
        let next = match self.last {
            Some(last) if wall_clock <= last => last + Duration::nanoseconds(1),
            _ => wall_clock,
        };
        self.last = Some(next);
        next
    }
}
