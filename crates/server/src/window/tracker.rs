use std::sync::Arc;

use tokio::sync::watch;

use crate::window::{FocusEvent, WindowId};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FocusState {
    /// Window holding focus right now.
    pub current: Option<WindowId>,

    /// Most recent focused window that does not belong to this process.
    pub last_external: Option<WindowId>,
}

/// Follows focus changes reported by the desktop environment.
///
/// `observe` only touches a watch channel, it is safe to call from the
/// thread delivering OS notifications.
#[derive(Clone, Debug)]
pub struct ForegroundTracker {
    own_process_id: u32,
    state: Arc<watch::Sender<FocusState>>,
}

impl ForegroundTracker {
    #[must_use]
    pub fn new(own_process_id: u32) -> Self {
        let (state, _receiver) = watch::channel(FocusState::default());
        Self { own_process_id, state: Arc::new(state) }
    }

    /// Tracker that ignores the windows of the calling process.
    #[must_use]
    pub fn for_current_process() -> Self { Self::new(std::process::id()) }

    pub fn observe(&self, FocusEvent { window, process_id }: FocusEvent) {
        let is_external = process_id != self.own_process_id;
        let _modified = self.state.send_if_modified(|state| {
            let next = FocusState {
                current: Some(window),
                last_external: if is_external { Some(window) } else { state.last_external },
            };
            let modified = *state != next;
            *state = next;
            modified
        });
    }

    /// The focused window was destroyed.
    pub fn forget(&self, window: WindowId) {
        let _modified = self.state.send_if_modified(|state| {
            let before = *state;
            if state.current == Some(window) {
                state.current = None;
            }
            if state.last_external == Some(window) {
                state.last_external = None;
            }
            before != *state
        });
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<WindowId> { self.state.borrow().current }

    #[inline]
    #[must_use]
    pub fn last_external(&self) -> Option<WindowId> { self.state.borrow().last_external }

    /// Change notifications of the focus state.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FocusState> { self.state.subscribe() }
}

#[cfg(test)]
mod tests {
    use super::ForegroundTracker;
    use crate::window::{FocusEvent, WindowId};

    const OWN: u32 = 100;

    fn focus(window: u64, process_id: u32) -> FocusEvent {
        FocusEvent { window: WindowId::new(window), process_id }
    }

    #[test]
    fn test_own_windows_do_not_replace_external_target() {
        let tracker = ForegroundTracker::new(OWN);
        assert_eq!(tracker.last_external(), None);

        tracker.observe(focus(1, 7));
        tracker.observe(focus(2, OWN));
        assert_eq!(tracker.current(), Some(WindowId::new(2)));
        assert_eq!(tracker.last_external(), Some(WindowId::new(1)));

        tracker.observe(focus(3, 8));
        assert_eq!(tracker.last_external(), Some(WindowId::new(3)));
    }

    #[test]
    fn test_forget_destroyed_window() {
        let tracker = ForegroundTracker::new(OWN);
        tracker.observe(focus(1, 7));
        tracker.forget(WindowId::new(1));
        assert_eq!(tracker.current(), None);
        assert_eq!(tracker.last_external(), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let tracker = ForegroundTracker::new(OWN);
        let mut receiver = tracker.subscribe();
        tracker.observe(focus(5, 9));
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().last_external, Some(WindowId::new(5)));
    }
}
