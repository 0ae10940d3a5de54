use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Pauses and resumes capturing without stopping the watcher.
#[derive(Clone, Debug)]
pub struct Toggle {
    is_watching: Arc<AtomicBool>,
}

impl Toggle {
    pub const fn new(is_watching: Arc<AtomicBool>) -> Self { Self { is_watching } }

    #[inline]
    pub fn enable(&self) {
        self.is_watching.store(true, Ordering::Release);
        tracing::info!("ClipboardWatcher is watching for clipboard event");
    }

    #[inline]
    pub fn disable(&self) {
        self.is_watching.store(false, Ordering::Release);
        tracing::info!("ClipboardWatcher is not watching for clipboard event");
    }

    #[inline]
    pub fn toggle(&self) {
        if self.is_watching() {
            self.disable();
        } else {
            self.enable();
        }
    }

    #[inline]
    #[must_use]
    pub fn is_watching(&self) -> bool { self.is_watching.load(Ordering::Acquire) }
}
