use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use parking_lot::{Condvar, Mutex};

use crate::{ClipboardWait, Error};

pub fn new() -> (Publisher, Subscriber) {
    let inner = Arc::new((Mutex::new(State::Running { generation: 0 }), Condvar::new()));
    let publisher = Publisher(inner.clone());
    let subscriber = Subscriber { inner, seen: AtomicU64::new(0) };
    (publisher, subscriber)
}

#[derive(Clone, Copy, Debug)]
enum State {
    /// `generation` counts notifications, a subscriber that was busy while
    /// one was sent still observes it on its next `wait`.
    Running { generation: u64 },
    Stopped,
}

#[derive(Debug)]
pub struct Publisher(Arc<(Mutex<State>, Condvar)>);

impl Publisher {
    pub fn notify_all(&self) {
        let (lock, condvar) = &*self.0;
        {
            let mut state = lock.lock();
            if let State::Running { generation } = *state {
                *state = State::Running { generation: generation.wrapping_add(1) };
            }
        }
        let _unused = condvar.notify_all();
    }

    pub fn close(&self) {
        let (lock, condvar) = &*self.0;
        *lock.lock() = State::Stopped;
        let _unused = condvar.notify_all();
    }
}

impl Drop for Publisher {
    fn drop(&mut self) { self.close(); }
}

#[derive(Debug)]
pub struct Subscriber {
    inner: Arc<(Mutex<State>, Condvar)>,
    seen: AtomicU64,
}

impl Subscriber {
    fn current_generation(&self) -> u64 {
        match *self.inner.0.lock() {
            State::Running { generation } => generation,
            State::Stopped => self.seen.load(Ordering::Acquire),
        }
    }
}

// a new subscriber starts at the current generation
impl Clone for Subscriber {
    fn clone(&self) -> Self {
        let seen = AtomicU64::new(self.current_generation());
        Self { inner: self.inner.clone(), seen }
    }
}

impl ClipboardWait for Subscriber {
    fn wait(&self) -> Result<(), Error> {
        let (lock, condvar) = &*self.inner;
        let mut state = lock.lock();
        loop {
            match *state {
                State::Stopped => return Err(Error::NotifierClosed),
                State::Running { generation } if generation != self.seen.load(Ordering::Acquire) => {
                    self.seen.store(generation, Ordering::Release);
                    return Ok(());
                }
                State::Running { .. } => condvar.wait(&mut state),
            }
        }
    }
}
