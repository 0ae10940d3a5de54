use std::iter::IntoIterator;

use cliptrail_clipboard::ClipboardWait;
use tokio::{sync::mpsc, task};

/// Turns blocking clipboard waits into an async stream of change
/// notifications.
#[derive(Debug)]
pub struct Subscriber {
    receiver: mpsc::UnboundedReceiver<()>,
    join_handles: task::JoinSet<()>,
}

impl Subscriber {
    /// Resolves on the next clipboard change, `None` once every source is
    /// closed.
    pub async fn next(&mut self) -> Option<()> { self.receiver.recv().await }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.receiver.close();
        self.join_handles.abort_all();
    }
}

impl<I, S> From<I> for Subscriber
where
    I: IntoIterator<Item = S>,
    S: ClipboardWait + Send + 'static,
{
    fn from(subs: I) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let join_handles =
            subs.into_iter().fold(task::JoinSet::new(), |mut join_handles, subscriber| {
                let _unused = join_handles.spawn_blocking({
                    let event_sender = sender.clone();
                    move || {
                        while subscriber.wait().is_ok() {
                            if event_sender.send(()).is_err() {
                                break;
                            }
                        }
                    }
                });
                join_handles
            });

        Self { receiver, join_handles }
    }
}
