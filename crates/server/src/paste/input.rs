use async_trait::async_trait;
use snafu::Snafu;

/// Synthesizes keyboard input in the focused window.
#[async_trait]
pub trait InputSimulator: Send + Sync {
    /// Sends the platform paste chord, `Ctrl+V` or `Cmd+V`.
    async fn send_paste(&self) -> Result<(), Error>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not synthesize paste keystroke, reason: {reason}"))]
    Synthesize { reason: String },
}
