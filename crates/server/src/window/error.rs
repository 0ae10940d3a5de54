use snafu::Snafu;

use crate::window::WindowId;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Window {window} does not exist anymore"))]
    WindowGone { window: WindowId },

    #[snafu(display("Could not activate window {window}, reason: {reason}"))]
    Activate { window: WindowId, reason: String },
}
