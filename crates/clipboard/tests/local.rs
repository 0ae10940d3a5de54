use cliptrail_clipboard::{ClipboardLoad, ClipboardPayload, Error, LocalClipboard};

mod common;

use self::common::ClipboardTester;

#[derive(Debug)]
pub struct Tester;

impl Default for Tester {
    fn default() -> Self { Self::new() }
}

impl Tester {
    #[must_use]
    pub const fn new() -> Self { Self }
}

impl ClipboardTester for Tester {
    type Clipboard = LocalClipboard;

    fn new_clipboard(&self) -> Self::Clipboard { LocalClipboard::new() }
}

#[test]
fn test_local() -> Result<(), Error> { Tester::new().run() }

#[test]
fn test_local_with_payload() -> Result<(), Error> {
    let clipboard = LocalClipboard::with_payload(ClipboardPayload::text("preset"));
    assert_eq!(clipboard.load()?, ClipboardPayload::text("preset"));
    Ok(())
}
