use std::time::Duration;

use cliptrail_server::paste::PasteOptions;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PasteConfig {
    #[serde(default = "PasteConfig::default_write_timeout_ms")]
    pub write_timeout_ms: u64,

    #[serde(default = "PasteConfig::default_focus_timeout_ms")]
    pub focus_timeout_ms: u64,

    #[serde(default = "PasteConfig::default_suppression_timeout_ms")]
    pub suppression_timeout_ms: u64,

    #[serde(default = "PasteConfig::default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            write_timeout_ms: Self::default_write_timeout_ms(),
            focus_timeout_ms: Self::default_focus_timeout_ms(),
            suppression_timeout_ms: Self::default_suppression_timeout_ms(),
            settle_delay_ms: Self::default_settle_delay_ms(),
        }
    }
}

impl PasteConfig {
    pub const fn default_write_timeout_ms() -> u64 { 500 }

    pub const fn default_focus_timeout_ms() -> u64 { 500 }

    pub const fn default_suppression_timeout_ms() -> u64 { 1000 }

    pub const fn default_settle_delay_ms() -> u64 { 50 }
}

impl From<PasteConfig> for PasteOptions {
    fn from(
        PasteConfig { write_timeout_ms, focus_timeout_ms, suppression_timeout_ms, settle_delay_ms }: PasteConfig,
    ) -> Self {
        Self {
            write_timeout: Duration::from_millis(write_timeout_ms),
            focus_timeout: Duration::from_millis(focus_timeout_ms),
            suppression_timeout: Duration::from_millis(suppression_timeout_ms),
            settle_delay: Duration::from_millis(settle_delay_ms),
        }
    }
}
