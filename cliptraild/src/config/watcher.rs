use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// SAFETY: user may use bool to enable/disable the functions
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WatcherConfig {
    #[serde(default = "WatcherConfig::default_load_current")]
    pub load_current: bool,

    #[serde(default = "WatcherConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "WatcherConfig::default_filter_text_min_length")]
    pub filter_text_min_length: usize,

    #[serde(default = "WatcherConfig::default_filter_text_max_length")]
    pub filter_text_max_length: usize,

    #[serde(default)]
    pub denied_text_regex_patterns: HashSet<String>,

    #[serde(default = "WatcherConfig::default_capture_image")]
    pub capture_image: bool,

    #[serde(default = "WatcherConfig::default_filter_image_max_size")]
    pub filter_image_max_size: usize,

    #[serde(default = "WatcherConfig::default_capture_file_list")]
    pub capture_file_list: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            load_current: Self::default_load_current(),
            poll_interval_ms: Self::default_poll_interval_ms(),
            filter_text_min_length: Self::default_filter_text_min_length(),
            filter_text_max_length: Self::default_filter_text_max_length(),
            denied_text_regex_patterns: HashSet::new(),
            capture_image: Self::default_capture_image(),
            filter_image_max_size: Self::default_filter_image_max_size(),
            capture_file_list: Self::default_capture_file_list(),
        }
    }
}

impl From<WatcherConfig> for cliptrail_server::ClipboardWatcherOptions {
    fn from(
        WatcherConfig {
            load_current,
            filter_text_min_length,
            filter_text_max_length,
            denied_text_regex_patterns,
            capture_image,
            filter_image_max_size,
            capture_file_list,
            ..
        }: WatcherConfig,
    ) -> Self {
        Self {
            load_current,
            capture_image,
            capture_file_list,
            filter_text_min_length,
            filter_text_max_length,
            filter_image_max_size,
            denied_text_regex_patterns,
        }
    }
}

impl WatcherConfig {
    pub const fn default_load_current() -> bool { true }

    pub const fn default_poll_interval_ms() -> u64 { 250 }

    pub const fn default_filter_text_min_length() -> usize { 1 }

    pub const fn default_filter_text_max_length() -> usize { 20_000_000 }

    pub const fn default_capture_image() -> bool { true }

    pub const fn default_filter_image_max_size() -> usize {
        // 5 MiB
        5 * (1 << 20)
    }

    pub const fn default_capture_file_list() -> bool { true }
}
