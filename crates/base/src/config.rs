use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// # Panics
/// This function should never panic
#[inline]
#[must_use]
pub fn default_history_dir() -> PathBuf {
    let base_dirs = BaseDirs::new().expect("`BaseDirs::new` always success");
    [
        PathBuf::from(base_dirs.cache_dir()),
        PathBuf::from(crate::PROJECT_NAME),
        PathBuf::from(crate::DAEMON_HISTORY_FILE_NAME),
    ]
    .into_iter()
    .collect()
}

#[inline]
#[must_use]
pub fn default_config_file_path() -> PathBuf {
    [crate::PROJECT_CONFIG_DIR.as_path(), Path::new(crate::DAEMON_CONFIG_NAME)]
        .into_iter()
        .collect()
}
