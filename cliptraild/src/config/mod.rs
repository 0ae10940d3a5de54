mod error;
mod history;
mod paste;
mod watcher;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::error::Error;
use self::{history::HistoryConfig, paste::PasteConfig, watcher::WatcherConfig};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "Config::default_max_history")]
    pub max_history: usize,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub log: cliptrail_cli::config::LogConfig,

    #[serde(default, alias = "monitor")]
    pub watcher: WatcherConfig,

    #[serde(default)]
    pub paste: PasteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_history: Self::default_max_history(),
            history: HistoryConfig::default(),
            log: cliptrail_cli::config::LogConfig::default(),
            watcher: WatcherConfig::default(),
            paste: PasteConfig::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf { cliptrail_base::config::default_config_file_path() }

    #[inline]
    pub const fn default_max_history() -> usize { cliptrail_base::DEFAULT_MAX_HISTORY }

    /// Reads the configuration at `path`, a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        match path.as_ref().try_exists() {
            Ok(true) => Self::load(path),
            _ => {
                tracing::debug!(
                    "No configuration at `{}`, use the defaults",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
        }
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            toml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = match config.log.file_path.map(resolve_path) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        config.max_history =
            if config.max_history == 0 { Self::default_max_history() } else { config.max_history };

        config.history.path = resolve_path(&config.history.path)?;

        Ok(config)
    }
}

impl From<Config> for cliptrail_server::Config {
    fn from(Config { max_history, history, watcher, paste, .. }: Config) -> Self {
        let poll_interval = Duration::from_millis(watcher.poll_interval_ms);
        Self {
            max_history,
            history: history.into(),
            watcher: watcher.into(),
            paste: paste.into(),
            poll_interval,
        }
    }
}

fn resolve_path<P>(path: P) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
{
    path.as_ref()
        .try_resolve()
        .map(|path| path.to_path_buf())
        .with_context(|_| error::ResolveFilePathSnafu { file_path: path.as_ref().to_path_buf() })
}
