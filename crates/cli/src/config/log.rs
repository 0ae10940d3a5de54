use std::{fs::OpenOptions, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use snafu::{ResultExt, Snafu};
use tracing_subscriber::{
    layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer,
};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_file_path")]
    pub file_path: Option<PathBuf>,

    #[serde(default = "LogConfig::default_emit_journald")]
    pub emit_journald: bool,

    #[serde(default = "LogConfig::default_emit_stdout")]
    pub emit_stdout: bool,

    #[serde(default = "LogConfig::default_emit_stderr")]
    pub emit_stderr: bool,

    #[serde(default = "LogConfig::default_log_level")]
    #[serde_as(as = "DisplayFromStr")]
    pub level: tracing::Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: Self::default_file_path(),
            emit_journald: Self::default_emit_journald(),
            emit_stdout: Self::default_emit_stdout(),
            emit_stderr: Self::default_emit_stderr(),
            level: Self::default_log_level(),
        }
    }
}

impl LogConfig {
    #[inline]
    #[must_use]
    pub const fn default_log_level() -> tracing::Level { tracing::Level::INFO }

    #[inline]
    #[must_use]
    pub const fn default_file_path() -> Option<PathBuf> { None }

    #[inline]
    #[must_use]
    pub const fn default_emit_journald() -> bool { true }

    #[inline]
    #[must_use]
    pub const fn default_emit_stdout() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_emit_stderr() -> bool { false }

    /// Applies command line overrides on top of the configured values.
    #[must_use]
    pub fn with_overrides(mut self, level: Option<tracing::Level>, emit_stderr: bool) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        self.emit_stderr |= emit_stderr;
        self
    }

    /// Installs the global tracing subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened or the journald
    /// socket is unavailable.
    pub fn registry(&self) -> Result<(), Error> {
        let Self { emit_journald, file_path, emit_stdout, emit_stderr, level } = self;

        let journald = emit_journald.then(|| LogDriver::Journald.layer()).transpose()?;
        let file = file_path.clone().map(|path| LogDriver::File(path).layer()).transpose()?;
        let stdout = emit_stdout.then(|| LogDriver::Stdout.layer()).transpose()?;
        let stderr = emit_stderr.then(|| LogDriver::Stderr.layer()).transpose()?;

        tracing_subscriber::registry()
            .with(tracing_subscriber::filter::LevelFilter::from_level(*level))
            .with(journald)
            .with(file)
            .with(stdout)
            .with(stderr)
            .init();
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum LogDriver {
    Stdout,
    Stderr,
    Journald,
    File(PathBuf),
}

impl LogDriver {
    #[allow(clippy::type_repetition_in_bounds)]
    fn layer<S>(self) -> Result<BoxedLayer<S>, Error>
    where
        S: tracing::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let fmt =
            tracing_subscriber::fmt::layer().with_thread_ids(true).with_thread_names(true);

        Ok(match self {
            Self::Stdout => Box::new(fmt.with_writer(std::io::stdout)),
            Self::Stderr => Box::new(fmt.with_writer(std::io::stderr)),
            Self::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .context(OpenLogFileSnafu { path })?;
                Box::new(fmt.with_ansi(false).with_writer(file))
            }
            Self::Journald => Box::new(tracing_journald::layer().context(ConnectJournaldSnafu)?),
        })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not open log file {}, error: {source}", path.display()))]
    OpenLogFile { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not connect to journald, error: {source}"))]
    ConnectJournald { source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::LogConfig;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: LogConfig = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(config.level, tracing::Level::DEBUG);
        assert!(config.emit_journald);
        assert!(!config.emit_stderr);
        assert_eq!(config.file_path, None);
    }

    #[test]
    fn test_overrides() {
        let config = LogConfig::default().with_overrides(Some(tracing::Level::TRACE), true);
        assert_eq!(config.level, tracing::Level::TRACE);
        assert!(config.emit_stderr);

        let config = LogConfig::default().with_overrides(None, false);
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_log_file_in_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            file_path: Some(dir.path().join("missing").join("cliptraild.log")),
            emit_journald: false,
            ..LogConfig::default()
        };
        assert!(config.registry().is_err());
    }
}
