use std::{io::Write, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use cliptrail_base::{ClipEntry, SearchQuery};
use cliptrail_server::history::{self, RepositoryOptions};
use snafu::ResultExt;
use time::{format_description::well_known::Rfc3339, UtcOffset};
use tokio::runtime::Runtime;

use crate::{
    config::Config,
    error::{self, Error},
};

#[derive(Parser)]
#[command(name = cliptrail_base::DAEMON_PROGRAM_NAME, author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    subcommand: Option<Commands>,

    #[clap(
        long = "config",
        short = 'c',
        env = "CLIPTRAILD_CONFIG_FILE_PATH",
        help = "Specify a configuration file"
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "history-dir",
        env = "CLIPTRAILD_HISTORY_DIR",
        help = "Specify the directory holding the history"
    )]
    history_dir: Option<PathBuf>,

    #[clap(long = "log-level", env = "CLIPTRAILD_LOG_LEVEL", help = "Specify a log level")]
    log_level: Option<tracing::Level>,

    #[clap(long = "log-to-stderr", help = "Also emit log to stderr")]
    log_to_stderr: bool,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,

    #[clap(about = "Print the persisted clipboard history")]
    List {
        #[clap(long = "query", short = 'q', help = "Only print clips containing this text")]
        query: Option<String>,

        #[clap(long = "preview-length", default_value = "80", help = "Length of the preview")]
        preview_length: usize,
    },
}

impl Default for Cli {
    #[inline]
    fn default() -> Self { Self::parse() }
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        match self.subcommand {
            Some(Commands::Version) => {
                write_stdout(Self::command().render_long_version().as_bytes())
            }
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                Ok(())
            }
            Some(Commands::DefaultConfig) => {
                let config_text = toml::to_string_pretty(&Config::default())
                    .context(error::SerializeConfigSnafu)?;
                write_stdout(config_text.as_bytes())
            }
            Some(Commands::List { ref query, preview_length }) => {
                let config = self.load_config()?;
                let query = SearchQuery::from(query.as_deref());
                list_history(&config.history.into(), &query, preview_length)
            }
            None => {
                let config = self.load_config()?;
                run_cliptraild(config)
            }
        }
    }

    fn load_config(&self) -> Result<Config, Error> {
        let mut config = match &self.config_file {
            Some(config_file) => Config::load(config_file)?,
            None => Config::load_or_default(Config::default_path())?,
        };

        if let Some(history_dir) = &self.history_dir {
            config.history.path = history_dir.clone();
        }
        config.log = config.log.with_overrides(self.log_level, self.log_to_stderr);

        Ok(config)
    }
}

fn run_cliptraild(config: Config) -> Result<(), Error> {
    config.log.registry().context(error::InitializeLogSnafu)?;
    let config = cliptrail_server::Config::from(config);

    tracing::info!(
        "{} is initializing, pid: {}",
        cliptrail_base::DAEMON_PROGRAM_NAME,
        std::process::id()
    );

    tracing::info!("Initializing Tokio runtime");

    let exit_status = match Runtime::new().context(error::InitializeTokioRuntimeSnafu) {
        Ok(runtime) => runtime
            .block_on(cliptrail_server::serve_with_shutdown(config, |services| {
                let view = services.pipeline.view();
                tracing::info!(
                    "{} is ready, {} clip(s) in history, limit {}",
                    cliptrail_base::DAEMON_PROGRAM_NAME,
                    view.len(),
                    view.limit()
                );
            }))
            .map_err(Error::from),
        Err(err) => Err(err),
    };

    tracing::info!("{} is shutdown", cliptrail_base::DAEMON_PROGRAM_NAME);
    exit_status
}

fn list_history(
    options: &RepositoryOptions,
    query: &SearchQuery,
    preview_length: usize,
) -> Result<(), Error> {
    let runtime = Runtime::new().context(error::InitializeTokioRuntimeSnafu)?;
    let entries = runtime.block_on(async {
        let mut repository = history::open(options).await?;
        repository.list_all().await
    });
    let entries = entries.context(error::ReadHistorySnafu)?;

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let mut out = String::new();
    for entry in entries.iter().filter(|entry| entry.matches_query(query)) {
        out.push_str(&format_entry(entry, offset, preview_length));
        out.push('\n');
    }
    write_stdout(out.as_bytes())
}

fn format_entry(entry: &ClipEntry, offset: UtcOffset, preview_length: usize) -> String {
    let created_at =
        entry.created_at().to_offset(offset).format(&Rfc3339).unwrap_or_default();
    format!(
        "{id}{favorite} {created_at} [{kind}] {preview}",
        id = entry.id(),
        favorite = if entry.is_favorite() { "*" } else { "" },
        kind = entry.kind(),
        preview = entry.summarize(Some(preview_length)),
    )
}

fn write_stdout(data: &[u8]) -> Result<(), Error> {
    std::io::stdout().write_all(data).context(error::WriteStdoutSnafu)
}

#[cfg(test)]
mod tests {
    use cliptrail_base::{ClipEntry, ContentKind, EntryId};
    use time::{macros::datetime, UtcOffset};

    use super::format_entry;

    #[test]
    fn test_format_entry() {
        let at = datetime!(2024-05-01 12:30 UTC);
        let entry =
            ClipEntry::restore(EntryId::new(7), ContentKind::Text, b"hello world", at, true)
                .unwrap();
        let line = format_entry(&entry, UtcOffset::UTC, 80);
        assert_eq!(line, "7* 2024-05-01T12:30:00Z [text] hello world");
    }
}
