use snafu::Snafu;

use crate::config;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not initialize tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: tokio::io::Error },

    #[snafu(display("{}", with_help(source)))]
    Application { source: cliptrail_server::Error },

    #[snafu(display("{source}"))]
    Config { source: config::Error },

    #[snafu(display("Could not set up logging, error: {source}"))]
    InitializeLog { source: cliptrail_cli::config::LogError },

    #[snafu(display("Could not read history, {}", with_help(source)))]
    ReadHistory { source: cliptrail_server::history::Error },

    #[snafu(display("Could not write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },

    #[snafu(display("Could not serialize configuration, error: {source}"))]
    SerializeConfig { source: toml::ser::Error },
}

fn with_help<E: std::fmt::Display>(error: &E) -> String {
    cliptrail_cli::format_error_with_help(
        error,
        cliptrail_base::DAEMON_PROGRAM_NAME,
        cliptrail_base::DAEMON_CONFIG_NAME,
    )
}

impl From<cliptrail_server::Error> for Error {
    fn from(source: cliptrail_server::Error) -> Self { Self::Application { source } }
}

impl From<config::Error> for Error {
    fn from(source: config::Error) -> Self { Self::Config { source } }
}

pub trait CommandError {
    fn exit_code(&self) -> exitcode::ExitCode;
}

impl CommandError for Error {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Application { .. } | Self::SerializeConfig { .. } => exitcode::SOFTWARE,
            Self::Config { .. } => exitcode::CONFIG,
            Self::InitializeTokioRuntime { .. }
            | Self::InitializeLog { .. }
            | Self::ReadHistory { .. }
            | Self::WriteStdout { .. } => exitcode::IOERR,
        }
    }
}
