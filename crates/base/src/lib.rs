pub mod classifier;
pub mod config;
mod entry;
mod filter;
mod fingerprint;
mod kind;
mod payload;
mod query;

use std::path::PathBuf;

use directories::ProjectDirs;
use once_cell::sync::Lazy;

pub use self::{
    classifier::{classify, Classified, Error as ClassifyError},
    entry::{
        ClipContent, Entry as ClipEntry, EntryId, Metadata as ClipEntryMetadata,
        SEARCHABLE_PREFIX_CHARS,
    },
    filter::{Filter as ClipFilter, Rejection as ClipRejection},
    fingerprint::{Error as FingerprintError, Fingerprint},
    kind::{Error as ContentKindError, Kind as ContentKind},
    payload::Payload as ClipboardPayload,
    query::SearchQuery,
};

pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PROJECT_NAME: &str = "cliptrail";
pub const PROJECT_NAME_WITH_INITIAL_CAPITAL: &str = "Cliptrail";

pub const DAEMON_PROGRAM_NAME: &str = "cliptraild";
pub const DAEMON_CONFIG_NAME: &str = "cliptraild.toml";
pub const DAEMON_HISTORY_FILE_NAME: &str = "cliptraild-history";

pub const DEFAULT_MAX_HISTORY: usize = 50;

pub static PROJECT_CONFIG_DIR: Lazy<PathBuf> = Lazy::new(|| {
    ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME)
        .expect("Creating `ProjectDirs` should always success")
        .config_dir()
        .to_path_buf()
});
