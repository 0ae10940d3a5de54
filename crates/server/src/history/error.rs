use std::path::PathBuf;

use cliptrail_base::{ClassifyError, EntryId};
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not join spawned task, error: {source}"))]
    JoinTask { source: tokio::task::JoinError },

    #[snafu(display("Failed to read file {}, error: {source}", file_path.display()))]
    ReadFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to write file {}, error: {source}", file_path.display()))]
    WriteFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to rename file {}, error: {source}", file_path.display()))]
    RenameFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to remove file {}, error: {source}", file_path.display()))]
    RemoveFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to create directory {}, error: {source}", file_path.display()))]
    CreateDirectory { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to serialize entry, error: {source}"))]
    SerializeEntry { source: bincode::Error },

    #[snafu(display("Failed to serialize history header, error: {source}"))]
    SerializeHistoryHeader { source: serde_json::Error },

    #[snafu(display("Failed to deserialize history header, error: {source}"))]
    DeserializeHistoryHeader { source: serde_json::Error },

    #[snafu(display("History schema {new} is newer than the supported schema {current}"))]
    NewerSchema { new: u64, current: u64 },

    #[snafu(display("Could not open database {}, error: {source}", file_path.display()))]
    OpenDatabase { source: rusqlite::Error, file_path: PathBuf },

    #[snafu(display("Could not execute database statement, error: {source}"))]
    ExecuteStatement { source: rusqlite::Error },

    #[snafu(display("Entry id {id} does not fit in a database row"))]
    IdOutOfRange { id: EntryId },

    #[snafu(display("Timestamp of entry {id} does not fit in a database row"))]
    TimestampOutOfRange { id: EntryId },

    #[snafu(display("Could not restore entry {id}, error: {source}"))]
    RestoreEntry { id: EntryId, source: ClassifyError },
}
