use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use cliptrail_base::{ClipEntry, ContentKind, EntryId};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use snafu::{OptionExt, ResultExt};
use time::OffsetDateTime;

use crate::history::{error, Error, Repository};

const DATABASE_FILE_NAME: &str = "history.sqlite3";

/// One row per entry in a SQLite database.
#[derive(Clone, Debug)]
pub struct SqliteRepository {
    file_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    /// Opens `history.sqlite3` inside `dir_path`, creating the directory and
    /// the schema if needed.
    ///
    /// # Errors
    pub async fn open<P>(dir_path: P) -> Result<Self, Error>
    where
        P: AsRef<Path> + Send,
    {
        let dir_path = dir_path.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir_path)
            .await
            .context(error::CreateDirectorySnafu { file_path: dir_path.clone() })?;

        let file_path = dir_path.join(DATABASE_FILE_NAME);
        let connection = tokio::task::spawn_blocking({
            let file_path = file_path.clone();
            move || {
                let connection = Connection::open(&file_path)
                    .context(error::OpenDatabaseSnafu { file_path: file_path.clone() })?;
                init_schema(&connection).context(error::OpenDatabaseSnafu { file_path })?;
                Ok::<_, Error>(connection)
            }
        })
        .await
        .context(error::JoinTaskSnafu)??;

        tracing::info!("Open history database `{}`", file_path.display());
        Ok(Self { file_path, connection: Arc::new(Mutex::new(connection)) })
    }

    /// Database held in memory, used for tests.
    ///
    /// # Errors
    pub fn open_in_memory() -> Result<Self, Error> {
        let file_path = PathBuf::from(":memory:");
        let connection = Connection::open_in_memory()
            .context(error::OpenDatabaseSnafu { file_path: file_path.clone() })?;
        init_schema(&connection).context(error::OpenDatabaseSnafu { file_path: file_path.clone() })?;
        Ok(Self { file_path, connection: Arc::new(Mutex::new(connection)) })
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path { &self.file_path }

    async fn with_connection<F, T>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || f(&connection.lock()))
            .await
            .context(error::JoinTaskSnafu)?
    }

    async fn upsert(&self, entry: &ClipEntry) -> Result<(), Error> {
        let row = Row::from_entry(entry)?;
        self.with_connection(move |connection| {
            let _ = connection
                .execute(
                    "INSERT INTO entries (id, fingerprint, kind, created_at, is_favorite, data)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(id) DO UPDATE SET
                        created_at = excluded.created_at,
                        is_favorite = excluded.is_favorite",
                    params![
                        row.id,
                        row.fingerprint,
                        row.kind,
                        row.created_at,
                        row.is_favorite,
                        row.data
                    ],
                )
                .context(error::ExecuteStatementSnafu)?;
            Ok(())
        })
        .await
    }
}

fn init_schema(connection: &Connection) -> rusqlite::Result<()> {
    connection.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;

         CREATE TABLE IF NOT EXISTS entries (
            id          INTEGER PRIMARY KEY,
            fingerprint TEXT    NOT NULL,
            kind        INTEGER NOT NULL,
            created_at  INTEGER NOT NULL,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            data        BLOB    NOT NULL
         );

         CREATE INDEX IF NOT EXISTS idx_entries_created_at ON entries(created_at DESC);
         CREATE INDEX IF NOT EXISTS idx_entries_fingerprint ON entries(fingerprint);",
    )
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&mut self, entry: &ClipEntry) -> Result<(), Error> { self.upsert(entry).await }

    async fn update(&mut self, entry: &ClipEntry) -> Result<(), Error> { self.upsert(entry).await }

    async fn delete(&mut self, id: EntryId) -> Result<(), Error> {
        let row_id = i64::try_from(id.value()).ok().context(error::IdOutOfRangeSnafu { id })?;
        self.with_connection(move |connection| {
            let _ = connection
                .execute("DELETE FROM entries WHERE id = ?1", params![row_id])
                .context(error::ExecuteStatementSnafu)?;
            Ok(())
        })
        .await
    }

    async fn list_all(&mut self) -> Result<Vec<ClipEntry>, Error> {
        let rows = self
            .with_connection(|connection| {
                let mut statement = connection
                    .prepare(
                        "SELECT id, fingerprint, kind, created_at, is_favorite, data
                         FROM entries ORDER BY created_at DESC, id DESC",
                    )
                    .context(error::ExecuteStatementSnafu)?;
                let rows = statement
                    .query_map([], |row| {
                        Ok(Row {
                            id: row.get(0)?,
                            fingerprint: row.get(1)?,
                            kind: row.get(2)?,
                            created_at: row.get(3)?,
                            is_favorite: row.get(4)?,
                            data: row.get(5)?,
                        })
                    })
                    .context(error::ExecuteStatementSnafu)?
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .context(error::ExecuteStatementSnafu)?;
                Ok(rows)
            })
            .await?;

        Ok(rows.into_iter().filter_map(Row::into_entry).collect())
    }
}

struct Row {
    id: i64,
    fingerprint: String,
    kind: u8,
    created_at: i64,
    is_favorite: bool,
    data: Vec<u8>,
}

impl Row {
    fn from_entry(entry: &ClipEntry) -> Result<Self, Error> {
        let id = entry.id();
        Ok(Self {
            id: i64::try_from(id.value()).ok().context(error::IdOutOfRangeSnafu { id })?,
            fingerprint: entry.fingerprint().to_hex(),
            kind: entry.kind().tag(),
            created_at: i64::try_from(entry.created_at().unix_timestamp_nanos())
                .ok()
                .context(error::TimestampOutOfRangeSnafu { id })?,
            is_favorite: entry.is_favorite(),
            data: entry.payload_bytes().into_owned(),
        })
    }

    // unreadable rows are skipped so one bad row never hides the rest
    fn into_entry(self) -> Option<ClipEntry> {
        let Self { id, fingerprint, kind, created_at, is_favorite, data } = self;
        let Ok(id) = u64::try_from(id).map(EntryId::new) else {
            tracing::warn!("Skip history row with negative id {id}");
            return None;
        };
        let Ok(kind) = ContentKind::try_from(kind) else {
            tracing::warn!("Skip history row {id} with unknown content kind {kind}");
            return None;
        };
        let Ok(created_at) = OffsetDateTime::from_unix_timestamp_nanos(i128::from(created_at))
        else {
            tracing::warn!("Skip history row {id} with invalid timestamp {created_at}");
            return None;
        };
        match ClipEntry::restore(id, kind, &data, created_at, is_favorite) {
            Ok(entry) => {
                if entry.fingerprint().to_hex() != fingerprint {
                    tracing::debug!("Fingerprint of history row {id} is recomputed");
                }
                Some(entry)
            }
            Err(err) => {
                tracing::warn!("Skip history row {id}, error: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cliptrail_base::{ClipEntry, ContentKind, EntryId};
    use time::{macros::datetime, Duration};

    use super::SqliteRepository;
    use crate::history::Repository;

    fn entry(id: u64, text: &str, step: i64) -> ClipEntry {
        let at = datetime!(2024-01-01 0:00 UTC) + Duration::seconds(step);
        ClipEntry::restore(EntryId::new(id), ContentKind::Text, text.as_bytes(), at, false).unwrap()
    }

    #[tokio::test]
    async fn test_insert_update_delete_list() {
        let mut repository = SqliteRepository::open_in_memory().unwrap();
        repository.insert(&entry(1, "a", 0)).await.unwrap();
        repository.insert(&entry(2, "b", 1)).await.unwrap();

        let listed = repository.list_all().await.unwrap();
        assert_eq!(listed.iter().map(ClipEntry::id).collect::<Vec<_>>(), [EntryId::new(2), EntryId::new(1)]);

        let mut bumped = entry(1, "a", 5);
        bumped.set_favorite(true);
        repository.update(&bumped).await.unwrap();
        let listed = repository.list_all().await.unwrap();
        assert_eq!(listed[0], bumped);

        repository.delete(EntryId::new(1)).await.unwrap();
        repository.delete(EntryId::new(1)).await.unwrap();
        assert_eq!(repository.list_all().await.unwrap(), [entry(2, "b", 1)]);
    }

    #[tokio::test]
    async fn test_reopen_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut repository = SqliteRepository::open(dir.path()).await.unwrap();
            repository.insert(&entry(9, "persisted", 0)).await.unwrap();
        }
        let mut repository = SqliteRepository::open(dir.path()).await.unwrap();
        assert_eq!(repository.list_all().await.unwrap(), [entry(9, "persisted", 0)]);
    }
}
