mod model;

use std::{
    collections::BTreeMap,
    io::BufReader,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use cliptrail_base::{ClipEntry, ContentKind, EntryId, Fingerprint};
use snafu::ResultExt;
use time::{format_description::well_known::Rfc3339, UtcOffset};

use self::model::{ClipRecord, FileHeader};
use crate::history::{error, Error, Repository};

const CURRENT_SCHEMA: u64 = FileHeader::SCHEMA_VERSION;

/// History kept in a directory: `header.json`, a `clips` file of bincode
/// records and PNG files under `images/`.
///
/// The `clips` file is rewritten through a temporary file and renamed into
/// place, a crash never leaves a half-written history behind.
#[derive(Debug)]
pub struct FileSystemRepository {
    dir_path: PathBuf,
    records: BTreeMap<EntryId, ClipRecord>,
}

impl FileSystemRepository {
    /// # Errors
    pub async fn open<P>(dir_path: P) -> Result<Self, Error>
    where
        P: AsRef<Path> + Send,
    {
        let dir_path = dir_path.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir_path)
            .await
            .context(error::CreateDirectorySnafu { file_path: dir_path.clone() })?;

        let header_file_path = header_file_path(&dir_path);
        match tokio::fs::read(&header_file_path).await {
            Ok(content) => {
                let FileHeader { schema, last_update } = serde_json::from_slice(&content)
                    .context(error::DeserializeHistoryHeaderSnafu)?;
                if schema > CURRENT_SCHEMA {
                    return Err(Error::NewerSchema { new: schema, current: CURRENT_SCHEMA });
                }
                tracing::info!(
                    "Open `{}`, schema: {schema}, last update: {last_update}",
                    header_file_path.display(),
                    last_update = last_update
                        .to_offset(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
                        .format(&Rfc3339)
                        .unwrap_or_default()
                );
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Create history in `{}`", dir_path.display());
            }
            Err(source) => {
                return Err(Error::ReadFile { source, file_path: header_file_path });
            }
        }

        let records = load_records(clips_file_path(&dir_path)).await?;
        Ok(Self { dir_path, records })
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path { &self.dir_path }

    async fn put(&mut self, entry: &ClipEntry) -> Result<(), Error> {
        if entry.kind() == ContentKind::Image {
            self.store_image(entry).await?;
        }
        let _ = self.records.insert(entry.id(), ClipRecord::from(entry));
        self.flush().await
    }

    async fn store_image(&self, entry: &ClipEntry) -> Result<(), Error> {
        let file_path = image_file_path(&self.dir_path, &entry.fingerprint());
        if tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
            return Ok(());
        }
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context(error::CreateDirectorySnafu { file_path: parent.to_path_buf() })?;
        }
        write_atomically(&file_path, &entry.payload_bytes()).await
    }

    async fn flush(&self) -> Result<(), Error> {
        let mut buffer = Vec::with_capacity(self.records.len() * 64);
        for record in self.records.values() {
            bincode::serialize_into(&mut buffer, record).context(error::SerializeEntrySnafu)?;
        }
        write_atomically(&clips_file_path(&self.dir_path), &buffer).await?;

        let header = serde_json::to_vec_pretty(&FileHeader::now())
            .context(error::SerializeHistoryHeaderSnafu)?;
        write_atomically(&header_file_path(&self.dir_path), &header).await
    }
}

#[async_trait]
impl Repository for FileSystemRepository {
    async fn insert(&mut self, entry: &ClipEntry) -> Result<(), Error> { self.put(entry).await }

    async fn update(&mut self, entry: &ClipEntry) -> Result<(), Error> { self.put(entry).await }

    async fn delete(&mut self, id: EntryId) -> Result<(), Error> {
        let Some(record) = self.records.remove(&id) else {
            return Ok(());
        };
        self.flush().await?;

        if record.kind == ContentKind::Image {
            if let Ok(fingerprint) = Fingerprint::from_slice(&record.data) {
                let file_path = image_file_path(&self.dir_path, &fingerprint);
                tracing::debug!("Remove image file `{}`", file_path.display());
                match tokio::fs::remove_file(&file_path).await {
                    Ok(()) => {}
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(source) => return Err(Error::RemoveFile { source, file_path }),
                }
            }
        }
        Ok(())
    }

    async fn list_all(&mut self) -> Result<Vec<ClipEntry>, Error> {
        let mut entries = Vec::with_capacity(self.records.len());
        for record in self.records.values() {
            let data = if record.kind == ContentKind::Image {
                let Ok(fingerprint) = Fingerprint::from_slice(&record.data) else {
                    tracing::warn!("Skip image entry {} with a malformed fingerprint", record.id);
                    continue;
                };
                let file_path = image_file_path(&self.dir_path, &fingerprint);
                match tokio::fs::read(&file_path).await {
                    Ok(data) => data,
                    Err(err) => {
                        tracing::error!("Failed to read `{}`, error: {err}", file_path.display());
                        continue;
                    }
                }
            } else {
                record.data.clone()
            };

            let ClipRecord { id, kind, created_at, is_favorite, .. } = *record;
            match ClipEntry::restore(id, kind, &data, created_at, is_favorite) {
                Ok(entry) => entries.push(entry),
                Err(err) => tracing::warn!("Skip history entry {}, error: {err}", record.id),
            }
        }
        entries.sort_unstable();
        Ok(entries)
    }
}

async fn load_records(clips_file_path: PathBuf) -> Result<BTreeMap<EntryId, ClipRecord>, Error> {
    let file = match std::fs::File::open(&clips_file_path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => return Err(Error::ReadFile { source, file_path: clips_file_path }),
    };

    tokio::task::spawn_blocking(move || {
        let mut reader = BufReader::new(file);
        let mut records = BTreeMap::new();
        // reading stops at the first truncated or unreadable record
        while let Ok(record) = bincode::deserialize_from::<_, ClipRecord>(&mut reader) {
            let _ = records.insert(record.id, record);
        }
        records
    })
    .await
    .context(error::JoinTaskSnafu)
}

async fn write_atomically(file_path: &Path, content: &[u8]) -> Result<(), Error> {
    let temp_file_path = file_path.with_extension("tmp");
    tokio::fs::write(&temp_file_path, content)
        .await
        .context(error::WriteFileSnafu { file_path: temp_file_path.clone() })?;
    tokio::fs::rename(&temp_file_path, file_path)
        .await
        .context(error::RenameFileSnafu { file_path: file_path.to_path_buf() })
}

fn header_file_path<P>(dir_path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    dir_path.as_ref().join("header.json")
}

fn clips_file_path<P>(dir_path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    dir_path.as_ref().join("clips")
}

#[inline]
fn image_file_path<P>(dir_path: P, fingerprint: &Fingerprint) -> PathBuf
where
    P: AsRef<Path>,
{
    [dir_path.as_ref(), Path::new("images"), Path::new(&format!("{fingerprint}.png"))]
        .iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use cliptrail_base::{ClipEntry, ContentKind, EntryId};
    use time::{macros::datetime, Duration};

    use super::{image_file_path, FileSystemRepository};
    use crate::history::Repository;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really pixels";

    fn entry(id: u64, kind: ContentKind, data: &[u8], step: i64) -> ClipEntry {
        let at = datetime!(2024-01-01 0:00 UTC) + Duration::seconds(step);
        ClipEntry::restore(EntryId::new(id), kind, data, at, false).unwrap()
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let text = entry(1, ContentKind::Text, b"hello", 0);
        let image = entry(2, ContentKind::Image, PNG, 1);
        let files = entry(3, ContentKind::FileList, b"/tmp/a\0/tmp/b", 2);
        {
            let mut repository = FileSystemRepository::open(dir.path()).await.unwrap();
            repository.insert(&text).await.unwrap();
            repository.insert(&image).await.unwrap();
            repository.insert(&files).await.unwrap();
        }

        assert!(image_file_path(dir.path(), &image.fingerprint()).exists());
        assert!(dir.path().join("header.json").exists());
        assert!(!dir.path().join("clips.tmp").exists());

        let mut repository = FileSystemRepository::open(dir.path()).await.unwrap();
        let listed = repository.list_all().await.unwrap();
        assert_eq!(listed, [files, image, text]);
        assert_eq!(listed[1].payload_bytes().as_ref(), PNG);
        assert_eq!(
            listed[0].copy_back(),
            cliptrail_base::ClipboardPayload::FileList(vec![
                PathBuf::from("/tmp/a"),
                PathBuf::from("/tmp/b")
            ])
        );
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut repository = FileSystemRepository::open(dir.path()).await.unwrap();
        let image = entry(1, ContentKind::Image, PNG, 0);
        repository.insert(&image).await.unwrap();

        let mut favorite = entry(1, ContentKind::Image, PNG, 3);
        favorite.set_favorite(true);
        repository.update(&favorite).await.unwrap();
        assert_eq!(repository.list_all().await.unwrap(), [favorite]);

        repository.delete(EntryId::new(1)).await.unwrap();
        repository.delete(EntryId::new(1)).await.unwrap();
        assert!(repository.list_all().await.unwrap().is_empty());
        assert!(!image_file_path(dir.path(), &image.fingerprint()).exists());
    }

    #[tokio::test]
    async fn test_refuse_newer_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("header.json"),
            r#"{"schema": 99, "last_update": "2024-01-01T00:00:00.000000000Z"}"#,
        )
        .unwrap();
        assert!(FileSystemRepository::open(dir.path()).await.is_err());
    }
}
