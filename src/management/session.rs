use std::{
    io::{Cursor, ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use uuid::Uuid;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    error::AcquireError,
    types::{Archive, Session, SessionSummary},
    utils, warning,
};

/// Owns the storage root and the per-session directories below it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocates a new session id and creates its directory.
    pub async fn create(&self) -> Result<Session, AcquireError> {
        let id = Uuid::new_v4().to_string();
        let dir = self.root.join(&id);
        async_fs::create_dir_all(&dir).await?;

        Ok(Session { id, dir })
    }

    /// Maps a session id to its directory without touching the filesystem.
    ///
    /// Only canonical UUIDs are accepted, so an id can never point outside the
    /// storage root.
    pub fn session_dir(&self, session_id: &str) -> Result<PathBuf, AcquireError> {
        match Uuid::parse_str(session_id) {
            Ok(uuid) if uuid.to_string() == session_id => Ok(self.root.join(session_id)),
            _ => Err(AcquireError::SessionNotFound(session_id.to_string())),
        }
    }

    async fn existing_dir(&self, session_id: &str) -> Result<PathBuf, AcquireError> {
        let dir = self.session_dir(session_id)?;
        match async_fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(AcquireError::SessionNotFound(session_id.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AcquireError::SessionNotFound(session_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Names of the finished MP3 files of a session, sorted.
    pub async fn list_completed(&self, session_id: &str) -> Result<Vec<String>, AcquireError> {
        let dir = self.existing_dir(session_id).await?;
        let mut files = mp3_files(&dir).await?;
        files.sort();
        Ok(files)
    }

    /// Packs every MP3 of a session into an in-memory zip archive.
    ///
    /// The source files stay in place. A file removed by the retention sweeper
    /// while the archive is being built is left out.
    pub async fn archive_all(&self, session_id: &str) -> Result<Archive, AcquireError> {
        let dir = self.existing_dir(session_id).await?;
        let mut names = mp3_files(&dir).await?;
        names.sort();

        let mut files: Vec<(String, Vec<u8>)> = Vec::with_capacity(names.len());
        for name in names {
            match async_fs::read(dir.join(&name)).await {
                Ok(bytes) => files.push((name, bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warning!("{} disappeared while archiving, skipping", name);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let bytes = tokio::task::spawn_blocking(move || build_zip(files))
            .await
            .map_err(|e| AcquireError::IoError(std::io::Error::other(e.to_string())))??;

        Ok(Archive {
            file_name: format!("{}_songs.zip", session_id),
            bytes,
        })
    }

    /// Every session directory under the root with its MP3 count and the
    /// modification time of its newest file.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, AcquireError> {
        let mut entries = match async_fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut sessions: Vec<SessionSummary> = Vec::new();
        while let Some(entry) = entries.next().await {
            let entry = entry?;
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => {}
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }

            let id = entry.file_name().to_string_lossy().into_owned();
            match summarize(&entry.path()).await {
                Ok((files, newest)) => sessions.push(SessionSummary { id, files, newest }),
                // swept between the root listing and this read
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        sessions.sort_by(|a, b| b.newest.cmp(&a.newest).then_with(|| a.id.cmp(&b.id)));
        Ok(sessions)
    }
}

/// MP3 count and newest modification time of one session directory. Entries
/// that disappear while the directory is read are left out.
async fn summarize(dir: &Path) -> std::io::Result<(usize, Option<DateTime<Utc>>)> {
    let mut children = async_fs::read_dir(dir).await?;
    let mut files = 0;
    let mut newest: Option<DateTime<Utc>> = None;

    while let Some(child) = children.next().await {
        let child = child?;
        let meta = match child.metadata().await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        if !meta.is_file() {
            continue;
        }

        if utils::is_mp3(&child.path()) {
            files += 1;
        }
        let modified: DateTime<Utc> = meta.modified()?.into();
        newest = newest.max(Some(modified));
    }

    Ok((files, newest))
}

async fn mp3_files(dir: &Path) -> Result<Vec<String>, AcquireError> {
    let mut entries = async_fs::read_dir(dir).await?;
    let mut files: Vec<String> = Vec::new();

    while let Some(entry) = entries.next().await {
        let entry = entry?;
        if entry.file_type().await?.is_file() && utils::is_mp3(&entry.path()) {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(files)
}

fn build_zip(files: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, AcquireError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in files {
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}
