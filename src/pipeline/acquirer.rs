use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use futures_util::StreamExt;

use crate::{
    error::AcquireError,
    info,
    pipeline::{MediaExtractor, Transcoder},
    retry::RetryExecutor,
    success,
    types::MediaSource,
    warning,
};

/// An intermediate file that is removed when the guard goes out of scope,
/// unless [`keep`](Self::keep) was called.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    keep: bool,
}

impl ScratchFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warning!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Downloads the audio behind a source URL and converts it to MP3.
pub struct MediaAcquirer {
    extractor: Arc<dyn MediaExtractor>,
    transcoder: Arc<dyn Transcoder>,
    retry: RetryExecutor,
}

impl MediaAcquirer {
    pub fn new(
        extractor: Arc<dyn MediaExtractor>,
        transcoder: Arc<dyn Transcoder>,
        retry: RetryExecutor,
    ) -> Self {
        Self {
            extractor,
            transcoder,
            retry,
        }
    }

    /// Produces `<dir>/<stem>.mp3` from `source`.
    ///
    /// The raw download is removed on every path out of this function. That
    /// includes the partial files of a download that never completed, and a
    /// partial MP3 left by a failed transcode.
    pub async fn acquire(
        &self,
        source: &MediaSource,
        stem: &str,
        dir: &Path,
    ) -> Result<PathBuf, AcquireError> {
        // the sweeper may have removed an empty session directory
        async_fs::create_dir_all(dir).await?;

        info!("Downloading {}...", stem);
        let raw = match self
            .retry
            .run("download_song", || {
                self.extractor.download(&source.url, dir, stem)
            })
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                remove_partials(dir, stem).await;
                return Err(AcquireError::DownloadFailed(e.to_string()));
            }
        };
        let raw = ScratchFile::new(raw);
        info!("Downloaded {} successfully.", stem);

        let mp3 = dir.join(format!("{}.mp3", stem));
        if raw.path() == mp3 {
            return Ok(raw.keep());
        }

        info!("Converting {} to MP3...", stem);
        if let Err(e) = self.transcoder.to_mp3(raw.path(), &mp3).await {
            if let Err(rm) = async_fs::remove_file(&mp3).await {
                if rm.kind() != std::io::ErrorKind::NotFound {
                    warning!("Failed to remove partial {}: {}", mp3.display(), rm);
                }
            }
            return Err(AcquireError::TranscodeFailed(e.to_string()));
        }

        drop(raw);
        success!("Converted {} to MP3 successfully.", stem);
        Ok(mp3)
    }
}

/// Whether `name` is something a failed download of `stem` leaves behind:
/// `<stem>.webm`, `<stem>.webm.part`, `<stem>.f251.webm.part` and the like.
/// Finished MP3s never qualify, so other tracks of the session are safe.
pub fn is_partial_of(name: &str, stem: &str) -> bool {
    let Some(rest) = name
        .strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('.'))
    else {
        return false;
    };

    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        && !rest.to_ascii_lowercase().ends_with("mp3")
}

async fn remove_partials(dir: &Path, stem: &str) {
    let mut entries = match async_fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warning!("Cannot look for partial downloads in {}: {}", dir.display(), e);
            return;
        }
    };

    while let Some(entry) = entries.next().await {
        let Ok(entry) = entry else { continue };
        if !is_partial_of(&entry.file_name().to_string_lossy(), stem) {
            continue;
        }

        let path = entry.path();
        match async_fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warning!("Failed to remove {}: {}", path.display(), e),
        }
    }
}
