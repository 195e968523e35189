use std::{fmt, io::Error};

/// Errors produced while turning a playlist into audio files.
///
/// The first group of variants are the domain failures callers act on; the
/// rest wrap lower level errors so they can be propagated with `?`.
#[derive(Debug)]
pub enum AcquireError {
    /// The playlist reference did not contain a usable identifier.
    InvalidPlaylistReference(String),
    /// An operation failed on every attempt the retry budget allowed.
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },
    /// Playlist resolution failed entirely.
    CatalogUnavailable(String),
    /// Neither search tier produced a playable URL.
    SourceNotFound(String),
    DownloadFailed(String),
    TranscodeFailed(String),
    /// The session directory does not exist (never created or already swept).
    SessionNotFound(String),
    Config(String),
    /// An external tool (`yt-dlp`, `ffmpeg`) exited unsuccessfully.
    Tool(String),
    IoError(Error),
    HttpError(reqwest::Error),
    SerdeError(serde_json::Error),
    ZipError(zip::result::ZipError),
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireError::InvalidPlaylistReference(reference) => {
                write!(f, "Invalid playlist reference: '{}'", reference)
            }
            AcquireError::RetriesExhausted {
                operation,
                attempts,
                last_error,
            } => write!(
                f,
                "{} failed after {} attempts: {}",
                operation, attempts, last_error
            ),
            AcquireError::CatalogUnavailable(e) => write!(f, "Playlist unavailable: {}", e),
            AcquireError::SourceNotFound(query) => write!(f, "No source found for '{}'", query),
            AcquireError::DownloadFailed(e) => write!(f, "Download failed: {}", e),
            AcquireError::TranscodeFailed(e) => write!(f, "Transcode failed: {}", e),
            AcquireError::SessionNotFound(id) => write!(f, "Session {} not found", id),
            AcquireError::Config(e) => write!(f, "Configuration error: {}", e),
            AcquireError::Tool(e) => write!(f, "{}", e),
            AcquireError::IoError(e) => write!(f, "{}", e),
            AcquireError::HttpError(e) => write!(f, "{}", e),
            AcquireError::SerdeError(e) => write!(f, "{}", e),
            AcquireError::ZipError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AcquireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AcquireError::IoError(e) => Some(e),
            AcquireError::HttpError(e) => Some(e),
            AcquireError::SerdeError(e) => Some(e),
            AcquireError::ZipError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for AcquireError {
    fn from(err: Error) -> Self {
        AcquireError::IoError(err)
    }
}

impl From<reqwest::Error> for AcquireError {
    fn from(err: reqwest::Error) -> Self {
        AcquireError::HttpError(err)
    }
}

impl From<serde_json::Error> for AcquireError {
    fn from(err: serde_json::Error) -> Self {
        AcquireError::SerdeError(err)
    }
}

impl From<zip::result::ZipError> for AcquireError {
    fn from(err: zip::result::ZipError) -> Self {
        AcquireError::ZipError(err)
    }
}
