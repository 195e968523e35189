//! # Acquisition Pipeline
//!
//! Turns a playlist reference into MP3 files inside a session directory.
//!
//! ```text
//! Orchestrator
//!     ├── CatalogResolver  → CatalogClient   (Spotify)
//!     ├── SourceLocator    → SearchProvider  (YouTube Data API, primary)
//!     │                    → MediaExtractor  (yt-dlp search, fallback)
//!     ├── MediaAcquirer    → MediaExtractor  (yt-dlp download)
//!     │                    → Transcoder      (ffmpeg)
//!     └── SessionStore
//! ```
//!
//! The traits below are the seams to the outside world. Production
//! implementations live in [`crate::spotify`], [`crate::youtube`] and
//! [`crate::media`]; tests plug in in-memory fakes.

mod acquirer;
mod locator;
mod orchestrator;
mod resolver;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

pub use acquirer::{MediaAcquirer, ScratchFile, is_partial_of};
pub use locator::SourceLocator;
pub use orchestrator::{Orchestrator, Progress};
pub use resolver::CatalogResolver;

use crate::{
    error::AcquireError,
    types::{PlaylistId, PlaylistPage},
};

/// One page of a playlist, either the first (`next == None`) or the page
/// behind a `next` link returned earlier.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_page(
        &self,
        playlist_id: &PlaylistId,
        next: Option<&str>,
    ) -> Result<PlaylistPage, AcquireError>;
}

/// Credentialed search returning video ids, best match first.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, api_key: &str) -> Result<Vec<String>, AcquireError>;
}

#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Site search returning directly playable URLs, best match first.
    async fn search(&self, query: &str) -> Result<Vec<String>, AcquireError>;

    /// Writes the best available audio stream for `url` to
    /// `<dir>/<stem>.<container>` and returns the path written.
    async fn download(&self, url: &str, dir: &Path, stem: &str) -> Result<PathBuf, AcquireError>;
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn to_mp3(&self, input: &Path, output: &Path) -> Result<(), AcquireError>;
}
