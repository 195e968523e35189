//! # CLI Module
//!
//! Command implementations behind the `tunegrab` binary. Each command is an
//! async function that reports through the crate's output macros and exits
//! the process on unrecoverable errors.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the HTTP server together with the retention sweeper
//! - [`download`] - Processes one playlist from the terminal with a progress bar
//! - [`files`] - Lists the finished MP3 files of a session
//! - [`sessions`] - Shows every session under the download root
//! - [`sweep`] - Runs a single retention cycle
//!
//! ## Wiring
//!
//! The production collaborators (Spotify catalog, YouTube search, `yt-dlp`,
//! `ffmpeg`) are assembled in one place, [`build_orchestrator`], from the
//! configuration in [`crate::config`].

mod download;
mod files;
mod serve;
mod sessions;
mod sweep;

pub use download::download;
pub use files::files;
pub use serve::serve;
pub use sessions::sessions;
pub use sweep::sweep;

use std::{sync::Arc, time::Duration};

use indicatif::ProgressStyle;
use reqwest::Client;

use crate::{
    config,
    error::AcquireError,
    management::SessionStore,
    media::Ffmpeg,
    pipeline::{CatalogResolver, MediaAcquirer, Orchestrator, SourceLocator},
    spotify::SpotifyCatalog,
    warning,
    youtube::{YoutubeSearch, YtDlp},
};

/// Builds the acquisition pipeline from configuration.
pub fn build_orchestrator() -> Result<Orchestrator, AcquireError> {
    let http = Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(Duration::from_secs(30))
        .build()?;

    let retry = config::retry()?;
    let catalog = Arc::new(SpotifyCatalog::from_env(http.clone())?);
    let search = Arc::new(YoutubeSearch::new(config::youtube_apiurl(), http));
    let ytdlp = Arc::new(YtDlp::new(config::ytdlp_path()));
    let transcoder = Arc::new(Ffmpeg::new(config::ffmpeg_path()));

    let api_keys = config::youtube_api_keys();
    if api_keys.is_empty() {
        warning!("YOUTUBE_API_KEYS is not set, every search will use yt-dlp.");
    }

    Ok(Orchestrator::new(
        CatalogResolver::new(catalog, retry.clone()),
        SourceLocator::new(search, ytdlp.clone(), api_keys, retry.clone()),
        MediaAcquirer::new(ytdlp, transcoder, retry),
        SessionStore::new(config::download_root()),
    ))
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{bar:30.blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
