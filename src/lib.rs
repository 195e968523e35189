//! Playlist Downloader Library
//!
//! This library turns a Spotify playlist into a folder of MP3 files. Playlist
//! membership comes from the Spotify Web API, each track is located on YouTube
//! (Data API first, `yt-dlp` search as fallback), downloaded with `yt-dlp` and
//! transcoded with `ffmpeg`. Every request gets its own session directory, and a
//! background sweeper reclaims files once they exceed the retention age.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the playlist form, file listing and archive download
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - The crate-wide error type
//! - `management` - Session storage and the retention sweeper
//! - `media` - Audio transcoding through `ffmpeg`
//! - `pipeline` - Catalog resolution, source location, acquisition and orchestration
//! - `retry` - Bounded retry with exponential backoff and jitter
//! - `server` - HTTP server wiring
//! - `spotify` - Spotify Web API catalog client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `youtube` - YouTube Data API search and `yt-dlp` integration
//!
//! # Example
//!
//! ```
//! use tunegrab::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> tunegrab::Res<()> {
//!     config::load_env().await?;
//!     cli::serve().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod media;
pub mod pipeline;
pub mod retry;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod youtube;

/// A convenient Result type alias for operations that may fail.
///
/// Used by top-level glue (configuration loading, server startup) where the
/// concrete error type does not matter. Pipeline code returns
/// [`error::AcquireError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message.
///
/// # Example
///
/// ```
/// info!("Fetched {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Converted {} to MP3", query);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used from the binary entry points for unrecoverable startup errors.
/// Library code reports failures through [`error::AcquireError`] instead.
///
/// # Example
///
/// ```
/// error!("Failed to bind {}", addr);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems: retried calls, skipped tracks, files the
/// sweeper could not remove.
///
/// # Example
///
/// ```
/// warning!("Failed to download {}: {}", query, e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
