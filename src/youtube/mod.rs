//! YouTube lookups and media retrieval.
//!
//! - [`YoutubeSearch`] queries the YouTube Data API v3 and backs the primary
//!   search tier. It needs an API key per call.
//! - [`YtDlp`] drives the `yt-dlp` binary. It backs the fallback search tier
//!   and performs every media download.

pub mod search;
pub mod ytdlp;

pub use search::YoutubeSearch;
pub use ytdlp::YtDlp;

pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}
