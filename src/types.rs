use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistId(pub String);

impl PlaylistId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YoutubeSearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeSearchItem {
    pub id: YoutubeResourceId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeResourceId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtDlpSearchResult {
    #[serde(default)]
    pub entries: Vec<YtDlpEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtDlpEntry {
    pub url: Option<String>,
    pub webpage_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub url: String,
    pub tier: Tier,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SourceNotFound,
    DownloadFailed,
    TranscodeFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackStatus {
    Downloaded { file: String },
    Skipped { reason: SkipReason, detail: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackOutcome {
    #[serde(flatten)]
    pub track: Track,
    pub query: String,
    #[serde(flatten)]
    pub status: TrackStatus,
}

impl TrackOutcome {
    pub fn is_downloaded(&self) -> bool {
        matches!(self.status, TrackStatus::Downloaded { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AcquisitionReport {
    pub session_id: String,
    pub outcomes: Vec<TrackOutcome>,
}

impl AcquisitionReport {
    pub fn downloaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_downloaded()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.downloaded()
    }
}

#[derive(Debug, Clone)]
pub struct Archive {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: String,
    pub files: usize,
    pub newest: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub deleted_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub failures: Vec<String>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub track: String,
    pub status: String,
    pub detail: String,
}

#[derive(Tabled)]
pub struct SessionTableRow {
    pub session: String,
    pub files: usize,
    pub newest: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPlaylistForm {
    pub playlist_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitPlaylistResponse {
    pub status: &'static str,
    pub user_id: String,
    pub message: &'static str,
    pub downloaded: usize,
    pub skipped: usize,
    pub tracks: Vec<TrackOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListFilesResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}
