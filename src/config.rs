//! Configuration management for the playlist downloader.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Every setting has one accessor;
//! optional settings fall back to a default, required ones return an error
//! naming the missing variable.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use chrono::TimeDelta;

use crate::{error::AcquireError, management::RetentionPolicy, retry::RetryExecutor, utils};

/// Loads environment variables from `.env` files.
///
/// Reads `./.env` first and then `tunegrab/.env` in the platform-specific
/// local data directory:
/// - Linux: `~/.local/share/tunegrab/.env`
/// - macOS: `~/Library/Application Support/tunegrab/.env`
/// - Windows: `%LOCALAPPDATA%/tunegrab/.env`
///
/// Variables already present in the environment are never overwritten, and a
/// missing file is not an error.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunegrab/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    for candidate in [PathBuf::from(".env"), path] {
        if candidate.is_file() {
            dotenv::from_path(&candidate)
                .map_err(|e| format!("{}: {}", candidate.display(), e))?;
        }
    }

    Ok(())
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required(name: &str) -> Result<String, AcquireError> {
    optional(name).ok_or_else(|| AcquireError::Config(format!("{} must be set", name)))
}

fn parsed<T: FromStr>(name: &str, default: T) -> Result<T, AcquireError> {
    match optional(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AcquireError::Config(format!("{} has an invalid value '{}'", name, raw))),
        None => Ok(default),
    }
}

/// Address the HTTP server binds to, e.g. `0.0.0.0:8080`.
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string())
}

/// Storage root holding one directory per session.
pub fn download_root() -> PathBuf {
    optional("DOWNLOAD_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./downloads"))
}

pub fn spotify_client_id() -> Result<String, AcquireError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// The client secret should be kept confidential and never exposed in logs.
pub fn spotify_client_secret() -> Result<String, AcquireError> {
    required("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL").unwrap_or_else(|| "https://api.spotify.com/v1".to_string())
}

pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL")
        .unwrap_or_else(|| "https://accounts.spotify.com/api/token".to_string())
}

/// YouTube Data API keys, comma separated. One is picked at random per call.
pub fn youtube_api_keys() -> Vec<String> {
    optional("YOUTUBE_API_KEYS")
        .map(|raw| utils::parse_key_list(&raw))
        .unwrap_or_default()
}

pub fn youtube_apiurl() -> String {
    optional("YOUTUBE_API_URL")
        .unwrap_or_else(|| "https://www.googleapis.com/youtube/v3".to_string())
}

pub fn ytdlp_path() -> String {
    optional("YTDLP_PATH").unwrap_or_else(|| "yt-dlp".to_string())
}

pub fn ffmpeg_path() -> String {
    optional("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string())
}

/// Retry settings from `RETRY_MAX_ATTEMPTS`, `RETRY_BACKOFF_BASE` and
/// `RETRY_JITTER`.
pub fn retry() -> Result<RetryExecutor, AcquireError> {
    let max_attempts = parsed("RETRY_MAX_ATTEMPTS", crate::retry::DEFAULT_MAX_ATTEMPTS)?;
    let backoff_base = parsed("RETRY_BACKOFF_BASE", crate::retry::DEFAULT_BACKOFF_BASE)?;
    let jitter = match optional("RETRY_JITTER") {
        Some(raw) => utils::parse_bool(&raw).ok_or_else(|| {
            AcquireError::Config(format!("RETRY_JITTER has an invalid value '{}'", raw))
        })?,
        None => true,
    };

    Ok(RetryExecutor::new(max_attempts, backoff_base, jitter))
}

/// Retention settings from `RETENTION_MAX_AGE_DAYS` and
/// `RETENTION_SWEEP_INTERVAL_SECS`.
pub fn retention() -> Result<RetentionPolicy, AcquireError> {
    let defaults = RetentionPolicy::default();
    let days: i64 = parsed("RETENTION_MAX_AGE_DAYS", defaults.max_age.num_days())?;
    let interval: u64 = parsed(
        "RETENTION_SWEEP_INTERVAL_SECS",
        defaults.interval.as_secs(),
    )?;

    let max_age = TimeDelta::try_days(days)
        .filter(|age| *age >= TimeDelta::zero())
        .ok_or_else(|| {
            AcquireError::Config(format!("RETENTION_MAX_AGE_DAYS out of range: {}", days))
        })?;

    Ok(RetentionPolicy {
        max_age,
        interval: Duration::from_secs(interval.max(1)),
    })
}
