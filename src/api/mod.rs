//! # API Module
//!
//! HTTP endpoints of the playlist downloader. A user submits a playlist URL,
//! receives a session id, and later lists or downloads the files of that
//! session.
//!
//! ## Endpoints
//!
//! ### Playlist submission
//!
//! - [`index`] - `GET /`, a minimal HTML form with a `playlist_url` field.
//! - [`submit_playlist`] - `POST /`, runs the whole playlist before answering.
//!   The success envelope carries the session id (`user_id`) and the outcome
//!   of every track. Only an invalid reference (400) or a playlist that cannot
//!   be resolved (502) produce an error envelope.
//!
//! ### Session files
//!
//! - [`list_files`] - `GET /files/{user_id}`, the finished MP3 names.
//! - [`download_all`] - `GET /files/{user_id}/download_all`, a zip of every MP3.
//!
//! Both answer 404 with `{"status": "error", ...}` when the session does not
//! exist or was already removed by the retention sweeper.
//!
//! ### Monitoring
//!
//! - [`health`] - status and version information.
//!
//! ## Shared State
//!
//! Handlers receive the [`Orchestrator`](crate::pipeline::Orchestrator) through
//! an `Extension` layer; the session store is reached through it.

mod files;
mod health;
mod playlist;

pub use files::download_all;
pub use files::list_files;
pub use health::health;
pub use playlist::index;
pub use playlist::submit_playlist;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::types::ErrorResponse;

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            status: "error",
            message: message.into(),
        }),
    )
        .into_response()
}
