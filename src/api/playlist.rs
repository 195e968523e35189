use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    api::error_response,
    error::AcquireError,
    pipeline::Orchestrator,
    types::{SubmitPlaylistForm, SubmitPlaylistResponse},
    warning,
};

pub async fn index() -> Html<&'static str> {
    Html(
        r#"<form method="POST">
    Spotify Playlist URL: <input type="text" name="playlist_url">
    <button type="submit">Download</button>
</form>"#,
    )
}

pub async fn submit_playlist(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Form(form): Form<SubmitPlaylistForm>,
) -> Response {
    match orchestrator.submit(&form.playlist_url).await {
        Ok(report) => Json(SubmitPlaylistResponse {
            status: "success",
            downloaded: report.downloaded(),
            skipped: report.skipped(),
            user_id: report.session_id,
            message: "Download complete!",
            tracks: report.outcomes,
        })
        .into_response(),
        Err(e @ AcquireError::InvalidPlaylistReference(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ AcquireError::CatalogUnavailable(_)) => {
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            warning!("Playlist request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
