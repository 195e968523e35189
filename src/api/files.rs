use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    api::error_response, error::AcquireError, pipeline::Orchestrator, types::ListFilesResponse,
    warning,
};

const NOT_FOUND_MESSAGE: &str = "No files found for this user.";

pub async fn list_files(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Path(user_id): Path<String>,
) -> Response {
    match orchestrator.store().list_completed(&user_id).await {
        Ok(files) => Json(ListFilesResponse { files }).into_response(),
        Err(e) => failure(e),
    }
}

pub async fn download_all(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Path(user_id): Path<String>,
) -> Response {
    match orchestrator.store().archive_all(&user_id).await {
        Ok(archive) => (
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", archive.file_name),
                ),
            ],
            archive.bytes,
        )
            .into_response(),
        Err(e) => failure(e),
    }
}

fn failure(e: AcquireError) -> Response {
    match e {
        AcquireError::SessionNotFound(_) => error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
        e => {
            warning!("Session request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
