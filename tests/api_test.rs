mod common;

use std::{fs, io::Cursor, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use common::*;
use serde_json::Value;
use tower::ServiceExt;
use tunegrab::server::router;

fn app(fakes: &Fakes, root: &std::path::Path) -> Router {
    router(Arc::new(fakes.orchestrator(root)))
}

fn submit_request(playlist_url: &str) -> Request<Body> {
    let form = format!("playlist_url={}", form_encode(playlist_url));
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_index_serves_form() {
    let root = tempfile::tempdir().unwrap();
    let response = app(&two_track_fakes(), root.path())
        .oneshot(get("/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("name=\"playlist_url\""));
}

#[tokio::test]
async fn test_submit_returns_session_and_outcomes() {
    let root = tempfile::tempdir().unwrap();
    let response = app(&two_track_fakes(), root.path())
        .oneshot(submit_request(PLAYLIST_URL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Download complete!");
    assert_eq!(body["downloaded"], 1);
    assert_eq!(body["skipped"], 1);

    let user_id = body["user_id"].as_str().unwrap();
    assert!(root.path().join(user_id).is_dir());

    let tracks = body["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["title"], "Song A");
    assert_eq!(tracks[0]["artist"], "Artist X");
    assert_eq!(tracks[0]["status"], "downloaded");
    assert_eq!(tracks[0]["file"], "Song A Artist X.mp3");
    assert_eq!(tracks[1]["status"], "skipped");
    assert_eq!(tracks[1]["reason"], "source_not_found");
}

#[tokio::test]
async fn test_submit_invalid_reference_is_bad_request() {
    let root = tempfile::tempdir().unwrap();
    let response = app(&two_track_fakes(), root.path())
        .oneshot(submit_request("not a playlist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert!(fs::read_dir(root.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_submit_unreachable_catalog_is_bad_gateway() {
    let root = tempfile::tempdir().unwrap();
    let fakes = Fakes::new(
        FakeCatalog::failing(),
        FakeSearch::default(),
        FakeExtractor::default(),
    );

    let response = app(&fakes, root.path())
        .oneshot(submit_request(PLAYLIST_URL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(response).await["status"], "error");
}

#[tokio::test]
async fn test_list_files_after_submit() {
    let root = tempfile::tempdir().unwrap();
    let app = app(&two_track_fakes(), root.path());

    let response = app
        .clone()
        .oneshot(submit_request(PLAYLIST_URL))
        .await
        .unwrap();
    let user_id = json_body(response).await["user_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(get(&format!("/files/{}", user_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["files"], serde_json::json!(["Song A Artist X.mp3"]));
}

#[tokio::test]
async fn test_download_all_returns_zip_attachment() {
    let root = tempfile::tempdir().unwrap();
    let fakes = two_track_fakes();
    let orchestrator = Arc::new(fakes.orchestrator(root.path()));
    let report = orchestrator.submit(PLAYLIST_URL).await.unwrap();

    let response = router(orchestrator)
        .oneshot(get(&format!("/files/{}/download_all", report.session_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/zip"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{}_songs.zip\"", report.session_id).as_str()
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    assert_eq!(zip.len(), 1);
    assert!(zip.by_name("Song A Artist X.mp3").is_ok());
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    let app = app(&two_track_fakes(), root.path());

    for uri in [
        "/files/4f1c2e6a-1b2c-4d3e-8f9a-0b1c2d3e4f5a",
        "/files/4f1c2e6a-1b2c-4d3e-8f9a-0b1c2d3e4f5a/download_all",
        "/files/not-a-session",
        "/files/..%2F..%2Fetc/download_all",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body = json_body(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "No files found for this user.");
    }
}

#[tokio::test]
async fn test_swept_session_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    let fakes = two_track_fakes();
    let orchestrator = Arc::new(fakes.orchestrator(root.path()));
    let report = orchestrator.submit(PLAYLIST_URL).await.unwrap();
    fs::remove_dir_all(root.path().join(&report.session_id)).unwrap();

    let response = router(orchestrator)
        .oneshot(get(&format!("/files/{}", report.session_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let root = tempfile::tempdir().unwrap();
    let response = app(&two_track_fakes(), root.path())
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "tunegrab");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn test_health_counts_sessions() {
    let root = tempfile::tempdir().unwrap();
    let fakes = two_track_fakes();
    let orchestrator = Arc::new(fakes.orchestrator(root.path()));
    orchestrator.submit(PLAYLIST_URL).await.unwrap();

    let response = router(orchestrator).oneshot(get("/health")).await.unwrap();

    assert_eq!(json_body(response).await["sessions"], 1);
}
