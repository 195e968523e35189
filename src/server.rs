use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio_util::sync::CancellationToken;

use crate::{Res, api, config, info, pipeline::Orchestrator};

pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/", get(api::index).post(api::submit_playlist))
        .route("/files/{user_id}", get(api::list_files))
        .route("/files/{user_id}/download_all", get(api::download_all))
        .route("/health", get(api::health))
        .layer(Extension(orchestrator))
}

/// Serves the API until `shutdown` is cancelled.
pub async fn start_api_server(
    orchestrator: Arc<Orchestrator>,
    shutdown: CancellationToken,
) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
