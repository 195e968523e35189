use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    cli, config, error, info, management::RetentionSweeper, server::start_api_server, success,
};

pub async fn serve() {
    let orchestrator = match cli::build_orchestrator() {
        Ok(o) => Arc::new(o),
        Err(e) => error!("Cannot set up the download pipeline. Err: {}", e),
    };

    let policy = match config::retention() {
        Ok(policy) => policy,
        Err(e) => error!("{}", e),
    };

    let shutdown = CancellationToken::new();
    let sweeper = RetentionSweeper::new(orchestrator.store().root(), policy)
        .spawn(shutdown.child_token());

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down...");
            signal.cancel();
        }
    });

    let result = start_api_server(orchestrator, shutdown.clone()).await;

    shutdown.cancel();
    let _ = sweeper.await;

    match result {
        Ok(()) => success!("Server stopped."),
        Err(e) => error!("Server failed. Err: {}", e),
    }
}
