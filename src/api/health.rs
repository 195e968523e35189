use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::pipeline::Orchestrator;

/// Liveness plus a look at the download root. A root that cannot be read
/// reports `degraded` rather than failing the request.
pub async fn health(Extension(orchestrator): Extension<Arc<Orchestrator>>) -> Json<Value> {
    let (status, sessions) = match orchestrator.store().list_sessions().await {
        Ok(sessions) => ("ok", Some(sessions.len())),
        Err(_) => ("degraded", None),
    };

    Json(json!({
        "status": status,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": sessions,
    }))
}
