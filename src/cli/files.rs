use crate::{config, error, error::AcquireError, info, management::SessionStore, warning};

pub async fn files(session_id: String) {
    let store = SessionStore::new(config::download_root());

    match store.list_completed(&session_id).await {
        Ok(files) if files.is_empty() => warning!("Session {} has no finished files.", session_id),
        Ok(files) => {
            for file in files {
                info!("{}", file);
            }
        }
        Err(AcquireError::SessionNotFound(_)) => warning!("No files found for {}.", session_id),
        Err(e) => error!("Cannot list files. Err: {}", e),
    }
}
