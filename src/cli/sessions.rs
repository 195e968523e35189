use tabled::Table;

use crate::{config, error, management::SessionStore, types::SessionTableRow, warning};

pub async fn sessions() {
    let store = SessionStore::new(config::download_root());

    let sessions = match store.list_sessions().await {
        Ok(sessions) => sessions,
        Err(e) => error!("Cannot read {}. Err: {}", store.root().display(), e),
    };

    if sessions.is_empty() {
        warning!("No sessions in {}.", store.root().display());
        return;
    }

    let rows: Vec<SessionTableRow> = sessions
        .into_iter()
        .map(|s| SessionTableRow {
            session: s.id,
            files: s.files,
            newest: s
                .newest
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
