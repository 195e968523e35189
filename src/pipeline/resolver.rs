use std::sync::Arc;

use crate::{
    error::AcquireError,
    info,
    pipeline::CatalogClient,
    retry::RetryExecutor,
    types::{PlaylistId, Track},
};

/// Resolves a playlist into its tracks, following pagination to the end.
pub struct CatalogResolver {
    client: Arc<dyn CatalogClient>,
    retry: RetryExecutor,
}

impl CatalogResolver {
    pub fn new(client: Arc<dyn CatalogClient>, retry: RetryExecutor) -> Self {
        Self { client, retry }
    }

    pub async fn resolve(&self, playlist_id: &PlaylistId) -> Result<Vec<Track>, AcquireError> {
        let mut tracks: Vec<Track> = Vec::new();
        let mut next: Option<String> = None;

        loop {
            let cursor = next.take();
            let page = self
                .retry
                .run("fetch_playlist_page", || {
                    self.client.fetch_page(playlist_id, cursor.as_deref())
                })
                .await
                .map_err(|e| AcquireError::CatalogUnavailable(e.to_string()))?;

            // removed and local-file entries come back without a track
            tracks.extend(page.items.into_iter().filter_map(|item| item.track).map(|track| {
                Track {
                    artist: track
                        .artists
                        .into_iter()
                        .next()
                        .map(|a| a.name)
                        .unwrap_or_default(),
                    title: track.name,
                }
            }));

            match page.next {
                Some(url) => next = Some(url),
                None => break,
            }
        }

        info!("Fetched {} tracks from Spotify.", tracks.len());
        Ok(tracks)
    }
}
