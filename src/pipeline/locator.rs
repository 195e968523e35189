use std::sync::Arc;

use rand::seq::IndexedRandom;

use crate::{
    error::AcquireError,
    info,
    pipeline::{MediaExtractor, SearchProvider},
    retry::RetryExecutor,
    types::{MediaSource, Tier},
    youtube,
};

/// Finds a downloadable URL for a search query.
///
/// Two tiers are available: [`primary`](Self::primary) asks the credentialed
/// search API, [`fallback`](Self::fallback) runs a site search through the
/// media extractor. The caller decides how to combine them.
pub struct SourceLocator {
    search: Arc<dyn SearchProvider>,
    extractor: Arc<dyn MediaExtractor>,
    api_keys: Vec<String>,
    retry: RetryExecutor,
}

impl SourceLocator {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        extractor: Arc<dyn MediaExtractor>,
        api_keys: Vec<String>,
        retry: RetryExecutor,
    ) -> Self {
        Self {
            search,
            extractor,
            api_keys,
            retry,
        }
    }

    pub async fn primary(&self, query: &str) -> Result<MediaSource, AcquireError> {
        if self.api_keys.is_empty() {
            return Err(AcquireError::Config(
                "no YouTube API keys configured".to_string(),
            ));
        }

        let ids = self
            .retry
            .run("search_youtube_api", || {
                // a fresh key per attempt spreads quota usage over the pool
                let key = self.random_key();
                let search = Arc::clone(&self.search);
                let query = query.to_string();
                async move { search.search(&query, &key).await }
            })
            .await?;

        // an empty result is an answer, not a transient failure
        let id = ids
            .into_iter()
            .next()
            .ok_or_else(|| AcquireError::SourceNotFound(query.to_string()))?;

        let url = youtube::watch_url(&id);
        info!("Found video for '{}' using YouTube API: {}", query, url);

        Ok(MediaSource {
            url,
            tier: Tier::Primary,
        })
    }

    pub async fn fallback(&self, query: &str) -> Result<MediaSource, AcquireError> {
        info!("Searching for '{}' on YouTube using yt-dlp...", query);

        let urls = self
            .retry
            .run("search_youtube_yt_dlp", || self.extractor.search(query))
            .await?;

        let url = urls
            .into_iter()
            .next()
            .ok_or_else(|| AcquireError::SourceNotFound(query.to_string()))?;

        info!("Found video for '{}' using yt-dlp: {}", query, url);

        Ok(MediaSource {
            url,
            tier: Tier::Fallback,
        })
    }

    fn random_key(&self) -> String {
        self.api_keys
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default()
    }
}
