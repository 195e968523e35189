use async_trait::async_trait;
use reqwest::Client;

use crate::{error::AcquireError, pipeline::SearchProvider, types::YoutubeSearchResponse};

/// YouTube Data API v3 video search.
pub struct YoutubeSearch {
    api_url: String,
    http: Client,
}

impl YoutubeSearch {
    pub fn new(api_url: String, http: Client) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl SearchProvider for YoutubeSearch {
    async fn search(&self, query: &str, api_key: &str) -> Result<Vec<String>, AcquireError> {
        let response = self
            .http
            .get(format!("{}/search", self.api_url))
            .query(&[
                ("part", "id"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query),
                ("key", api_key),
            ])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            // the request url carries the api key
            .map_err(|e| AcquireError::HttpError(e.without_url()))?;

        let json = response
            .json::<YoutubeSearchResponse>()
            .await
            .map_err(|e| AcquireError::HttpError(e.without_url()))?;

        Ok(json
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }
}
