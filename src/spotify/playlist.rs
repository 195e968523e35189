use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    config,
    error::AcquireError,
    pipeline::CatalogClient,
    spotify::ClientCredentials,
    types::{PlaylistId, PlaylistPage},
};

const PAGE_LIMIT: &str = "100";
const PAGE_FIELDS: &str = "items(track(name,artists(name))),next";

/// Spotify Web API playlist reader.
pub struct SpotifyCatalog {
    api_url: String,
    auth: ClientCredentials,
    http: Client,
}

impl SpotifyCatalog {
    pub fn new(api_url: String, auth: ClientCredentials, http: Client) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            auth,
            http,
        }
    }

    /// Builds a catalog client from `SPOTIFY_*` configuration.
    pub fn from_env(http: Client) -> Result<Self, AcquireError> {
        let auth = ClientCredentials::new(
            config::spotify_client_id()?,
            config::spotify_client_secret()?,
            config::spotify_apitoken_url(),
            http.clone(),
        );

        Ok(Self::new(config::spotify_apiurl(), auth, http))
    }

    /// True for URLs below the configured API base. The base must end at a
    /// path boundary, so `https://api.example@other.host/` does not qualify.
    pub fn is_api_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.api_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
    }
}

#[async_trait]
impl CatalogClient for SpotifyCatalog {
    async fn fetch_page(
        &self,
        playlist_id: &PlaylistId,
        next: Option<&str>,
    ) -> Result<PlaylistPage, AcquireError> {
        let request = match next {
            Some(url) => {
                // the bearer token must never leave the Spotify API host
                if !self.is_api_url(url) {
                    return Err(AcquireError::CatalogUnavailable(format!(
                        "unexpected next page url {}",
                        url
                    )));
                }
                self.http.get(url)
            }
            None => self
                .http
                .get(format!(
                    "{uri}/playlists/{id}/tracks",
                    uri = self.api_url,
                    id = playlist_id
                ))
                .query(&[("limit", PAGE_LIMIT), ("fields", PAGE_FIELDS)]),
        };

        let token = self.auth.get_valid_token().await?;
        let response = request.bearer_auth(token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.auth.invalidate().await;
        }

        let page = response.error_for_status()?.json::<PlaylistPage>().await?;
        Ok(page)
    }
}
