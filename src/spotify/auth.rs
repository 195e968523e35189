use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{error::AcquireError, types::Token};

/// Seconds before the reported expiry at which a token is refreshed.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Client-credentials access to the Spotify Web API.
///
/// The access token is cached and renewed shortly before it expires, so a
/// playlist with many pages costs a single token request.
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
    token_url: String,
    http: Client,
    token: Mutex<Option<Token>>,
}

impl ClientCredentials {
    pub fn new(client_id: String, client_secret: String, token_url: String, http: Client) -> Self {
        Self {
            client_id,
            client_secret,
            token_url,
            http,
            token: Mutex::new(None),
        }
    }

    pub async fn get_valid_token(&self) -> Result<String, AcquireError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if !is_expired(token) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    /// Drops the cached token, e.g. after the API rejected it.
    pub async fn invalidate(&self) {
        *self.token.lock().await = None;
    }

    async fn request_token(&self) -> Result<Token, AcquireError> {
        let credentials = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));

        let res = self
            .http
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", credentials))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?;

        let json: Value = res.json().await?;
        let access_token = json["access_token"]
            .as_str()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AcquireError::CatalogUnavailable("token response without access_token".to_string())
            })?;

        Ok(Token {
            access_token: access_token.to_string(),
            expires_in: json["expires_in"].as_u64().unwrap_or(3600),
            obtained_at: Utc::now().timestamp().max(0) as u64,
        })
    }
}

pub fn is_expired(token: &Token) -> bool {
    let now = Utc::now().timestamp().max(0) as u64;
    now >= (token.obtained_at + token.expires_in).saturating_sub(EXPIRY_MARGIN_SECS)
}
