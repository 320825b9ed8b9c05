//! Access token management for WeChat Work API
//!
//! [`TokenProvider`] is the seam API operations fetch tokens through.
//! [`TokenManager`] is the default provider: it calls `/cgi-bin/gettoken`,
//! caches the result and refreshes it shortly before it expires.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::AccessToken;

const DEFAULT_REFRESH_BUFFER_SECS: u64 = 5 * 60;

/// Supplies a valid access token, refreshing it when needed.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a token that is valid for at least the next request.
    async fn get_token(&self) -> Result<String, WechatError>;

    /// Drop any cached token so the next call fetches a fresh one.
    async fn invalidate(&self) {}
}

struct CachedToken {
    token: AccessToken,
    expires_at: Instant,
}

impl CachedToken {
    fn is_expired(&self, buffer: Duration) -> bool {
        Instant::now() + buffer >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    errcode: i32,
    #[serde(default)]
    errmsg: String,
}

/// Manages access_token lifecycle with automatic refresh
///
/// The cache lock is held across the fetch, so concurrent callers on a cold
/// cache share a single request to the token endpoint.
pub struct TokenManager {
    client: WechatClient,
    cache: Mutex<Option<CachedToken>>,
    refresh_buffer: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("client", &self.client)
            .field("refresh_buffer", &self.refresh_buffer)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(client: WechatClient) -> Self {
        Self {
            client,
            cache: Mutex::new(None),
            refresh_buffer: Duration::from_secs(DEFAULT_REFRESH_BUFFER_SECS),
        }
    }

    /// Refresh this long before the reported expiry. Default: 5 minutes.
    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    pub fn refresh_buffer(&self) -> Duration {
        self.refresh_buffer
    }

    async fn fetch_token(&self) -> Result<TokenResponse, WechatError> {
        let secret = self.client.secret().ok_or_else(|| {
            WechatError::Config("secret is required to fetch access tokens".to_string())
        })?;
        let query = [("corpid", self.client.corpid()), ("corpsecret", secret)];

        self.client.get("/cgi-bin/gettoken", &query).await
    }
}

#[async_trait]
impl TokenProvider for TokenManager {
    async fn get_token(&self) -> Result<String, WechatError> {
        let mut cache = self.cache.lock().await;

        if let Some(ref cached) = *cache {
            if !cached.is_expired(self.refresh_buffer) {
                return Ok(cached.token.as_str().to_string());
            }
        }

        log::debug!("refreshing access token for corpid {}", self.client.corpid());
        let response = self.fetch_token().await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;

        let token = AccessToken::new(response.access_token).map_err(WechatError::Token)?;

        *cache = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });
        Ok(token.as_str().to_string())
    }

    async fn invalidate(&self) {
        log::info!("invalidating cached access token");
        let mut cache = self.cache.lock().await;
        *cache = None;
    }
}
