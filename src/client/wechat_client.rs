//! WeChat Work HTTP Client
//!
//! Provides the reqwest-based [`Transport`] used by the API facade.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

use super::transport::Transport;
use crate::error::{HttpError, WechatError};
use crate::types::{CorpId, CorpSecret, RequestDescriptor};

pub(crate) const DEFAULT_BASE_URL: &str = "https://qyapi.weixin.qq.com";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// WeChat Work API Client
///
/// Reusable HTTP client for calling WeChat Work APIs.
/// Built with reqwest for async HTTP requests.
#[derive(Clone)]
pub struct WechatClient {
    http: Client,
    corpid: CorpId,
    secret: Option<CorpSecret>,
    base_url: String,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for WechatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatClient")
            .field("corpid", &self.corpid)
            .field("base_url", &self.base_url)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl WechatClient {
    /// Create a new client builder
    pub fn builder() -> WechatClientBuilder {
        WechatClientBuilder::default()
    }

    /// Get the corpid
    pub fn corpid(&self) -> &str {
        self.corpid.as_str()
    }

    /// Secret used by [`TokenManager`](crate::token::TokenManager), if configured
    pub(crate) fn secret(&self) -> Option<&str> {
        self.secret.as_ref().map(CorpSecret::as_str)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware pipeline.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Value, WechatError> {
        let response = self.send_request(request).await?;

        if let Err(e) = response.error_for_status_ref() {
            return Err(e.into());
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| WechatError::Http(HttpError::Decode(e.to_string())))
    }

    /// Make a GET request and deserialize the body into `T`
    ///
    /// The body is not inspected for `errcode`; callers decide what a
    /// non-zero code means.
    ///
    /// # Errors
    /// Returns `WechatError::Http` for non-2xx HTTP status codes or decode failures
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WechatError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let request = self.http.get(url).query(query).build()?;
        let value = self.execute(request).await?;
        serde_json::from_value(value)
            .map_err(|e| WechatError::Http(HttpError::Decode(e.to_string())))
    }
}

#[async_trait]
impl Transport for WechatClient {
    async fn send(&self, request: RequestDescriptor) -> Result<Value, WechatError> {
        let url = request.url(&self.base_url);
        let mut builder = self.http.request(request.method().clone(), url);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        self.execute(builder.build()?).await
    }
}

impl Service<reqwest::Request> for WechatClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

/// Builder for WechatClient
///
/// # Example
///
/// ```rust
/// use wechat_work_sdk::client::WechatClient;
/// use wechat_work_sdk::types::{CorpId, CorpSecret};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = WechatClient::builder()
///         .corpid(CorpId::new("ww1234567890abcdef")?)
///         .secret(CorpSecret::new("corp_secret")?)
///         .build()?;
///
///     assert_eq!(client.base_url(), "https://qyapi.weixin.qq.com");
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct WechatClientBuilder {
    corpid: Option<CorpId>,
    secret: Option<CorpSecret>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl WechatClientBuilder {
    /// Set the WeChat Work corpid
    pub fn corpid(mut self, corpid: CorpId) -> Self {
        self.corpid = Some(corpid);
        self
    }

    /// Set the application secret
    ///
    /// Only needed when tokens are fetched through [`TokenManager`](crate::token::TokenManager).
    pub fn secret(mut self, secret: CorpSecret) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Set the base URL for API calls
    ///
    /// Default: `<https://qyapi.weixin.qq.com>`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the total timeout for requests
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the WechatClient
    ///
    /// # Errors
    /// Returns an error if corpid is not set
    pub fn build(self) -> Result<WechatClient, WechatError> {
        let corpid = self
            .corpid
            .ok_or_else(|| WechatError::Config("corpid is required".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(WechatClient {
            http: client,
            corpid,
            secret: self.secret,
            base_url,
            middleware_executor: None,
        })
    }
}
