use std::future::{poll_fn, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Request as ReqwestRequest, Response as ReqwestResponse};
use tower::{Layer, Service};

use crate::api::WechatContext;
use crate::error::WechatError;
use crate::token::{TokenManager, TokenProvider};
use crate::types::{CorpId, CorpSecret};

use super::transport::Transport;
use super::wechat_client::{
    MiddlewareExecutor, WechatClient, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_TIMEOUT_SECS,
};
use super::WechatWork;

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<ReqwestResponse, reqwest::Error>> + Send>>;

/// Builder for [`WechatWork`]
///
/// `corpid` is always required. `secret` is required unless a custom
/// [`TokenProvider`] is installed with [`token_provider`](Self::token_provider).
/// Middleware wraps the built-in reqwest transport only; it is not applied to
/// a transport installed with [`transport`](Self::transport).
#[must_use]
#[derive(Default)]
pub struct WechatWorkBuilder<M = ()> {
    corpid: Option<CorpId>,
    secret: Option<CorpSecret>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    transport: Option<Arc<dyn Transport>>,
    middleware: Option<M>,
}

impl<M> std::fmt::Debug for WechatWorkBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatWorkBuilder")
            .field("corpid", &self.corpid)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("token_provider", &self.token_provider.as_ref().map(|_| ".."))
            .field("transport", &self.transport.as_ref().map(|_| ".."))
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

impl<M> WechatWorkBuilder<M> {
    pub fn corpid(mut self, corpid: CorpId) -> Self {
        self.corpid = Some(corpid);
        self
    }

    pub fn secret(mut self, secret: CorpSecret) -> Self {
        self.secret = Some(secret);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Use an external token source instead of the built-in [`TokenManager`].
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Send requests through `transport` instead of the built-in reqwest client.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_middleware<M2>(self, middleware: M2) -> WechatWorkBuilder<M2>
    where
        M2: Layer<WechatClient> + Clone + Send + Sync + 'static,
    {
        WechatWorkBuilder {
            corpid: self.corpid,
            secret: self.secret,
            base_url: self.base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            token_provider: self.token_provider,
            transport: self.transport,
            middleware: Some(middleware),
        }
    }

    pub fn build(self) -> Result<WechatWork, WechatError>
    where
        M: Layer<WechatClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let corpid = self
            .corpid
            .ok_or_else(|| WechatError::Config("corpid is required".to_string()))?;

        if self.secret.is_none() && self.token_provider.is_none() {
            return Err(WechatError::Config(
                "secret is required unless a token provider is set".to_string(),
            ));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(WechatError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let mut client_builder = WechatClient::builder()
            .corpid(corpid.clone())
            .base_url(base_url)
            .timeout(timeout)
            .connect_timeout(connect_timeout);
        if let Some(secret) = self.secret {
            client_builder = client_builder.secret(secret);
        }
        let mut client = client_builder.build()?;

        if let Some(middleware) = self.middleware {
            let service = middleware.layer(client.clone());
            let executor = make_middleware_executor(service);
            client = client.with_middleware_executor(executor);
        }

        let token_provider: Arc<dyn TokenProvider> = match self.token_provider {
            Some(provider) => provider,
            None => Arc::new(TokenManager::new(client.clone())),
        };
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(client),
        };

        let context = Arc::new(WechatContext::new(transport, token_provider));
        Ok(WechatWork::new(context, corpid))
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| -> MiddlewareFuture {
        let mut service = (*service).clone();
        Box::pin(async move {
            poll_fn(|cx| service.poll_ready(cx)).await?;
            service.call(request).await
        })
    })
}
