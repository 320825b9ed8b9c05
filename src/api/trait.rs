//! WeChat Work API trait and context
//!
//! Provides the base trait and context for all WeChat Work API implementations.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::client::Transport;
use crate::error::WechatError;
use crate::token::TokenProvider;
use crate::types::RequestDescriptor;

/// Context holding shared resources for WeChat Work API implementations.
///
/// Contains the transport and the token provider that API implementations
/// need to make requests.
#[derive(Clone)]
pub struct WechatContext {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) token_provider: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for WechatContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatContext")
            .field("transport", &"Transport { .. }")
            .field("token_provider", &"TokenProvider { .. }")
            .finish()
    }
}

impl WechatContext {
    /// Create a new WechatContext
    pub fn new(transport: Arc<dyn Transport>, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            transport,
            token_provider,
        }
    }

    /// Get a reference to the transport.
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Get a reference to the token provider.
    pub fn token_provider(&self) -> &dyn TokenProvider {
        self.token_provider.as_ref()
    }

    /// GET `path` with `access_token` followed by `query` in the query string.
    pub(crate) async fn get(
        &self,
        api: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, WechatError> {
        let access_token = self.token_provider.get_token().await?;
        let request = query.iter().fold(
            RequestDescriptor::get(path, &access_token),
            |request, (key, value)| request.query(*key, *value),
        );
        log::debug!("[{}] GET {}", api, path);
        self.transport.send(request).await
    }

    /// POST `body` as JSON to `path`.
    pub(crate) async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        api: &'static str,
        path: &str,
        body: &B,
    ) -> Result<Value, WechatError> {
        let access_token = self.token_provider.get_token().await?;
        let request = RequestDescriptor::post_json(path, &access_token, body)?;
        log::debug!("[{}] POST {}", api, path);
        self.transport.send(request).await
    }
}

/// Trait for WeChat Work API implementations.
///
/// All API modules implement this trait to provide access to the shared context.
pub trait WechatApi: Send + Sync {
    /// Get a reference to the WeChat context
    fn context(&self) -> &WechatContext;

    /// Get the name of this API for logging and error context.
    fn api_name(&self) -> &'static str {
        "unknown"
    }
}
