//! HTTP transport abstraction
//!
//! API operations hand a [`RequestDescriptor`] to a [`Transport`] and get the
//! parsed JSON body back. [`WechatClient`](super::WechatClient) is the default
//! implementation; tests and callers with their own HTTP stack can plug in
//! another one through [`WechatWorkBuilder::transport`](super::WechatWorkBuilder::transport).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::WechatError;
use crate::types::RequestDescriptor;

/// Sends one request and returns the parsed JSON body.
///
/// Implementations fail with [`WechatError::Http`] on connectivity problems,
/// non-2xx statuses and bodies that are not JSON. A body carrying a non-zero
/// `errcode` is a successful result.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestDescriptor) -> Result<Value, WechatError>;
}
