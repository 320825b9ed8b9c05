//! Shake-around (iBeacon) API
//!
//! Looks up the device and user behind a shake-around ticket.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{WechatApi, WechatContext};
use crate::error::WechatError;

#[derive(Debug, Serialize)]
struct GetShakeInfoRequest<'a> {
    ticket: &'a str,
}

/// Shake-around API
pub struct ShakeApi {
    context: Arc<WechatContext>,
}

impl ShakeApi {
    /// Create a new ShakeApi instance
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Get device and user information for a shake ticket
    ///
    /// POST /cgi-bin/shakearound/getshakeinfo?access_token=ACCESS_TOKEN
    ///
    /// # Arguments
    /// * `ticket` - Ticket carried by the shake-around page URL
    pub async fn get_shake_info(&self, ticket: &str) -> Result<Value, WechatError> {
        let body = GetShakeInfoRequest { ticket };
        self.context
            .post(self.api_name(), "/cgi-bin/shakearound/getshakeinfo", &body)
            .await
    }
}

impl WechatApi for ShakeApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "shake"
    }
}
