//! Enterprise Customer Service (KF) API
//!
//! Relays text, image, file and voice messages between customer service
//! accounts and customers, and lists the configured service accounts.
//!
//! Exactly one of `sender` / `receiver` is expected to be of type
//! [`KfPartyType::Kf`]. When the sender is the service account, the message
//! is a reply from another IM tool and is synced to the account's WeChat.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::common::Message;
use super::{WechatApi, WechatContext};
use crate::error::WechatError;

/// Who a customer service message party is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KfPartyType {
    /// Customer service account
    Kf,
    /// Enterprise member
    Userid,
    /// External customer
    Openid,
}

/// `{type, id}` object naming a sender or receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KfParty {
    #[serde(rename = "type")]
    pub kind: KfPartyType,
    pub id: String,
}

impl KfParty {
    pub fn new(kind: KfPartyType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn kf(id: impl Into<String>) -> Self {
        Self::new(KfPartyType::Kf, id)
    }

    pub fn userid(id: impl Into<String>) -> Self {
        Self::new(KfPartyType::Userid, id)
    }

    pub fn openid(id: impl Into<String>) -> Self {
        Self::new(KfPartyType::Openid, id)
    }
}

/// Filter for [`KfApi::list_kf`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KfListType {
    /// Internal service accounts only
    Internal,
    /// External service accounts only
    External,
}

impl KfListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KfListType::Internal => "internal",
            KfListType::External => "external",
        }
    }
}

#[derive(Debug, Serialize)]
struct SendKfRequest<'a> {
    sender: &'a KfParty,
    receiver: &'a KfParty,
    #[serde(flatten)]
    message: &'a Message,
}

/// Customer Service (KF) API
pub struct KfApi {
    context: Arc<WechatContext>,
}

impl KfApi {
    /// Create a new KfApi instance
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Send a customer service message
    ///
    /// POST /cgi-bin/kf/send?access_token=ACCESS_TOKEN
    pub async fn send_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        message: &Message,
    ) -> Result<Value, WechatError> {
        let body = SendKfRequest {
            sender,
            receiver,
            message,
        };
        self.context
            .post(self.api_name(), "/cgi-bin/kf/send", &body)
            .await
    }

    pub async fn send_text_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        text: &str,
    ) -> Result<Value, WechatError> {
        self.send_kf(sender, receiver, &Message::text(text)).await
    }

    pub async fn send_image_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        self.send_kf(sender, receiver, &Message::image(media_id))
            .await
    }

    pub async fn send_file_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        self.send_kf(sender, receiver, &Message::file(media_id))
            .await
    }

    pub async fn send_voice_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        self.send_kf(sender, receiver, &Message::voice(media_id))
            .await
    }

    /// List customer service accounts
    ///
    /// GET /cgi-bin/kf/list?access_token=ACCESS_TOKEN[&type=internal|external]
    ///
    /// Without a filter both internal and external accounts are returned.
    pub async fn list_kf(&self, kind: Option<KfListType>) -> Result<Value, WechatError> {
        let query: Vec<(&str, &str)> = kind
            .map(|kind| vec![("type", kind.as_str())])
            .unwrap_or_default();
        self.context
            .get(self.api_name(), "/cgi-bin/kf/list", &query)
            .await
    }
}

impl WechatApi for KfApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "kf"
    }
}
