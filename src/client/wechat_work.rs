//! Unified WeChat Work SDK client

use std::sync::Arc;

use serde_json::Value;

use crate::api::chat::{ChatApi, ChatTarget, UpdateChatOptions, UserMute};
use crate::api::common::Message;
use crate::api::kf::{KfApi, KfListType, KfParty};
use crate::api::shake::ShakeApi;
use crate::api::tag::TagApi;
use crate::api::WechatContext;
use crate::error::WechatError;
use crate::types::CorpId;

/// Unified WeChat Work client
///
/// This is the main entry point for the SDK. Every remote operation is a
/// method here; each returns the response body unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use wechat_work_sdk::WechatWork;
/// use wechat_work_sdk::api::ChatTarget;
/// use wechat_work_sdk::types::{ApiResponseExt, CorpId, CorpSecret};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let wechat = WechatWork::builder()
///         .corpid(CorpId::new("ww1234567890abcdef")?)
///         .secret(CorpSecret::new("your_secret")?)
///         .build()?;
///
///     let result = wechat
///         .send_text_chat(&ChatTarget::group("235364212115767297"), "zhangsan", "hello")
///         .await?;
///     if !result.is_success() {
///         eprintln!("send failed: {}", result.errmsg());
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct WechatWork {
    context: Arc<WechatContext>,
    corpid: CorpId,
}

impl std::fmt::Debug for WechatWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatWork")
            .field("corpid", &self.corpid)
            .finish_non_exhaustive()
    }
}

impl WechatWork {
    pub fn builder() -> super::builder::WechatWorkBuilder {
        super::builder::WechatWorkBuilder::default()
    }

    pub(crate) fn new(context: Arc<WechatContext>, corpid: CorpId) -> Self {
        Self { context, corpid }
    }

    pub fn corpid(&self) -> &str {
        self.corpid.as_str()
    }

    pub fn context(&self) -> &Arc<WechatContext> {
        &self.context
    }

    pub async fn get_access_token(&self) -> Result<String, WechatError> {
        self.context.token_provider.get_token().await
    }

    pub async fn invalidate_token(&self) {
        self.context.token_provider.invalidate().await;
    }

    // Chat API

    pub async fn create_chat(
        &self,
        chatid: &str,
        name: &str,
        owner: &str,
        userlist: &[&str],
    ) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .create_chat(chatid, name, owner, userlist)
            .await
    }

    pub async fn get_chat(&self, chatid: &str) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone()).get_chat(chatid).await
    }

    pub async fn update_chat(
        &self,
        chatid: &str,
        op_user: &str,
        options: &UpdateChatOptions,
    ) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .update_chat(chatid, op_user, options)
            .await
    }

    pub async fn quit_chat(&self, chatid: &str, op_user: &str) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .quit_chat(chatid, op_user)
            .await
    }

    pub async fn clear_notify_chat(
        &self,
        op_user: &str,
        chat: &ChatTarget,
    ) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .clear_notify_chat(op_user, chat)
            .await
    }

    pub async fn send_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        message: &Message,
    ) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .send_chat(receiver, sender, message)
            .await
    }

    pub async fn send_text_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        text: &str,
    ) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .send_text_chat(receiver, sender, text)
            .await
    }

    pub async fn send_image_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .send_image_chat(receiver, sender, media_id)
            .await
    }

    pub async fn send_file_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .send_file_chat(receiver, sender, media_id)
            .await
    }

    pub async fn send_voice_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .send_voice_chat(receiver, sender, media_id)
            .await
    }

    pub async fn set_mute_chat(&self, user_mute_list: &[UserMute]) -> Result<Value, WechatError> {
        ChatApi::new(self.context.clone())
            .set_mute_chat(user_mute_list)
            .await
    }

    // Customer service API

    pub async fn send_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        message: &Message,
    ) -> Result<Value, WechatError> {
        KfApi::new(self.context.clone())
            .send_kf(sender, receiver, message)
            .await
    }

    pub async fn send_text_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        text: &str,
    ) -> Result<Value, WechatError> {
        KfApi::new(self.context.clone())
            .send_text_kf(sender, receiver, text)
            .await
    }

    pub async fn send_image_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        KfApi::new(self.context.clone())
            .send_image_kf(sender, receiver, media_id)
            .await
    }

    pub async fn send_file_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        KfApi::new(self.context.clone())
            .send_file_kf(sender, receiver, media_id)
            .await
    }

    pub async fn send_voice_kf(
        &self,
        sender: &KfParty,
        receiver: &KfParty,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        KfApi::new(self.context.clone())
            .send_voice_kf(sender, receiver, media_id)
            .await
    }

    pub async fn list_kf(&self, kind: Option<KfListType>) -> Result<Value, WechatError> {
        KfApi::new(self.context.clone()).list_kf(kind).await
    }

    // Shake-around API

    pub async fn get_shake_info(&self, ticket: &str) -> Result<Value, WechatError> {
        ShakeApi::new(self.context.clone())
            .get_shake_info(ticket)
            .await
    }

    // Tag API

    pub async fn create_tag(&self, name: &str) -> Result<Value, WechatError> {
        TagApi::new(self.context.clone()).create_tag(name).await
    }

    pub async fn update_tag_name(&self, tagid: u32, name: &str) -> Result<Value, WechatError> {
        TagApi::new(self.context.clone())
            .update_tag_name(tagid, name)
            .await
    }

    pub async fn delete_tag(&self, tagid: u32) -> Result<Value, WechatError> {
        TagApi::new(self.context.clone()).delete_tag(tagid).await
    }

    pub async fn list_tags(&self) -> Result<Value, WechatError> {
        TagApi::new(self.context.clone()).list_tags().await
    }

    pub async fn get_tag_users(&self, tagid: u32) -> Result<Value, WechatError> {
        TagApi::new(self.context.clone()).get_tag_users(tagid).await
    }

    pub async fn add_tag_users(&self, tagid: u32, userlist: &[&str]) -> Result<Value, WechatError> {
        TagApi::new(self.context.clone())
            .add_tag_users(tagid, userlist)
            .await
    }

    pub async fn delete_tag_users(
        &self,
        tagid: u32,
        userlist: &[&str],
    ) -> Result<Value, WechatError> {
        TagApi::new(self.context.clone())
            .delete_tag_users(tagid, userlist)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CorpId, CorpSecret};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_wechat(base_url: &str) -> WechatWork {
        WechatWork::builder()
            .corpid(CorpId::new("ww1234567890abcdef").unwrap())
            .secret(CorpSecret::new("secret1234567890ab").unwrap())
            .base_url(base_url)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_token_is_fetched_once_across_calls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cgi-bin/gettoken"))
            .and(query_param("corpid", "ww1234567890abcdef"))
            .and(query_param("corpsecret", "secret1234567890ab"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errcode": 0,
                "errmsg": "ok",
                "access_token": "cached_token",
                "expires_in": 7200
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/cgi-bin/tag/list"))
            .and(query_param("access_token", "cached_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errcode": 0,
                "errmsg": "ok",
                "taglist": []
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let wechat = create_test_wechat(&mock_server.uri());
        wechat.list_tags().await.unwrap();
        wechat.list_tags().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_token_forces_refetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cgi-bin/gettoken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errcode": 0,
                "errmsg": "ok",
                "access_token": "fresh_token",
                "expires_in": 7200
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let wechat = create_test_wechat(&mock_server.uri());
        assert_eq!(wechat.get_access_token().await.unwrap(), "fresh_token");
        wechat.invalidate_token().await;
        assert_eq!(wechat.get_access_token().await.unwrap(), "fresh_token");
    }

    #[test]
    fn test_debug_output() {
        let wechat = create_test_wechat("https://qyapi.weixin.qq.com");
        let rendered = format!("{wechat:?}");
        assert!(rendered.contains("ww1234567890abcdef"));
        assert!(!rendered.contains("secret1234567890ab"));
    }
}
