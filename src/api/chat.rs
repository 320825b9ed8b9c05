//! Enterprise Group Chat API
//!
//! Endpoints for creating and managing enterprise chats and posting messages
//! into them.
//!
//! # Endpoints
//!
//! - [`ChatApi::create_chat`] - Create a chat
//! - [`ChatApi::get_chat`] - Get chat details
//! - [`ChatApi::update_chat`] - Rename, change owner, add or remove members
//! - [`ChatApi::quit_chat`] - Leave a chat
//! - [`ChatApi::clear_notify_chat`] - Clear a member's unread state
//! - [`ChatApi::send_chat`] - Send a message (plus text/image/file/voice shortcuts)
//! - [`ChatApi::set_mute_chat`] - Set do-not-disturb for members
//!
//! Every method returns the response body unchanged, business errors included.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::common::Message;
use super::{WechatApi, WechatContext};
use crate::error::WechatError;

// ============================================================================
// Public Request Types
// ============================================================================

/// Conversation kind of a [`ChatTarget`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    /// One-to-one conversation, `id` is a userid
    Single,
    /// Group chat, `id` is a chatid
    Group,
}

/// `{type, id}` object naming a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTarget {
    #[serde(rename = "type")]
    pub kind: ChatType,
    pub id: String,
}

impl ChatTarget {
    pub fn new(kind: ChatType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// A one-to-one conversation with `userid`
    pub fn single(userid: impl Into<String>) -> Self {
        Self::new(ChatType::Single, userid)
    }

    /// A group chat
    pub fn group(chatid: impl Into<String>) -> Self {
        Self::new(ChatType::Group, chatid)
    }
}

/// Optional changes for [`ChatApi::update_chat`]
///
/// Empty strings and empty lists are treated as "not set" and left out of
/// the request body. User lists are passed as `&[&str]`, the same as
/// [`ChatApi::create_chat`] and the tag member operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateChatOptions {
    name: Option<String>,
    owner: Option<String>,
    add_user_list: Vec<String>,
    del_user_list: Vec<String>,
}

impl UpdateChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Members to add; repeated calls accumulate.
    pub fn add_users(mut self, userlist: &[&str]) -> Self {
        self.add_user_list.extend(userlist.iter().map(|u| u.to_string()));
        self
    }

    /// Members to remove; repeated calls accumulate.
    pub fn del_users(mut self, userlist: &[&str]) -> Self {
        self.del_user_list.extend(userlist.iter().map(|u| u.to_string()));
        self
    }
}

/// Do-not-disturb setting for one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMute {
    pub userid: String,
    /// 1 mutes new-message notifications, 0 restores them
    pub status: u8,
}

impl UserMute {
    pub fn mute(userid: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            status: 1,
        }
    }

    pub fn unmute(userid: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            status: 0,
        }
    }
}

// ============================================================================
// Request Types (internal)
// ============================================================================

#[derive(Debug, Serialize)]
struct CreateChatRequest<'a> {
    chatid: &'a str,
    name: &'a str,
    owner: &'a str,
    userlist: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct UpdateChatRequest<'a> {
    chatid: &'a str,
    op_user: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    add_user_list: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    del_user_list: Option<&'a [String]>,
}

impl<'a> UpdateChatRequest<'a> {
    fn new(chatid: &'a str, op_user: &'a str, options: &'a UpdateChatOptions) -> Self {
        Self {
            chatid,
            op_user,
            name: options.name.as_deref().filter(|s| !s.is_empty()),
            owner: options.owner.as_deref().filter(|s| !s.is_empty()),
            add_user_list: Some(options.add_user_list.as_slice()).filter(|l| !l.is_empty()),
            del_user_list: Some(options.del_user_list.as_slice()).filter(|l| !l.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
struct QuitChatRequest<'a> {
    chatid: &'a str,
    op_user: &'a str,
}

#[derive(Debug, Serialize)]
struct ClearNotifyRequest<'a> {
    op_user: &'a str,
    chat: &'a ChatTarget,
}

#[derive(Debug, Serialize)]
struct SendChatRequest<'a> {
    receiver: &'a ChatTarget,
    sender: &'a str,
    #[serde(flatten)]
    message: &'a Message,
}

#[derive(Debug, Serialize)]
struct SetMuteRequest<'a> {
    user_mute_list: &'a [UserMute],
}

// ============================================================================
// ChatApi
// ============================================================================

/// Enterprise Group Chat API
pub struct ChatApi {
    context: Arc<WechatContext>,
}

impl ChatApi {
    /// Create a new ChatApi instance
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Create a chat
    ///
    /// POST /cgi-bin/chat/create?access_token=ACCESS_TOKEN
    ///
    /// # Arguments
    /// * `chatid` - Chat ID, up to 32 characters of `0-9a-zA-Z`
    /// * `name` - Chat title
    /// * `owner` - Owner userid, must be a member of `userlist`
    /// * `userlist` - Member userids, 3 to 1000 entries
    ///
    /// The service enforces the constraints above; they are not checked here.
    pub async fn create_chat(
        &self,
        chatid: &str,
        name: &str,
        owner: &str,
        userlist: &[&str],
    ) -> Result<Value, WechatError> {
        let body = CreateChatRequest {
            chatid,
            name,
            owner,
            userlist,
        };
        self.context
            .post(self.api_name(), "/cgi-bin/chat/create", &body)
            .await
    }

    /// Get chat details
    ///
    /// GET /cgi-bin/chat/get?access_token=ACCESS_TOKEN&chatid=CHATID
    pub async fn get_chat(&self, chatid: &str) -> Result<Value, WechatError> {
        self.context
            .get(self.api_name(), "/cgi-bin/chat/get", &[("chatid", chatid)])
            .await
    }

    /// Update a chat
    ///
    /// POST /cgi-bin/chat/update?access_token=ACCESS_TOKEN
    ///
    /// # Arguments
    /// * `chatid` - Chat ID
    /// * `op_user` - Userid of the member performing the change
    /// * `options` - Fields to change; unset ones are omitted from the body
    ///
    /// `owner` is sent whenever it is set and non-empty, transferring
    /// ownership of the chat to that member.
    pub async fn update_chat(
        &self,
        chatid: &str,
        op_user: &str,
        options: &UpdateChatOptions,
    ) -> Result<Value, WechatError> {
        let body = UpdateChatRequest::new(chatid, op_user, options);
        self.context
            .post(self.api_name(), "/cgi-bin/chat/update", &body)
            .await
    }

    /// Leave a chat
    ///
    /// POST /cgi-bin/chat/quit?access_token=ACCESS_TOKEN
    pub async fn quit_chat(&self, chatid: &str, op_user: &str) -> Result<Value, WechatError> {
        let body = QuitChatRequest { chatid, op_user };
        self.context
            .post(self.api_name(), "/cgi-bin/chat/quit", &body)
            .await
    }

    /// Clear the unread state of a conversation for `op_user`
    ///
    /// POST /cgi-bin/chat/clearnotify?access_token=ACCESS_TOKEN
    pub async fn clear_notify_chat(
        &self,
        op_user: &str,
        chat: &ChatTarget,
    ) -> Result<Value, WechatError> {
        let body = ClearNotifyRequest { op_user, chat };
        self.context
            .post(self.api_name(), "/cgi-bin/chat/clearnotify", &body)
            .await
    }

    /// Send a message
    ///
    /// POST /cgi-bin/chat/send?access_token=ACCESS_TOKEN
    ///
    /// # Arguments
    /// * `receiver` - Group chat or single conversation receiving the message
    /// * `sender` - Userid of the sender
    /// * `message` - Message payload
    pub async fn send_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        message: &Message,
    ) -> Result<Value, WechatError> {
        let body = SendChatRequest {
            receiver,
            sender,
            message,
        };
        self.context
            .post(self.api_name(), "/cgi-bin/chat/send", &body)
            .await
    }

    /// Send a text message
    pub async fn send_text_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        text: &str,
    ) -> Result<Value, WechatError> {
        self.send_chat(receiver, sender, &Message::text(text)).await
    }

    /// Send an image message
    pub async fn send_image_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        self.send_chat(receiver, sender, &Message::image(media_id))
            .await
    }

    /// Send a file message
    pub async fn send_file_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        self.send_chat(receiver, sender, &Message::file(media_id))
            .await
    }

    /// Send a voice message
    pub async fn send_voice_chat(
        &self,
        receiver: &ChatTarget,
        sender: &str,
        media_id: &str,
    ) -> Result<Value, WechatError> {
        self.send_chat(receiver, sender, &Message::voice(media_id))
            .await
    }

    /// Set new-message do-not-disturb for members
    ///
    /// POST /cgi-bin/chat/setmute?access_token=ACCESS_TOKEN
    ///
    /// Up to 10000 members per call.
    pub async fn set_mute_chat(&self, user_mute_list: &[UserMute]) -> Result<Value, WechatError> {
        let body = SetMuteRequest { user_mute_list };
        self.context
            .post(self.api_name(), "/cgi-bin/chat/setmute", &body)
            .await
    }
}

impl WechatApi for ChatApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "chat"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{create_test_context, setup_token_mock};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_update_request_omits_unset_fields() {
        let options = UpdateChatOptions::new();
        let body = serde_json::to_value(UpdateChatRequest::new("c1", "u1", &options)).unwrap();
        assert_eq!(body, json!({"chatid": "c1", "op_user": "u1"}));
    }

    #[test]
    fn test_update_request_treats_empty_values_as_unset() {
        let options = UpdateChatOptions::new()
            .name("")
            .owner("")
            .add_users(&[]);
        let body = serde_json::to_value(UpdateChatRequest::new("c1", "u1", &options)).unwrap();
        assert_eq!(body, json!({"chatid": "c1", "op_user": "u1"}));
    }

    #[test]
    fn test_update_request_full() {
        let options = UpdateChatOptions::new()
            .name("Project")
            .owner("lisi")
            .add_users(&["wangwu"])
            .del_users(&["zhaoliu", "sunqi"]);
        let body = serde_json::to_value(UpdateChatRequest::new("c1", "u1", &options)).unwrap();
        assert_eq!(
            body,
            json!({
                "chatid": "c1",
                "op_user": "u1",
                "name": "Project",
                "owner": "lisi",
                "add_user_list": ["wangwu"],
                "del_user_list": ["zhaoliu", "sunqi"]
            })
        );
    }

    #[test]
    fn test_update_request_sends_owner_on_its_own() {
        let options = UpdateChatOptions::new().owner("lisi");
        let body = serde_json::to_value(UpdateChatRequest::new("c1", "u1", &options)).unwrap();
        assert_eq!(body, json!({"chatid": "c1", "op_user": "u1", "owner": "lisi"}));
    }

    #[test]
    fn test_update_users_accumulate() {
        let options = UpdateChatOptions::new()
            .add_users(&["wangwu"])
            .add_users(&["zhaoliu"]);
        let body = serde_json::to_value(UpdateChatRequest::new("c1", "u1", &options)).unwrap();
        assert_eq!(body["add_user_list"], json!(["wangwu", "zhaoliu"]));
    }

    #[test]
    fn test_send_request_shape() {
        let receiver = ChatTarget::group("235364212115767297");
        let message = Message::text("hello");
        let body = serde_json::to_value(SendChatRequest {
            receiver: &receiver,
            sender: "zhangsan",
            message: &message,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "receiver": {"type": "group", "id": "235364212115767297"},
                "sender": "zhangsan",
                "msgtype": "text",
                "text": {"content": "hello"}
            })
        );
    }

    #[test]
    fn test_user_mute_status() {
        assert_eq!(UserMute::mute("a").status, 1);
        assert_eq!(UserMute::unmute("a").status, 0);
    }

    #[test]
    fn test_api_name() {
        let api = ChatApi::new(create_test_context("http://localhost:0"));
        assert_eq!(api.api_name(), "chat");
    }

    #[tokio::test]
    async fn test_create_chat_success() {
        let mock_server = MockServer::start().await;
        setup_token_mock(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/chat/create"))
            .and(query_param("access_token", "test_token"))
            .and(body_json(json!({
                "chatid": "235364212115767297",
                "name": "Weekly",
                "owner": "zhangsan",
                "userlist": ["zhangsan", "lisi", "wangwu"]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ChatApi::new(create_test_context(&mock_server.uri()));
        let result = api
            .create_chat(
                "235364212115767297",
                "Weekly",
                "zhangsan",
                &["zhangsan", "lisi", "wangwu"],
            )
            .await
            .unwrap();
        assert_eq!(result, json!({"errcode": 0, "errmsg": "ok"}));
    }

    #[tokio::test]
    async fn test_get_chat_uses_query_string() {
        let mock_server = MockServer::start().await;
        setup_token_mock(&mock_server).await;

        let chat_info = json!({
            "errcode": 0,
            "errmsg": "ok",
            "chat_info": {
                "chatid": "235364212115767297",
                "name": "Weekly",
                "owner": "zhangsan",
                "userlist": ["zhangsan", "lisi", "wangwu"]
            }
        });

        Mock::given(method("GET"))
            .and(path("/cgi-bin/chat/get"))
            .and(query_param("access_token", "test_token"))
            .and(query_param("chatid", "235364212115767297"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_info.clone()))
            .mount(&mock_server)
            .await;

        let api = ChatApi::new(create_test_context(&mock_server.uri()));
        let result = api.get_chat("235364212115767297").await.unwrap();
        assert_eq!(result, chat_info);
    }

    #[tokio::test]
    async fn test_update_chat_business_error_is_returned() {
        let mock_server = MockServer::start().await;
        setup_token_mock(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/chat/update"))
            .and(body_json(json!({
                "chatid": "c1",
                "op_user": "zhangsan",
                "name": "Renamed"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errcode": 86003,
                "errmsg": "chat not found"
            })))
            .mount(&mock_server)
            .await;

        let api = ChatApi::new(create_test_context(&mock_server.uri()));
        let result = api
            .update_chat("c1", "zhangsan", &UpdateChatOptions::new().name("Renamed"))
            .await
            .unwrap();
        assert_eq!(result["errcode"], 86003);
    }

    #[tokio::test]
    async fn test_send_image_chat() {
        let mock_server = MockServer::start().await;
        setup_token_mock(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/chat/send"))
            .and(body_json(json!({
                "receiver": {"type": "single", "id": "lisi"},
                "sender": "zhangsan",
                "msgtype": "image",
                "image": {"media_id": "MEDIA_1"}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ChatApi::new(create_test_context(&mock_server.uri()));
        let result = api
            .send_image_chat(&ChatTarget::single("lisi"), "zhangsan", "MEDIA_1")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_set_mute_chat() {
        let mock_server = MockServer::start().await;
        setup_token_mock(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/chat/setmute"))
            .and(body_json(json!({
                "user_mute_list": [
                    {"userid": "zhangsan", "status": 1},
                    {"userid": "lisi", "status": 0}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errcode": 0,
                "errmsg": "ok",
                "invaliduser": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ChatApi::new(create_test_context(&mock_server.uri()));
        let result = api
            .set_mute_chat(&[UserMute::mute("zhangsan"), UserMute::unmute("lisi")])
            .await
            .unwrap();
        assert_eq!(result["invaliduser"], json!([]));
    }
}
