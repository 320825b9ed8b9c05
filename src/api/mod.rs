//! WeChat Work API modules
//!
//! - [`chat`] - Enterprise group chat
//! - [`kf`] - Enterprise customer service messaging
//! - [`shake`] - Shake-around device lookup
//! - [`tag`] - Tag management
//! - [`common`] - Message payloads shared by chat and customer service
//!
//! Every operation returns the remote JSON body as a [`serde_json::Value`],
//! including bodies with a non-zero `errcode`. Use
//! [`ApiResponseExt`](crate::types::ApiResponseExt) to inspect them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wechat_work_sdk::api::{ChatApi, ChatTarget};
//!
//! let chat = ChatApi::new(context);
//! chat.send_text_chat(&ChatTarget::group("235364212115767297"), "zhangsan", "hi").await?;
//! ```

pub mod chat;
pub mod common;
pub mod kf;
pub mod shake;
pub mod tag;
pub mod r#trait;

pub use chat::{ChatApi, ChatTarget, ChatType, UpdateChatOptions, UserMute};
pub use common::{MediaMessage, Message, TextMessage};
pub use kf::{KfApi, KfListType, KfParty, KfPartyType};
pub use r#trait::{WechatApi, WechatContext};
pub use shake::ShakeApi;
pub use tag::TagApi;
