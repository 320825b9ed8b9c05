//! WeChat Work HTTP Client module
//!
//! This module contains the reqwest transport, the unified facade and its builder.

mod transport;
pub use transport::Transport;

mod wechat_client;
pub use wechat_client::{WechatClient, WechatClientBuilder};

mod wechat_work;
pub use wechat_work::WechatWork;

mod builder;
pub use builder::WechatWorkBuilder;
