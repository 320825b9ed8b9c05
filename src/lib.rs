//! WeChat Work SDK for Rust
//!
//! Client for the enterprise chat, customer service, shake-around and tag
//! APIs of WeChat Work (`qyapi.weixin.qq.com`).
//!
//! ## API Coverage
//!
//! | Category | Endpoints |
//! |----------|-----------|
//! | Group Chat | 7 |
//! | Customer Service | 2 |
//! | Shake-around | 1 |
//! | Tags | 7 |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wechat_work_sdk::{WechatWork, types::{CorpId, CorpSecret}};
//! use wechat_work_sdk::types::ApiResponseExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wechat = WechatWork::builder()
//!         .corpid(CorpId::new("ww1234567890abcdef")?)
//!         .secret(CorpSecret::new("your_secret")?)
//!         .build()?;
//!
//!     let created = wechat.create_tag("UI").await?;
//!     println!("tag id: {}", created["tagid"]);
//!
//!     let added = wechat.add_tag_users(1, &["zhangsan", "lisi"]).await?;
//!     if !added.is_success() {
//!         eprintln!("{}: {}", added.errcode(), added.errmsg());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - WeChat Work API modules (chat, kf, shake, tag)
//! - [`client`] - Facade, builder and HTTP transport
//! - [`error`] - Error types
//! - [`middleware`] - Tower middleware for the built-in transport
//! - [`token`] - Access token provider trait and the default cache
//! - [`types`] - Request descriptor, response helpers and identifiers
//!
//! ## Error Handling
//!
//! Operations return `Result<serde_json::Value, WechatError>`. An `Err` means
//! the request did not complete (network, HTTP status, undecodable body, token
//! acquisition). A body with a non-zero `errcode` is an `Ok`:
//!
//! ```rust,ignore
//! use wechat_work_sdk::WechatError;
//! use wechat_work_sdk::types::ApiResponseExt;
//!
//! match wechat.delete_tag(1).await {
//!     Ok(body) if body.is_success() => { /* deleted */ }
//!     Ok(body) => eprintln!("rejected: {} - {}", body.errcode(), body.errmsg()),
//!     Err(WechatError::Http(e)) => eprintln!("HTTP error: {}", e),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod middleware;
pub mod token;
pub mod types;

pub use client::{Transport, WechatClient, WechatClientBuilder, WechatWork, WechatWorkBuilder};
pub use error::WechatError;
pub use token::{TokenManager, TokenProvider};
