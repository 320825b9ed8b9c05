//! Middleware components for the WeChat Work SDK.
//!
//! Middleware follows the Tower `Layer` / `Service` pattern and wraps the
//! built-in reqwest transport. Install it with
//! [`WechatWorkBuilder::with_middleware`](crate::client::WechatWorkBuilder::with_middleware).
//!
//! ## Middleware Types
//!
//! - [`LoggingMiddleware`] - Logs request/response information with credentials redacted
//!
//! ## Usage
//!
//! ```ignore
//! use wechat_work_sdk::middleware::LoggingMiddleware;
//!
//! let wechat = WechatWork::builder()
//!     .corpid(corpid)
//!     .secret(secret)
//!     .with_middleware(LoggingMiddleware::new().verbose())
//!     .build()?;
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;

pub use logging::{LoggingMiddleware, LoggingMiddlewareService};
