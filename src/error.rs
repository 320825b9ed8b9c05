use std::sync::Arc;

use thiserror::Error;

/// Transport-level failures
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("{0}")]
    Reqwest(Arc<reqwest::Error>),

    #[error("response decode error: {0}")]
    Decode(String),
}

/// WeChat Work SDK error types
///
/// Business failures reported by the remote service (`errcode != 0`) are not
/// errors for API operations: they come back as ordinary JSON values. Only the
/// token endpoint turns a non-zero `errcode` into [`WechatError::Api`].
#[derive(Debug, Error)]
pub enum WechatError {
    #[error("HTTP request error: {0}")]
    Http(#[from] HttpError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WeChat API error (code={code}): {message}")]
    Api { code: i32, message: String },

    #[error("Access token error: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WechatError {
    fn from(error: reqwest::Error) -> Self {
        WechatError::Http(HttpError::Reqwest(Arc::new(error)))
    }
}

impl WechatError {
    /// Turn a non-zero `errcode` into [`WechatError::Api`].
    pub fn check_api(errcode: i32, errmsg: &str) -> Result<(), WechatError> {
        if errcode != 0 {
            return Err(WechatError::Api {
                code: errcode,
                message: errmsg.to_string(),
            });
        }
        Ok(())
    }

    /// Whether the failure happened below the API layer (network, status, decode).
    pub fn is_transport(&self) -> bool {
        matches!(self, WechatError::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_api_success() {
        assert!(WechatError::check_api(0, "ok").is_ok());
    }

    #[test]
    fn test_check_api_error() {
        let err = WechatError::check_api(40013, "invalid corpid").unwrap_err();
        match err {
            WechatError::Api { code, message } => {
                assert_eq!(code, 40013);
                assert_eq!(message, "invalid corpid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_display_decode_error() {
        let err = WechatError::Http(HttpError::Decode("expected value".into()));
        assert_eq!(
            err.to_string(),
            "HTTP request error: response decode error: expected value"
        );
        assert!(err.is_transport());
        assert!(!WechatError::Token("empty".into()).is_transport());
    }
}
