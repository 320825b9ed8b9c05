use serde_json::Value;

/// Read-only helpers over a raw WeChat Work response body.
///
/// API operations return the body untouched; these helpers are for callers
/// that want to branch on the remote `errcode`.
pub trait ApiResponseExt {
    /// `errcode` field, `0` when absent.
    fn errcode(&self) -> i64;

    /// `errmsg` field, empty when absent.
    fn errmsg(&self) -> &str;

    fn is_success(&self) -> bool {
        self.errcode() == 0
    }
}

impl ApiResponseExt for Value {
    fn errcode(&self) -> i64 {
        self.get("errcode").and_then(Value::as_i64).unwrap_or(0)
    }

    fn errmsg(&self) -> &str {
        self.get("errmsg").and_then(Value::as_str).unwrap_or("")
    }
}
