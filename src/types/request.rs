//! Request descriptor shared by every API operation.

use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use serde_json::Value;

use crate::error::WechatError;

/// Characters that must be encoded in query parameter values.
const QUERY_VALUE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'&')
    .add(b'=')
    .add(b'%')
    .add(b'+')
    .add(b'#');

/// One outbound call: method, endpoint path, query string and optional JSON body.
///
/// The first query pair is always `access_token`. A descriptor can only be
/// extended while it is being built (the `query` method consumes `self`) and
/// exposes read-only accessors afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestDescriptor {
    /// GET request with the access token as the only query parameter so far.
    pub fn get(path: impl Into<String>, access_token: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: vec![("access_token".to_string(), access_token.to_string())],
            body: None,
        }
    }

    /// POST request carrying `body` serialized as JSON.
    pub fn post_json<B: Serialize + ?Sized>(
        path: impl Into<String>,
        access_token: &str,
        body: &B,
    ) -> Result<Self, WechatError> {
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            query: vec![("access_token".to_string(), access_token.to_string())],
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value for `key` in the query string, if any.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Full URL against `base_url`, query values percent-encoded.
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if self.query.is_empty() {
            return format!("{}{}", base, self.path);
        }

        let query = self
            .query
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_VALUE_ENCODE_SET),
                    utf8_percent_encode(v, QUERY_VALUE_ENCODE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        format!("{}{}?{}", base, self.path, query)
    }
}
