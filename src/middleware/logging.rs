//! Request logging through the `log` facade.
//!
//! One line per request and one per response (or transport failure).
//! Credentials in the query string are replaced with `[REDACTED]` before
//! anything is logged.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use log::{debug, info, warn};
use reqwest::{Request, Response, Url};
use tower::{Layer, Service};

const SENSITIVE_PARAMS: &[&str] = &[
    "access_token",
    "corpsecret",
    "secret",
    "token",
    "password",
    "authorization",
];

/// Tower layer logging method, redacted URL, status and latency.
///
/// Logs at `info` by default; [`verbose`](Self::verbose) switches to `debug`
/// with direction markers.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    verbose: bool,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl<S> Layer<S> for LoggingMiddleware
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Service = LoggingMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddlewareService {
            inner,
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingMiddlewareService<S> {
    inner: S,
    verbose: bool,
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_PARAMS.iter().any(|s| key.eq_ignore_ascii_case(s))
}

/// Copy of `url` with sensitive query values replaced.
pub(crate) fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if is_sensitive(&k) {
                "[REDACTED]".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

impl<S, Error> Service<Request> for LoggingMiddlewareService<S>
where
    S: Service<Request, Response = Response, Error = Error> + Send + Clone + 'static,
    S::Future: Send,
    Error: std::fmt::Display + Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().clone();
        let safe_url = redact_url(req.url());
        let verbose = self.verbose;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if verbose {
                debug!("[WechatWork] >>> {} {}", method, safe_url);
            } else {
                info!("[WechatWork] {} {}", method, safe_url);
            }

            let start = Instant::now();
            let result = inner.call(req).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(response) if verbose => {
                    debug!("[WechatWork] <<< {} ({:?})", response.status(), elapsed)
                }
                Ok(response) => info!("[WechatWork] {} ({:?})", response.status(), elapsed),
                Err(e) => warn!(
                    "[WechatWork] {} {} failed after {:?}: {}",
                    method, safe_url, elapsed, e
                ),
            }

            result
        })
    }
}
