//! Resilient request executor.
//!
//! Every call goes through [`RequestExecutor::execute`], which attaches the
//! browser header set, forwards through the account's proxy and retries
//! server-side failures with exponential backoff.

pub mod headers;
pub mod transport;

pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};

use crate::config::HttpConfig;
use crate::error::{XyberError, XyberResult};
use core_logic::{sleep_or_cancel, ProxyConfig, RetryConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Per-call options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions<'a> {
    pub proxy: Option<&'a ProxyConfig>,
    pub cookies: Option<&'a str>,
    /// Hand 4xx responses (other than 429) back to the caller instead of failing.
    pub accept_client_errors: bool,
}

impl<'a> RequestOptions<'a> {
    pub fn new(proxy: Option<&'a ProxyConfig>) -> Self {
        Self {
            proxy,
            ..Default::default()
        }
    }

    pub fn with_cookies(mut self, cookies: &'a str) -> Self {
        self.cookies = Some(cookies);
        self
    }

    pub fn accept_client_errors(mut self) -> Self {
        self.accept_client_errors = true;
        self
    }

    fn accepts(&self, status: u16) -> bool {
        match status {
            200..=299 => true,
            429 => false,
            400..=499 => self.accept_client_errors,
            _ => false,
        }
    }
}

pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    retry: RetryConfig,
    timeout: Duration,
    origin: String,
    cancel: CancellationToken,
}

impl RequestExecutor {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        http: &HttpConfig,
        origin: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            retry: http.retry_config(),
            timeout: http.timeout(),
            origin: origin.into(),
            cancel,
        }
    }

    pub async fn get(&self, url: &str, options: RequestOptions<'_>) -> XyberResult<HttpResponse> {
        self.execute(Method::Get, url, None, options).await
    }

    pub async fn post(
        &self,
        url: &str,
        payload: &serde_json::Value,
        options: RequestOptions<'_>,
    ) -> XyberResult<HttpResponse> {
        self.execute(Method::Post, url, Some(payload), options).await
    }

    /// Sends one logical request.
    ///
    /// 5xx and 429 responses are retried while attempts remain; every other
    /// failure is returned immediately.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        payload: Option<&serde_json::Value>,
        options: RequestOptions<'_>,
    ) -> XyberResult<HttpResponse> {
        let mut backoff = self.retry.backoff();

        loop {
            if self.cancel.is_cancelled() {
                return Err(XyberError::Cancelled);
            }

            let request = HttpRequest {
                method,
                url: url.to_string(),
                headers: headers::browser_headers(&self.origin, options.cookies),
                body: payload.cloned(),
                proxy: options.proxy.cloned(),
                timeout: self.timeout,
            };

            let failure = match self.transport.send(request).await {
                Ok(response) if options.accepts(response.status) => return Ok(response),
                Ok(response) => XyberError::from_status(response.status, response.body),
                Err(e) => e,
            };
            error!("Request failed: {}", failure);

            if !failure.is_retryable() {
                return Err(failure);
            }

            let Some(delay) = backoff.next_delay(failure.is_rate_limited()) else {
                return Err(failure);
            };
            warn!(
                "🔄 Retrying {} {} ({}/{}) due to server error or rate limit",
                method,
                url,
                backoff.attempts(),
                backoff.max_attempts()
            );
            if !sleep_or_cancel(delay, &self.cancel).await {
                return Err(XyberError::Cancelled);
            }
        }
    }
}
