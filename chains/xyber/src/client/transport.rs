use crate::error::{XyberError, XyberResult};
use async_trait::async_trait;
use core_logic::ProxyConfig;
use reqwest::{Client, Proxy};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// One outbound attempt.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
    pub proxy: Option<ProxyConfig>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> XyberResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| XyberError::Protocol(format!("malformed body ({}): {}", e, self.body)))
    }
}

/// Network side of the request executor.
///
/// Implementations return `Ok` for every response that arrived, including
/// error statuses, and `Err(Transport)` only when no response was received.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> XyberResult<HttpResponse>;
}

/// `reqwest` transport with one pooled client per proxy.
///
/// Clients are keyed on the full proxy entry, credentials included, so
/// gateway lines sharing a `host:port` keep separate sessions.
#[derive(Default)]
pub struct ReqwestTransport {
    clients: RwLock<HashMap<Option<ProxyConfig>, Client>>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    async fn client_for(&self, proxy: Option<&ProxyConfig>) -> XyberResult<Client> {
        let key = proxy.cloned();
        {
            let clients = self.clients.read().await;
            if let Some(client) = clients.get(&key) {
                return Ok(client.clone());
            }
        }

        let client = build_client(proxy)?;
        self.clients.write().await.insert(key, client.clone());
        Ok(client)
    }
}

/// Builds a client forwarding through `proxy`.
///
/// Proxies with an unknown scheme, or that reqwest refuses, are skipped with
/// a warning and the client connects directly.
pub fn build_client(proxy: Option<&ProxyConfig>) -> XyberResult<Client> {
    let mut client_builder = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(5);

    if let Some(proxy_config) = proxy {
        match configure_proxy(proxy_config) {
            Some(proxy) => {
                debug!("Routing through {}", proxy_config.display_url());
                client_builder = client_builder.proxy(proxy);
            }
            None => client_builder = client_builder.no_proxy(),
        }
    }

    client_builder
        .build()
        .map_err(|e| XyberError::Transport(format!("Failed to build reqwest client: {}", e)))
}

fn configure_proxy(proxy_config: &ProxyConfig) -> Option<Proxy> {
    if proxy_config.scheme().is_none() {
        warn!("Unsupported proxy: {}", proxy_config.display_url());
        return None;
    }

    let proxy = match Proxy::all(&proxy_config.url) {
        Ok(proxy) => proxy,
        Err(e) => {
            warn!(
                "Unsupported proxy: {} ({}). Connecting directly.",
                proxy_config.display_url(),
                e
            );
            return None;
        }
    };

    match (&proxy_config.username, &proxy_config.password) {
        (Some(username), Some(password)) => Some(proxy.basic_auth(username, password)),
        _ => Some(proxy),
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> XyberResult<HttpResponse> {
        let client = self.client_for(request.proxy.as_ref()).await?;

        let mut builder = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
        };
        builder = builder.timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| XyberError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| XyberError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
