#![allow(dead_code)]

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use xyber_project::client::{HttpRequest, HttpResponse, HttpTransport, Method, RequestExecutor};
use xyber_project::config::{EndpointConfig, HttpConfig, XyberConfig};
use xyber_project::XyberResult;

pub const AUTH_HOST: &str = "http://auth.test";
pub const HUB_HOST: &str = "http://hub.test";
pub const IP_URL: &str = "http://ip.test/?format=json";

type Responder = dyn Fn(&HttpRequest) -> XyberResult<HttpResponse> + Send + Sync;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub at: Instant,
    pub method: Method,
    pub url: String,
    pub cookie: Option<String>,
    pub body: Option<serde_json::Value>,
    pub proxy: Option<String>,
}

/// Transport that answers from a closure and records every attempt.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    log: Mutex<Vec<Recorded>>,
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> XyberResult<HttpResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            log: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        })
    }

    /// Cancels `token` once `count` requests have been answered.
    pub fn cancel_after(&self, count: usize, token: CancellationToken) {
        *self.cancel_after.lock().unwrap() = Some((count, token));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn count_matching(&self, fragment: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.contains(fragment))
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> XyberResult<HttpResponse> {
        let count = {
            let mut log = self.log.lock().unwrap();
            log.push(Recorded {
                at: Instant::now(),
                method: request.method,
                url: request.url.clone(),
                cookie: request.header("cookie").map(str::to_string),
                body: request.body.clone(),
                proxy: request.proxy.as_ref().map(|p| p.url.clone()),
            });
            log.len()
        };

        let response = (self.responder)(&request);

        if let Some((limit, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if count >= *limit {
                token.cancel();
            }
        }
        response
    }
}

/// Route table answering the happy path of every endpoint.
pub fn happy_service(request: &HttpRequest) -> XyberResult<HttpResponse> {
    let body = if request.url.starts_with(IP_URL) {
        r#"{"ip":"203.0.113.7"}"#
    } else if request.url.contains("/api/auth/challenge") {
        r#"{"success":true,"data":{"challenge":"sign-me-please"}}"#
    } else if request.url.contains("/api/auth/verify") {
        r#"{"success":true,"data":{"access_token":"acc-token","refresh_token":"ref-token"}}"#
    } else if request.url.contains("/api/spinner") {
        r#"{"ok":true,"data":{"xpReward":"50p"}}"#
    } else if request.url.contains("/api/user/profile") {
        r#"{"ok":true,"data":{"xp":1250}}"#
    } else {
        return Ok(HttpResponse::new(404, "not found"));
    };
    Ok(HttpResponse::new(200, body))
}

pub fn test_endpoints() -> EndpointConfig {
    EndpointConfig {
        auth_host: AUTH_HOST.to_string(),
        hub_host: HUB_HOST.to_string(),
        app_origin: "http://app.test".to_string(),
        ip_echo_url: IP_URL.to_string(),
        network: "solana".to_string(),
    }
}

pub fn test_config() -> XyberConfig {
    XyberConfig {
        endpoints: test_endpoints(),
        ..Default::default()
    }
}

pub fn executor(transport: Arc<ScriptedTransport>, http: HttpConfig) -> RequestExecutor {
    RequestExecutor::new(transport, &http, "http://app.test", CancellationToken::new())
}

/// Deterministic signing key built from a single repeated byte.
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

/// Base58 64-byte keypair string, the format Solana wallets export.
pub fn keypair_base58(seed: u8) -> String {
    bs58::encode(signing_key(seed).to_keypair_bytes()).into_string()
}

pub fn address_of(seed: u8) -> String {
    bs58::encode(signing_key(seed).verifying_key().as_bytes()).into_string()
}
