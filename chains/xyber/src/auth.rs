//! Challenge/sign/verify login.

use crate::client::{RequestExecutor, RequestOptions};
use crate::config::EndpointConfig;
use crate::error::{XyberError, XyberResult};
use crate::identity::SigningIdentity;
use core_logic::ProxyConfig;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use tracing::{debug, error, info};
use url::Url;

/// Tokens returned by a successful verify. Valid for one account pass.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    /// Value of the `cookie` header for hub requests.
    pub fn cookie_header(&self) -> String {
        format!(
            "access_token={}; refresh_token={}",
            self.access_token, self.refresh_token
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***REDACTED***")
            .field("refresh_token", &"***REDACTED***")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    ChallengeRequested,
    Signed,
    Verified,
    Failed,
}

#[derive(Debug, Deserialize)]
struct AuthEnvelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ChallengeData {
    challenge: String,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    access_token: String,
    refresh_token: String,
}

pub struct Authenticator<'a> {
    executor: &'a RequestExecutor,
    endpoints: &'a EndpointConfig,
}

impl<'a> Authenticator<'a> {
    pub fn new(executor: &'a RequestExecutor, endpoints: &'a EndpointConfig) -> Self {
        Self {
            executor,
            endpoints,
        }
    }

    /// Runs the handshake and returns a session, or `None` if any step failed.
    ///
    /// Failures are logged here; the caller only needs to abandon the account.
    pub async fn perform_login(
        &self,
        identity: &SigningIdentity,
        proxy: Option<&ProxyConfig>,
    ) -> Option<Session> {
        let mut state = HandshakeState::Idle;
        match self.login(identity, proxy, &mut state).await {
            Ok(session) => {
                info!("✅ Login Successfully");
                Some(session)
            }
            Err(e) => {
                error!("❌ Login failed: {}", e);
                debug!("Handshake stopped after {:?}", state);
                None
            }
        }
    }

    async fn login(
        &self,
        identity: &SigningIdentity,
        proxy: Option<&ProxyConfig>,
        state: &mut HandshakeState,
    ) -> XyberResult<Session> {
        let address = identity.address();
        let options = RequestOptions::new(proxy);

        *state = HandshakeState::ChallengeRequested;
        let challenge = match self.fetch_challenge(&address, options).await {
            Ok(challenge) => challenge,
            Err(e) => {
                *state = HandshakeState::Failed;
                return Err(e);
            }
        };
        info!("✅ Challenge fetched successfully");

        let signature = identity.sign(&challenge);
        *state = HandshakeState::Signed;

        match self.verify(&address, &signature, options).await {
            Ok(session) => {
                *state = HandshakeState::Verified;
                Ok(session)
            }
            Err(e) => {
                *state = HandshakeState::Failed;
                Err(e)
            }
        }
    }

    async fn fetch_challenge(
        &self,
        address: &str,
        options: RequestOptions<'_>,
    ) -> XyberResult<String> {
        let url = Url::parse_with_params(
            &self.endpoints.challenge_url(),
            &[("address", address), ("network", self.endpoints.network.as_str())],
        )
        .map_err(|e| XyberError::Protocol(format!("invalid challenge url: {}", e)))?;

        let response = self.executor.get(url.as_str(), options).await?;
        let envelope: AuthEnvelope<ChallengeData> = response.json()?;
        match envelope {
            AuthEnvelope {
                success: true,
                data: Some(data),
            } => Ok(data.challenge),
            _ => Err(XyberError::Protocol("Failed to get challenge".to_string())),
        }
    }

    async fn verify(
        &self,
        address: &str,
        signature: &str,
        options: RequestOptions<'_>,
    ) -> XyberResult<Session> {
        let payload = json!({ "address": address, "signature": signature });
        let response = self
            .executor
            .post(&self.endpoints.verify_url(), &payload, options)
            .await?;
        let envelope: AuthEnvelope<TokenData> = response.json()?;
        match envelope {
            AuthEnvelope {
                success: true,
                data: Some(tokens),
            } => Ok(Session {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            }),
            _ => Err(XyberError::Protocol(
                "Login verification failed".to_string(),
            )),
        }
    }
}
