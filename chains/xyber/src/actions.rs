//! Authenticated hub calls: the daily spin and the profile read.

use crate::auth::Session;
use crate::client::{RequestExecutor, RequestOptions};
use crate::config::EndpointConfig;
use crate::error::{XyberError, XyberResult};
use core_logic::ProxyConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// Error string the hub returns when the daily spin was already used.
pub const ALREADY_SPUN: &str = "user have already spun today";

pub const UNKNOWN_IP: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinOutcome {
    Performed { xp_reward: String },
    AlreadyDone,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountStatus {
    pub points: f64,
}

#[derive(Debug, Deserialize)]
struct HubEnvelope<T> {
    #[serde(default)]
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpinData {
    #[serde(rename = "xpReward")]
    xp_reward: Value,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    xp: f64,
}

#[derive(Debug, Deserialize)]
struct IpEcho {
    ip: Option<String>,
}

/// Strips a trailing unit suffix such as the `p` in `"50p"`.
pub fn normalize_reward(raw: &Value) -> String {
    match raw {
        Value::String(s) => s
            .trim()
            .trim_end_matches(|c: char| !c.is_ascii_digit())
            .to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

pub struct AccountActions<'a> {
    executor: &'a RequestExecutor,
    endpoints: &'a EndpointConfig,
}

impl<'a> AccountActions<'a> {
    pub fn new(executor: &'a RequestExecutor, endpoints: &'a EndpointConfig) -> Self {
        Self {
            executor,
            endpoints,
        }
    }

    /// Performs the daily spin.
    ///
    /// An "already spun" 400 is a normal outcome, not an error.
    pub async fn daily_action(
        &self,
        session: &Session,
        proxy: Option<&ProxyConfig>,
    ) -> XyberResult<SpinOutcome> {
        let cookies = session.cookie_header();
        let options = RequestOptions::new(proxy)
            .with_cookies(&cookies)
            .accept_client_errors();

        let response = self
            .executor
            .post(&self.endpoints.spinner_url(), &json!({}), options)
            .await?;
        let envelope: Option<HubEnvelope<SpinData>> = response.json().ok();

        match (response.status, envelope) {
            (
                200,
                Some(HubEnvelope {
                    ok: true,
                    data: Some(data),
                    ..
                }),
            ) => {
                let xp_reward = normalize_reward(&data.xp_reward);
                info!("✅ Spin successful! Gained {} XP", xp_reward);
                Ok(SpinOutcome::Performed { xp_reward })
            }
            (
                400,
                Some(HubEnvelope {
                    error: Some(message),
                    ..
                }),
            ) if message == ALREADY_SPUN => {
                warn!("Already spun today");
                Ok(SpinOutcome::AlreadyDone)
            }
            (status, _) => Err(XyberError::Protocol(format!(
                "Status: {} | Body: {}",
                status, response.body
            ))),
        }
    }

    pub async fn fetch_status(
        &self,
        session: &Session,
        proxy: Option<&ProxyConfig>,
    ) -> XyberResult<AccountStatus> {
        let cookies = session.cookie_header();
        let options = RequestOptions::new(proxy).with_cookies(&cookies);

        let response = self
            .executor
            .get(&self.endpoints.profile_url(), options)
            .await?;
        let envelope: HubEnvelope<ProfileData> = response.json()?;
        match envelope {
            HubEnvelope {
                ok: true,
                data: Some(profile),
                ..
            } => {
                info!("✅ Profile fetched successfully");
                Ok(AccountStatus { points: profile.xp })
            }
            _ => Err(XyberError::Protocol("Failed to fetch profile".to_string())),
        }
    }

    /// Egress IP as seen by the echo service. Never fails.
    pub async fn fetch_public_ip(&self, proxy: Option<&ProxyConfig>) -> String {
        let result = self
            .executor
            .get(&self.endpoints.ip_echo_url, RequestOptions::new(proxy))
            .await
            .and_then(|response| response.json::<IpEcho>());

        match result {
            Ok(IpEcho { ip: Some(ip) }) if !ip.is_empty() => ip,
            Ok(_) => UNKNOWN_IP.to_string(),
            Err(e) => {
                error!("Failed to get IP: {}", e);
                UNKNOWN_IP.to_string()
            }
        }
    }
}
