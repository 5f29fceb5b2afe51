use anyhow::Result;
use config::{Config, Environment, File};
use core_logic::RetryConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct XyberConfig {
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub files: FileConfig,
}

impl XyberConfig {
    /// Loads the TOML file at `path` (optional) and applies `XYBER__*` overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("XYBER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    #[serde(default = "default_auth_host")]
    pub auth_host: String,
    #[serde(default = "default_hub_host")]
    pub hub_host: String,
    #[serde(default = "default_app_origin")]
    pub app_origin: String,
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,
    #[serde(default = "default_network")]
    pub network: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            auth_host: default_auth_host(),
            hub_host: default_hub_host(),
            app_origin: default_app_origin(),
            ip_echo_url: default_ip_echo_url(),
            network: default_network(),
        }
    }
}

impl EndpointConfig {
    pub fn challenge_url(&self) -> String {
        format!("{}/api/auth/challenge", self.auth_host.trim_end_matches('/'))
    }

    pub fn verify_url(&self) -> String {
        format!("{}/api/auth/verify", self.auth_host.trim_end_matches('/'))
    }

    pub fn spinner_url(&self) -> String {
        format!("{}/api/spinner", self.hub_host.trim_end_matches('/'))
    }

    pub fn profile_url(&self) -> String {
        format!("{}/api/user/profile", self.hub_host.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_rate_limit_floor_ms")]
    pub rate_limit_floor_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            rate_limit_floor_ms: default_rate_limit_floor_ms(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_retries, self.initial_backoff_ms)
            .with_rate_limit_floor(self.rate_limit_floor_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    #[serde(default = "default_post_login_delay_secs")]
    pub post_login_delay_secs: u64,
    #[serde(default = "default_step_delay_secs")]
    pub pre_spin_delay_secs: u64,
    #[serde(default = "default_step_delay_secs")]
    pub post_spin_delay_secs: u64,
    #[serde(default = "default_step_delay_secs")]
    pub pre_profile_delay_secs: u64,
    #[serde(default = "default_account_delay_min_secs")]
    pub account_delay_min_secs: u64,
    #[serde(default = "default_account_delay_max_secs")]
    pub account_delay_max_secs: u64,
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            post_login_delay_secs: default_post_login_delay_secs(),
            pre_spin_delay_secs: default_step_delay_secs(),
            post_spin_delay_secs: default_step_delay_secs(),
            pre_profile_delay_secs: default_step_delay_secs(),
            account_delay_min_secs: default_account_delay_min_secs(),
            account_delay_max_secs: default_account_delay_max_secs(),
            cycle_interval_secs: default_cycle_interval_secs(),
        }
    }
}

impl ScheduleConfig {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FileConfig {
    #[serde(default = "default_accounts_file")]
    pub accounts: String,
    #[serde(default = "default_proxies_file")]
    pub proxies: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts_file(),
            proxies: default_proxies_file(),
        }
    }
}

fn default_auth_host() -> String {
    "https://ai-auth-service.xyber.inc".to_string()
}

fn default_hub_host() -> String {
    "https://hub.xyber.inc".to_string()
}

fn default_app_origin() -> String {
    "https://app.xyber.inc".to_string()
}

fn default_ip_echo_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_network() -> String {
    "solana".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    2000
}

fn default_rate_limit_floor_ms() -> u64 {
    5000
}

fn default_post_login_delay_secs() -> u64 {
    2
}

fn default_step_delay_secs() -> u64 {
    5
}

fn default_account_delay_min_secs() -> u64 {
    10
}

fn default_account_delay_max_secs() -> u64 {
    15
}

fn default_cycle_interval_secs() -> u64 {
    24 * 60 * 60
}

fn default_accounts_file() -> String {
    core_logic::WalletManager::PK_FILE.to_string()
}

fn default_proxies_file() -> String {
    core_logic::ProxyManager::PROXY_FILE.to_string()
}
