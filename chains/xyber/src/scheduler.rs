//! Sequential account cycle and the daily loop around it.

use crate::actions::{AccountActions, AccountStatus, SpinOutcome};
use crate::auth::Authenticator;
use crate::client::{HttpTransport, RequestExecutor};
use crate::config::XyberConfig;
use crate::error::{XyberError, XyberResult};
use crate::identity::{mask_address, SigningIdentity};
use core_logic::{random_delay, sleep_or_cancel, ProxyConfig, SecretKey, WalletManager};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};

/// Proxy settings fixed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct CycleState {
    use_proxy: bool,
    proxies: Vec<ProxyConfig>,
}

impl CycleState {
    /// Proxying is switched off when the list is empty.
    pub fn new(use_proxy: bool, proxies: Vec<ProxyConfig>) -> Self {
        if use_proxy && proxies.is_empty() {
            warn!("No proxies available, proceeding without proxy.");
        }
        Self {
            use_proxy: use_proxy && !proxies.is_empty(),
            proxies,
        }
    }

    pub fn direct() -> Self {
        Self::default()
    }

    pub fn use_proxy(&self) -> bool {
        self.use_proxy
    }

    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Round-robin assignment: account `index` gets proxy `index mod N`.
    pub fn proxy_for(&self, index: usize) -> Option<&ProxyConfig> {
        if !self.use_proxy || self.proxies.is_empty() {
            return None;
        }
        self.proxies.get(index % self.proxies.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountOutcome {
    LoginFailed,
    Completed {
        spin: Option<SpinOutcome>,
        status: Option<AccountStatus>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub already_done: usize,
}

impl CycleReport {
    fn record(&mut self, result: &XyberResult<AccountOutcome>) {
        self.processed += 1;
        match result {
            Ok(AccountOutcome::Completed {
                spin: Some(SpinOutcome::Performed { .. }),
                ..
            }) => self.succeeded += 1,
            Ok(AccountOutcome::Completed {
                spin: Some(SpinOutcome::AlreadyDone),
                ..
            }) => self.already_done += 1,
            _ => self.failed += 1,
        }
    }
}

pub struct Scheduler {
    config: XyberConfig,
    state: CycleState,
    executor: RequestExecutor,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(
        config: XyberConfig,
        state: CycleState,
        transport: Arc<dyn HttpTransport>,
        cancel: CancellationToken,
    ) -> Self {
        let executor = RequestExecutor::new(
            transport,
            &config.http,
            config.endpoints.app_origin.clone(),
            cancel.clone(),
        );
        Self {
            config,
            state,
            executor,
            cancel,
        }
    }

    /// Cycles forever, waiting the configured interval between cycles.
    ///
    /// Returns only once the cancellation token fires.
    pub async fn run_forever(&self) {
        loop {
            let report = self.run_cycle().await;
            info!(
                "Cycle summary: {} processed, {} spun, {} already spun, {} failed",
                report.processed, report.succeeded, report.already_done, report.failed
            );

            if self.cancel.is_cancelled() {
                info!("Shutdown requested, stopping scheduler.");
                return;
            }

            let interval = self.config.schedule.cycle_interval();
            info!(
                "🔄 Cycle completed. Waiting {:.1} hours...",
                interval.as_secs_f64() / 3600.0
            );
            if !sleep_or_cancel(interval, &self.cancel).await {
                info!("Shutdown requested, stopping scheduler.");
                return;
            }
        }
    }

    /// One pass over every account in the key file, strictly in order.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let wallets = match WalletManager::load(&self.config.files.accounts) {
            Ok(wallets) => wallets,
            Err(e) => {
                error!("{}. Exiting cycle.", e);
                return report;
            }
        };

        let total = wallets.count();
        for (index, key) in wallets.keys().iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }

            let proxy = self.state.proxy_for(index);
            let span = info_span!("account", ctx = %format!("Account {}/{}", index + 1, total));

            let result = self
                .process_account(key, proxy)
                .instrument(span.clone())
                .await;
            report.record(&result);

            match result {
                Err(XyberError::Cancelled) => break,
                Err(e) => span.in_scope(|| error!("Error processing account: {}", e)),
                Ok(_) => {}
            }

            let pause = random_delay(
                self.config.schedule.account_delay_min_secs,
                self.config.schedule.account_delay_max_secs,
            );
            if !sleep_or_cancel(pause, &self.cancel).await {
                break;
            }
        }

        report
    }

    /// Login, spin and profile read for a single account.
    pub async fn process_account(
        &self,
        key: &SecretKey,
        proxy: Option<&ProxyConfig>,
    ) -> XyberResult<AccountOutcome> {
        info!("🚀 Starting account processing");
        let schedule = &self.config.schedule;
        let auth = Authenticator::new(&self.executor, &self.config.endpoints);
        let actions = AccountActions::new(&self.executor, &self.config.endpoints);

        let identity = SigningIdentity::from_base58(key.expose())?;
        let address = identity.address();
        info!("📍 {:<15}: {}", "Wallet Address", mask_address(&address));
        let ip = actions.fetch_public_ip(proxy).await;
        info!("📍 {:<15}: {}", "IP", ip);

        info!("🔑 Starting Login Process...");
        let session = auth.perform_login(&identity, proxy).await;
        drop(identity);
        let Some(session) = session else {
            self.ensure_running()?;
            error!("Login failed, skipping account for this cycle");
            return Ok(AccountOutcome::LoginFailed);
        };
        self.pause(schedule.post_login_delay_secs).await?;

        info!("🎰 Starting Daily Spin Process...");
        self.pause(schedule.pre_spin_delay_secs).await?;
        let spin = match actions.daily_action(&session, proxy).await {
            Ok(outcome) => Some(outcome),
            Err(XyberError::Cancelled) => return Err(XyberError::Cancelled),
            Err(e) => {
                error!("Spin failed: {}", e);
                None
            }
        };
        if matches!(spin, Some(SpinOutcome::Performed { .. })) {
            self.pause(schedule.post_spin_delay_secs).await?;
        }

        self.pause(schedule.pre_profile_delay_secs).await?;
        let status = match actions.fetch_status(&session, proxy).await {
            Ok(status) => {
                info!("📍 {:<15}: {}", "Wallet Address", mask_address(&address));
                info!("📍 {:<15}: {}", "Total XP", status.points);
                Some(status)
            }
            Err(XyberError::Cancelled) => return Err(XyberError::Cancelled),
            Err(e) => {
                error!("Profile fetch failed: {}", e);
                None
            }
        };

        info!("🎉 Completed account processing");
        Ok(AccountOutcome::Completed { spin, status })
    }

    async fn pause(&self, secs: u64) -> XyberResult<()> {
        if sleep_or_cancel(Duration::from_secs(secs), &self.cancel).await {
            Ok(())
        } else {
            Err(XyberError::Cancelled)
        }
    }

    fn ensure_running(&self) -> XyberResult<()> {
        if self.cancel.is_cancelled() {
            Err(XyberError::Cancelled)
        } else {
            Ok(())
        }
    }
}
