//! # Core Logic - Shared Utilities for Account Bots
//!
//! This crate provides the pieces every service crate in the workspace needs:
//! loading keys and proxies, logging, retry pacing and graceful shutdown.
//!
//! ## Modules
//!
//! - [`config`] - Proxy configuration shared by all service crates
//! - [`error`] - Typed error handling with thiserror
//! - [`utils`] - Utility modules (wallet, proxy, retry, pacing, logging)

// Module declarations - internal modules marked pub(crate)
pub mod config;
pub mod error;
pub(crate) mod utils;

// Selective exports - only public API types
pub use config::{ProxyConfig, ProxyScheme};
pub use error::{ConfigError, WalletError};

// Utils are pub(crate) - only export specific public utilities
pub use utils::{
    random_delay, setup_logger, sleep_or_cancel, ProxyManager, SecretKey, WalletManager,
    WorkerRunner,
};

// Export retry utilities for testing
pub use utils::retry::{Backoff, RetryConfig};
