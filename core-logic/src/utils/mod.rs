//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

// Internal modules - not part of public API
pub(crate) mod logger;
pub(crate) mod pacing;
pub(crate) mod proxy_manager;
pub(crate) mod retry;
pub(crate) mod runner;
pub(crate) mod wallet_manager;

// Selective exports - only public utilities
pub use logger::setup_logger;
pub use pacing::{random_delay, sleep_or_cancel};
pub use proxy_manager::ProxyManager;
pub use runner::WorkerRunner;
pub use wallet_manager::{SecretKey, WalletManager};
