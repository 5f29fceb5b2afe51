//! # Xyber daily spin bot
//!
//! Logs each configured Solana account into the Xyber hub with a signed
//! challenge, claims the daily spin and reports the account's XP, one
//! account at a time, once per day.
//!
//! - [`identity`] - address derivation and challenge signing
//! - [`client`] - browser-like HTTP with retry and proxy support
//! - [`auth`] - challenge/verify login handshake
//! - [`actions`] - daily spin, profile and egress IP lookups
//! - [`scheduler`] - the sequential account cycle and daily loop

pub mod actions;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod scheduler;

pub use error::{XyberError, XyberResult};
