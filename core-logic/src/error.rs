//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid proxy line: '{line}'")]
    InvalidProxyLine { line: String },
}

/// Private key source errors
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Key file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },

    #[error("No private keys found in {path}")]
    Empty { path: String },
}
