use crate::error::WalletError;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A private key exactly as it appears in the key file.
///
/// The buffer is wiped on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***REDACTED***)")
    }
}

/// Ordered list of private keys, one account per key.
pub struct WalletManager {
    keys: Vec<SecretKey>,
}

impl WalletManager {
    pub const PK_FILE: &'static str = "pk.txt";

    /// Reads the key file. Every non-empty trimmed line is one key; `#` starts a comment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(WalletError::FileNotFound { path: display });
        }

        let mut content = fs::read_to_string(path).map_err(|e| WalletError::IoError {
            path: display.clone(),
            msg: e.to_string(),
        })?;
        let manager = Self::parse(&content);
        content.zeroize();

        if manager.is_empty() {
            return Err(WalletError::Empty { path: display });
        }

        info!(
            "Loaded {} account{}",
            manager.count(),
            if manager.count() == 1 { "" } else { "s" }
        );
        Ok(manager)
    }

    pub fn parse(content: &str) -> Self {
        let keys = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(SecretKey::new)
            .collect();
        Self { keys }
    }

    /// Returns the number of available wallets
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[SecretKey] {
        &self.keys
    }
}
