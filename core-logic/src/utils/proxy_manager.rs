use crate::config::ProxyConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub struct ProxyManager;

impl ProxyManager {
    pub const PROXY_FILE: &'static str = "proxy.txt";

    /// Loads proxies from a newline-delimited list.
    ///
    /// A missing file is not an error: the caller simply runs direct.
    pub fn load_proxies(path: impl AsRef<Path>) -> Result<Vec<ProxyConfig>> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("{} not found. Running without proxies.", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let proxies = Self::parse(&content);

        if proxies.is_empty() {
            warn!("No proxies found in {}.", path.display());
        } else {
            info!(
                "Loaded {} prox{} from {}",
                proxies.len(),
                if proxies.len() == 1 { "y" } else { "ies" },
                path.display()
            );
        }
        Ok(proxies)
    }

    pub fn parse(content: &str) -> Vec<ProxyConfig> {
        let mut proxies = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match ProxyConfig::parse(line) {
                Ok(proxy) => proxies.push(proxy),
                Err(e) => warn!("Skipping proxy line: {}", e),
            }
        }

        proxies
    }
}
