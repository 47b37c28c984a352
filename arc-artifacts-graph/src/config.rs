//! Runtime configuration loaded from `config.toml`.
//!
//! Provides an ordered RPC endpoint list used with automatic fallback
//! (if the primary RPC fails, the next one is tried) plus an optional
//! scan-start override. When no config file is present the network's
//! built-in defaults are used.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// RPC endpoint settings.
    #[serde(default)]
    pub rpc: RpcConfig,
    /// Graph reconstruction settings.
    #[serde(default)]
    pub graph: GraphConfig,
}

/// RPC endpoint list.
#[derive(Debug, Default, Deserialize)]
pub struct RpcConfig {
    /// Ordered list of RPC URLs (best first).
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Reconstruction bounds.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct GraphConfig {
    /// First block to scan, overriding the deployment block.
    pub from_block: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Returns [`Config::default`] if the file does not exist, allowing
    /// the binary to work without any config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Return the RPC URL list, falling back to the built-in default when
    /// the config names none.
    #[must_use]
    pub fn rpc_urls(&self, default_rpc: &str) -> Vec<String> {
        if self.rpc.urls.is_empty() {
            vec![default_rpc.to_owned()]
        } else {
            self.rpc.urls.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.rpc.urls.is_empty(), "no configured URLs");
        assert_eq!(config.graph.from_block, None, "no scan override");
        assert_eq!(
            config.rpc_urls("https://rpc.example"),
            vec!["https://rpc.example".to_owned()],
            "default RPC is used when none is configured"
        );
    }

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            [rpc]
            urls = ["https://a.example", "https://b.example"]

            [graph]
            from_block = 26000000
            "#,
        )
        .unwrap();
        assert_eq!(
            config.rpc_urls("https://default.example"),
            vec!["https://a.example".to_owned(), "https://b.example".to_owned()],
            "configured URLs win over the default"
        );
        assert_eq!(config.graph.from_block, Some(26_000_000), "scan override parsed");
    }

    #[test]
    fn partial_config_is_fine() {
        let config: Config = toml::from_str("[rpc]\nurls = []\n").unwrap();
        assert!(config.rpc.urls.is_empty(), "explicit empty list parses");
        assert_eq!(config.graph.from_block, None, "absent sections default");
    }
}
