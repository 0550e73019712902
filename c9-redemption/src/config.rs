//! Configuration management for the redemption calculator

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RedemptionConfig {
    #[validate]
    pub gateway: GatewayConfig,
    #[validate]
    pub fetch: FetchConfig,
    pub logging: LoggingConfig,
}

/// Radix network the gateway belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Stokenet,
}

impl Network {
    pub fn default_gateway_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://mainnet.radixdlt.com",
            Network::Stokenet => "https://stokenet.radixdlt.com",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    pub network: Network,
    /// Overrides the network's public gateway
    #[validate(url)]
    pub url: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub application_name: String,
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1, max = 60))]
    pub connect_timeout_secs: u64,
}

/// Pagination, chunking and throttling of ledger reads
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FetchConfig {
    #[validate(range(min = 1, max = 1000))]
    pub page_size: usize,
    #[validate(range(min = 1, max = 1000))]
    pub chunk_size: usize,
    #[validate(range(max = 60000))]
    pub chunk_delay_ms: u64,
    #[validate(range(min = 1, max = 600))]
    pub call_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            url: None,
            application_name: "C9 Redemption Calculator".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            chunk_size: 100,
            chunk_delay_ms: 1000,
            call_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl GatewayConfig {
    pub fn base_url(&self) -> &str {
        self.url
            .as_deref()
            .unwrap_or_else(|| self.network.default_gateway_url())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl FetchConfig {
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl RedemptionConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.check()?;

        Ok(config)
    }

    /// Validate field ranges
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))
    }
}
