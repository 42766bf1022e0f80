use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::currency::default_currencies;

pub const DEFAULT_COINMARKETCAP_URL: &str = "https://api.coinmarketcap.com/v1/ticker/ethereum/";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenExchangeRatesConfig {
    pub base_url: String,
    pub app_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinMarketCapConfig {
    pub base_url: String,
}

impl Default for CoinMarketCapConfig {
    fn default() -> Self {
        CoinMarketCapConfig {
            base_url: DEFAULT_COINMARKETCAP_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub openexchangerates: OpenExchangeRatesConfig,
    #[serde(default)]
    pub coinmarketcap: CoinMarketCapConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
    pub update_interval_ms: u64,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxfeed", "fxfeed")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.update_interval_ms == 0 {
            bail!("update_interval_ms must be greater than zero");
        }
        if self.currencies.is_empty() {
            bail!("currencies must list at least one code");
        }
        if let Some(code) = self
            .currencies
            .iter()
            .find(|c| c.is_empty() || c.chars().any(|ch| !ch.is_ascii_uppercase()))
        {
            bail!("currency code '{code}' must be uppercase ASCII letters");
        }
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
