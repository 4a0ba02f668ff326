use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use super::currency::{Currency, CurrencyPair};
use super::edit_stream::DEFAULT_DEBOUNCE;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Frankfurter,
    CurrencyBeacon,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyBeaconProviderConfig {
    pub base_url: String,
    pub api_token: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<FrankfurterProviderConfig>,
    pub currency_beacon: Option<CurrencyBeaconProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(FrankfurterProviderConfig {
                base_url: "https://api.frankfurter.app".to_string(),
            }),
            currency_beacon: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PairConfig {
    pub from: Currency,
    pub to: Currency,
}

impl PairConfig {
    pub fn to_pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from.clone(), self.to.clone())
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub default_pair: Option<PairConfig>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderKind::default(),
            providers: ProvidersConfig::default(),
            default_pair: Some(PairConfig {
                from: Currency::new("USD", "$").with_amount(100.0),
                to: Currency::new("GBP", "£"),
            }),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or built-in defaults when the
    /// file has not been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxpair")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider: currency_beacon
providers:
  currency_beacon:
    base_url: "http://example.com/beacon"
    api_token: "secret"
default_pair:
  from:
    code: "USD"
    symbol: "$"
    amount: 6239.21
  to:
    code: "GBP"
    symbol: "£"
debounce_ms: 350
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider, ProviderKind::CurrencyBeacon);
        let beacon = config.providers.currency_beacon.as_ref().unwrap();
        assert_eq!(beacon.base_url, "http://example.com/beacon");
        assert_eq!(beacon.api_token, "secret");
        assert!(config.providers.frankfurter.is_none());

        let pair = config.default_pair.as_ref().unwrap().to_pair();
        assert_eq!(pair.from.code, "USD");
        assert_eq!(pair.from.amount, Some(6239.21));
        assert_eq!(pair.to.symbol, "£");
        assert_eq!(pair.to.amount, None);
        assert!(pair.last_updated.is_none());
        assert_eq!(config.debounce(), Duration::from_millis(350));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("default_pair: null").unwrap();

        assert_eq!(config.provider, ProviderKind::Frankfurter);
        assert_eq!(
            config.providers.frankfurter.unwrap().base_url,
            "https://api.frankfurter.app"
        );
        assert!(config.default_pair.is_none());
        assert_eq!(config.debounce_ms, 200);
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(
            file.path(),
            "providers:\n  frankfurter:\n    base_url: \"http://localhost:1234\"\n",
        )?;

        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(
            config.providers.frankfurter.unwrap().base_url,
            "http://localhost:1234"
        );
        assert!(config.default_pair.is_none());
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
