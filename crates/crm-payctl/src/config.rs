//! Configuration file management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use crm_distribution::payout::RoundingPolicy;
use crm_distribution::rates::{LEGACY_DEFAULTS, OWNER_DEFAULTS};
use crm_distribution::{validate_rate_set, RateProvider, RateTable};
use crm_types::DistributionMode;
use serde::{Deserialize, Serialize};

/// Complete payctl configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayctlConfig {
    /// Default rate tables.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Payment line rounding.
    #[serde(default)]
    pub payout: PayoutConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default rate tables injected into the rate provider.
///
/// `[rates.legacy]` takes no `company_owner`; a non-zero value there is
/// rejected by [`PayctlConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    #[serde(default = "default_legacy_table")]
    pub legacy: RateTable,
    #[serde(default = "default_owner_table")]
    pub owner: RateTable,
}

/// Payout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// 100 = cents, 1 = whole currency units.
    #[serde(default = "default_minor_units")]
    pub minor_units_per_unit: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_legacy_table() -> RateTable {
    LEGACY_DEFAULTS
}

fn default_owner_table() -> RateTable {
    OWNER_DEFAULTS
}

fn default_minor_units() -> u32 {
    RoundingPolicy::default().minor_units_per_unit
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            legacy: default_legacy_table(),
            owner: default_owner_table(),
        }
    }
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            minor_units_per_unit: default_minor_units(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl PayctlConfig {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. Without one, falls back to defaults if
    /// the default file does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check both rate tables and the rounding policy.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.rates.legacy.company_owner == 0.0,
            "[rates.legacy] does not take company_owner, got {}",
            self.rates.legacy.company_owner
        );
        validate_rate_set(&self.rates.legacy.as_overrides(DistributionMode::Legacy))
            .context("invalid [rates.legacy] table")?;
        validate_rate_set(&self.rates.owner.as_overrides(DistributionMode::Owner))
            .context("invalid [rates.owner] table")?;
        anyhow::ensure!(
            self.payout.minor_units_per_unit > 0,
            "payout.minor_units_per_unit must be positive"
        );
        Ok(())
    }

    pub fn rate_provider(&self) -> RateProvider {
        RateProvider::with_tables(self.rates.legacy.clone(), self.rates.owner.clone())
    }

    pub fn rounding(&self) -> RoundingPolicy {
        RoundingPolicy {
            minor_units_per_unit: self.payout.minor_units_per_unit,
        }
    }

    /// Default config file path.
    fn config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("CRM_PAYCTL_DIR") {
            return PathBuf::from(dir).join("config.toml");
        }
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config/crm-payctl"))
            .unwrap_or_else(|_| PathBuf::from("/etc/crm-payctl"))
            .join("config.toml")
    }
}
