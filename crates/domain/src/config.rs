//! Configuration structures
//!
//! Loaded by `harvest-infra::config` from environment variables or a
//! JSON/TOML file. Every section except `provider` has defaults.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_MATCH_THRESHOLD_PERCENT, DEFAULT_SCAN_INTERVAL_SECS,
};
use crate::{impl_label_conversions, HarvestError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub pause: PauseConfig,
    #[serde(default)]
    pub shopping_list: ShoppingListConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reject configurations that cannot work before any network call is made.
    ///
    /// # Errors
    /// Returns [`HarvestError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        if self.shopping_list.threshold_percent > 100 {
            return Err(HarvestError::Config(format!(
                "shopping_list.threshold_percent must be within 0..=100, got {}",
                self.shopping_list.threshold_percent
            )));
        }
        if self.shopping_list.enabled && self.shopping_list.path.is_none() {
            return Err(HarvestError::Config(
                "shopping_list.path is required when shopping list matching is enabled".into(),
            ));
        }
        if self.refresh.interval_seconds == 0 {
            return Err(HarvestError::Config("refresh.interval_seconds must be positive".into()));
        }
        Ok(())
    }
}

/// Which upstream delivery source to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Shop calendar with orders, unit overrides and pause windows
    Oekobox,
    /// Basket-only feed without pause support
    Amperhof,
}

impl_label_conversions!(ProviderKind {
    Oekobox => "oekobox",
    Amperhof => "amperhof",
});

impl ProviderKind {
    /// Whether this source identifies the account by shop id.
    pub fn requires_shop_id(self) -> bool {
        matches!(self, Self::Oekobox)
    }
}

/// Upstream credentials and endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    #[serde(default)]
    pub base_url: Option<String>,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub shop_id: Option<String>,
}

impl ProviderConfig {
    fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(HarvestError::Config("provider.username is required".into()));
        }
        if self.password.is_empty() {
            return Err(HarvestError::Config("provider.password is required".into()));
        }
        let has_shop = self.shop_id.as_deref().is_some_and(|id| !id.trim().is_empty());
        if self.kind.requires_shop_id() && !has_shop {
            return Err(HarvestError::Config(format!(
                "provider.shop_id is required for the {} provider",
                self.kind
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("shop_id", &self.shop_id)
            .finish()
    }
}

/// Pause controller policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PauseConfig {
    /// Retry a conflicting pause once with auto-cancel of the planned order.
    #[serde(default)]
    pub auto_cancel_on_conflict: bool,
}

/// Household shopping list reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: u8,
    /// JSON file holding the list rows.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl ShoppingListConfig {
    /// Similarity threshold as a ratio in `[0, 1]`.
    pub fn threshold(&self) -> f64 {
        f64::from(self.threshold_percent) / 100.0
    }
}

impl Default for ShoppingListConfig {
    fn default() -> Self {
        Self { enabled: false, threshold_percent: DEFAULT_MATCH_THRESHOLD_PERCENT, path: None }
    }
}

/// Periodic refresh cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default = "default_job_timeout_seconds")]
    pub job_timeout_seconds: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_SCAN_INTERVAL_SECS,
            job_timeout_seconds: DEFAULT_JOB_TIMEOUT_SECS,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_threshold_percent() -> u8 {
    DEFAULT_MATCH_THRESHOLD_PERCENT
}

fn default_interval_seconds() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECS
}

fn default_job_timeout_seconds() -> u64 {
    DEFAULT_JOB_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}
