//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If the required variables are all set, loads from the environment
//! 2. Otherwise falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Either way the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `HARVEST_PROVIDER`: `oekobox` or `amperhof` (required)
//! - `HARVEST_USERNAME` / `HARVEST_PASSWORD`: account credentials (required)
//! - `HARVEST_SHOP_ID`: shop identifier
//! - `HARVEST_BASE_URL`: override of the provider endpoint
//! - `HARVEST_AUTO_CANCEL_ON_CONFLICT`: retry conflicting pauses with
//!   auto-cancel (true/false)
//! - `HARVEST_SHOPPING_LIST_ENABLED`: enable list matching (true/false)
//! - `HARVEST_SHOPPING_LIST_THRESHOLD`: similarity threshold in percent
//! - `HARVEST_SHOPPING_LIST_PATH`: shopping list JSON file
//! - `HARVEST_REFRESH_INTERVAL`: refresh interval in seconds
//! - `HARVEST_LOG_LEVEL`, `HARVEST_LOG_JSON`: log output
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./harvest.toml` or `./harvest.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names in the parent and grandparent directory
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use harvest_domain::{
    AppConfig, HarvestError, LoggingConfig, PauseConfig, ProviderConfig, ProviderKind,
    RefreshConfig, Result, ShoppingListConfig,
};

const FILE_NAMES: [&str; 4] = ["harvest.toml", "harvest.json", "config.toml", "config.json"];

const REQUIRED_VARS: [&str; 3] = ["HARVEST_PROVIDER", "HARVEST_USERNAME", "HARVEST_PASSWORD"];

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when every required variable is set.
/// Only when one of them is missing does it fall back to a config file, so
/// an invalid environment reports its own error.
///
/// # Errors
/// Returns `HarvestError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Validation fails
pub fn load() -> Result<AppConfig> {
    if let Some(missing) = REQUIRED_VARS.iter().find(|key| std::env::var(key).is_err()) {
        tracing::debug!(variable = %missing, "Environment incomplete, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `HarvestError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<AppConfig> {
    let kind = ProviderKind::from_str(&env_var("HARVEST_PROVIDER")?)
        .map_err(|e| HarvestError::Config(format!("Invalid provider: {e}")))?;

    let provider = ProviderConfig {
        kind,
        base_url: env_opt("HARVEST_BASE_URL"),
        username: env_var("HARVEST_USERNAME")?,
        password: env_var("HARVEST_PASSWORD")?,
        shop_id: env_opt("HARVEST_SHOP_ID"),
    };

    let mut shopping_list = ShoppingListConfig {
        enabled: env_bool("HARVEST_SHOPPING_LIST_ENABLED", false),
        path: env_opt("HARVEST_SHOPPING_LIST_PATH").map(PathBuf::from),
        ..ShoppingListConfig::default()
    };
    if let Some(raw) = env_opt("HARVEST_SHOPPING_LIST_THRESHOLD") {
        shopping_list.threshold_percent = parse_env("HARVEST_SHOPPING_LIST_THRESHOLD", &raw)?;
    }

    let mut refresh = RefreshConfig::default();
    if let Some(raw) = env_opt("HARVEST_REFRESH_INTERVAL") {
        refresh.interval_seconds = parse_env("HARVEST_REFRESH_INTERVAL", &raw)?;
    }

    let mut logging = LoggingConfig::default();
    if let Some(level) = env_opt("HARVEST_LOG_LEVEL") {
        logging.level = level;
    }
    logging.json = env_bool("HARVEST_LOG_JSON", false);

    let config = AppConfig {
        provider,
        pause: PauseConfig {
            auto_cancel_on_conflict: env_bool("HARVEST_AUTO_CANCEL_ON_CONFLICT", false),
        },
        shopping_list,
        refresh,
        logging,
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `HarvestError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HarvestError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            HarvestError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HarvestError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HarvestError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HarvestError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(HarvestError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join("..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        HarvestError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional variable; empty values count as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| HarvestError::Config(format!("Invalid value for {key}: {e}")))
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
