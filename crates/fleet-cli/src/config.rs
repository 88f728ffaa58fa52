use std::path::{Path, PathBuf};

use fleet_core::export::DEFAULT_DAILY_TARGET;
use fleet_core::storage::DriverDraft;
use serde::{Deserialize, Serialize};

/// Store image file name used when nothing else is configured.
pub const DEFAULT_STORE_FILE: &str = "vehicle_data.db";

/// Contents of `config.toml`.
///
/// The `[FuelPrices]` table lives in the same file but is read by the price
/// source on each request, not here.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub backup: BackupSection,
    #[serde(default)]
    pub export: ExportSection,
    /// Drivers inserted when the store has none
    #[serde(default)]
    pub seed_drivers: Vec<DriverDraft>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BackupSection {
    pub dir: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportSection {
    #[serde(default = "default_daily_target")]
    pub daily_target: f64,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            daily_target: DEFAULT_DAILY_TARGET,
        }
    }
}

fn default_daily_target() -> f64 {
    DEFAULT_DAILY_TARGET
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join(DEFAULT_STORE_FILE))
}

/// Read the config file; a missing file yields the defaults.
pub fn read_config(path: &Path) -> anyhow::Result<FleetConfig> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(FleetConfig::default());
        }
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to read config {}: {}",
                path.display(),
                e
            ))
        }
    };
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("fleet"));
        }
    }
    Ok(home_dir()?.join(".config").join("fleet"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("fleet"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("fleet"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
