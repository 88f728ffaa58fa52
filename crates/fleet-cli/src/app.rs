//! Application context for the Fleet CLI.
//!
//! Resolves the config, store, and backup paths from CLI arguments and the
//! config file, then opens the ledger. Seed drivers are applied once per
//! store image.

use std::path::PathBuf;

use fleet_core::{BackupManager, ExportComposer, FleetLedger, LedgerStore, SqliteStore, TomlPriceFile};
use tracing::info;

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, read_config, FleetConfig};

/// Ledger type used by every command.
pub type Ledger = FleetLedger<SqliteStore, TomlPriceFile>;

/// Application context that bundles CLI args with the loaded configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config_path: PathBuf,
    config: FleetConfig,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = match cli.config.as_deref() {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_config_path()?,
        };
        let config = read_config(&config_path)?;
        Ok(Self {
            cli,
            config_path,
            config,
        })
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Store path: `--store`/`FLEET_STORE`, then `[store] path`, then the XDG data dir.
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = self.cli.store.as_deref().filter(|p| !p.trim().is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = self.config.store.path.as_deref() {
            return Ok(PathBuf::from(path));
        }
        default_store_path()
    }

    /// Backup directory: `[backup] dir`, else next to the store.
    pub fn backup_dir(&self, store_path: &std::path::Path) -> PathBuf {
        match self.config.backup.dir.as_deref() {
            Some(dir) => PathBuf::from(dir),
            None => BackupManager::default_dir_for(store_path),
        }
    }

    /// Open the store, seed drivers into a new image, and build the ledger.
    pub fn open_ledger(&self) -> anyhow::Result<Ledger> {
        let store_path = self.store_path()?;
        let store = SqliteStore::open(&store_path)?;
        if !self.config.seed_drivers.is_empty() {
            let seeded = store.seed_drivers(&self.config.seed_drivers)?;
            if seeded > 0 {
                info!(seeded, "seeded drivers from config");
            }
        }
        let backups = BackupManager::new(&store_path, self.backup_dir(&store_path))?;
        Ok(FleetLedger::new(
            store,
            backups,
            TomlPriceFile::new(&self.config_path),
            ExportComposer::new(self.config.export.daily_target),
        ))
    }
}
