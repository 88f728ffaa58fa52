//! Point-in-time copies of the store image.
//!
//! Backups are plain file copies kept in a directory beside the store. The
//! directory listing is the only state: whether today's auto backup exists is
//! answered by the filesystem, never by a cache.
//!
//! Copies are not coordinated with in-flight write transactions. A write that
//! commits while a copy is running can leave a torn snapshot in the backup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FleetError, Result};
use crate::fs::{copy_to_new, replace_with_copy};

/// File extension of store images and their backups.
pub const STORE_EXTENSION: &str = "db";

/// Default name of the backup directory next to the store image.
pub const BACKUP_DIR_NAME: &str = "database_backups";

/// Upper bound on same-second suffixes tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Why a backup was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupCategory {
    Manual,
    AutoDaily,
    PreRestoreRescue,
}

impl BackupCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupCategory::Manual => "manual",
            BackupCategory::AutoDaily => "auto_daily",
            BackupCategory::PreRestoreRescue => "pre_restore_rescue",
        }
    }

    const ALL: [BackupCategory; 3] = [
        BackupCategory::Manual,
        BackupCategory::AutoDaily,
        BackupCategory::PreRestoreRescue,
    ];
}

impl fmt::Display for BackupCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupCategory {
    type Err = FleetError;

    fn from_str(value: &str) -> Result<Self> {
        BackupCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| FleetError::InvalidInput(format!("Unknown backup category: {}", value)))
    }
}

/// A backup file found in the backup directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Parsed from the file name; `None` for files not named by this manager
    pub category: Option<BackupCategory>,
    pub size_bytes: u64,
}

/// Creates and restores copies of the store image.
#[derive(Debug, Clone)]
pub struct BackupManager {
    store_path: PathBuf,
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Create a manager for `store_path`, creating `backup_dir` if needed.
    pub fn new(store_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Result<Self> {
        let backup_dir = backup_dir.into();
        std::fs::create_dir_all(&backup_dir).map_err(|e| {
            FleetError::Storage(format!(
                "Failed to create backup directory {}: {}",
                backup_dir.display(),
                e
            ))
        })?;
        Ok(Self {
            store_path: store_path.into(),
            backup_dir,
        })
    }

    /// Default backup directory for a store image: a sibling `database_backups/`.
    pub fn default_dir_for(store_path: &Path) -> PathBuf {
        store_path
            .parent()
            .map(|parent| parent.join(BACKUP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(BACKUP_DIR_NAME))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Copy the store image into the backup directory.
    ///
    /// Returns `Ok(None)` when `category` is `AutoDaily`, `force` is false, and
    /// today's auto backup already exists.
    pub fn create_backup(&self, category: BackupCategory, force: bool) -> Result<Option<PathBuf>> {
        self.create_backup_at(category, force, Local::now().naive_local())
    }

    /// Same as [`create_backup`](Self::create_backup) with an explicit local time.
    pub fn create_backup_at(
        &self,
        category: BackupCategory,
        force: bool,
        now: NaiveDateTime,
    ) -> Result<Option<PathBuf>> {
        if category == BackupCategory::AutoDaily && !force {
            let name = format!(
                "{}_backup_{}.{}",
                category,
                now.format("%Y%m%d"),
                STORE_EXTENSION
            );
            let path = self.backup_dir.join(name);
            return match copy_to_new(&self.store_path, &path)? {
                Some(bytes) => {
                    info!(path = %path.display(), bytes, "backup created");
                    Ok(Some(path))
                }
                None => {
                    debug!(path = %path.display(), "daily backup already exists");
                    Ok(None)
                }
            };
        }

        let stem = format!("{}_backup_{}", category, now.format("%Y%m%d_%H%M%S"));
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}.{}", stem, STORE_EXTENSION)
            } else {
                format!("{}_{}.{}", stem, attempt, STORE_EXTENSION)
            };
            let path = self.backup_dir.join(name);
            if let Some(bytes) = copy_to_new(&self.store_path, &path)? {
                info!(path = %path.display(), bytes, "backup created");
                return Ok(Some(path));
            }
        }

        Err(FleetError::Storage(format!(
            "Could not find a free backup name for {}",
            stem
        )))
    }

    /// Overwrite the store image with `source`.
    ///
    /// A `pre_restore_rescue` backup of the current image is taken first; its
    /// path is returned.
    ///
    /// # Errors
    ///
    /// Returns `FleetError::InvalidBackup` if `source` does not exist, is not a
    /// file, or does not carry the store extension. The store is untouched in
    /// that case.
    pub fn restore(&self, source: &Path) -> Result<PathBuf> {
        validate_backup_source(source)?;

        let rescue = self
            .create_backup(BackupCategory::PreRestoreRescue, false)?
            .ok_or_else(|| FleetError::Storage("Rescue backup was not created".to_string()))?;

        replace_with_copy(source, &self.store_path).map_err(|e| {
            FleetError::Storage(format!(
                "Failed to restore {} from {}: {}",
                self.store_path.display(),
                source.display(),
                e
            ))
        })?;

        info!(
            source = %source.display(),
            rescue = %rescue.display(),
            "store restored"
        );
        Ok(rescue)
    }

    /// List backup files (store extension only), sorted by file name.
    pub fn list_backups(&self) -> Result<Vec<BackupFile>> {
        let mut backups = Vec::new();
        for entry in std::fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !has_store_extension(&path) {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            backups.push(BackupFile {
                category: category_from_name(&file_name),
                file_name,
                path,
                size_bytes: metadata.len(),
            });
        }
        backups.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(backups)
    }
}

fn has_store_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == STORE_EXTENSION)
}

fn validate_backup_source(source: &Path) -> Result<()> {
    if !source.is_file() {
        return Err(FleetError::InvalidBackup(format!(
            "{} does not exist",
            source.display()
        )));
    }
    if !has_store_extension(source) {
        return Err(FleetError::InvalidBackup(format!(
            "{} is not a .{} file",
            source.display(),
            STORE_EXTENSION
        )));
    }
    Ok(())
}

fn category_from_name(file_name: &str) -> Option<BackupCategory> {
    let (prefix, _) = file_name.split_once("_backup_")?;
    prefix.parse().ok()
}
