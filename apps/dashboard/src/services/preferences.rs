//! Persisted UI preferences.
//!
//! Preferences are cosmetic (theme, drawer state, display unit) and live in a
//! small JSON file. They are read once at startup with [`PreferencesStore::load`]
//! and written back on every change with [`PreferencesStore::update`].
//! [`PreferencesStore::save`] writes the current state explicitly.

use rclone_stats::BaseUnit;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};

/// User-facing display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub dark_mode: bool,
    pub drawer_open: bool,
    pub unit: BaseUnit,
}

/// Overlay the fields present in `contents` on `defaults`.
fn merge_over(defaults: Preferences, contents: &str) -> serde_json::Result<Preferences> {
    let stored: Map<String, Value> = serde_json::from_str(contents)?;
    let mut merged = match serde_json::to_value(defaults)? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    merged.extend(stored);
    serde_json::from_value(Value::Object(merged))
}

pub struct PreferencesStore {
    path: PathBuf,
    current: RwLock<Preferences>,
}

impl PreferencesStore {
    /// Load preferences from `path`, falling back to `defaults` when the file
    /// does not exist or cannot be parsed.
    pub async fn load(path: impl Into<PathBuf>, defaults: Preferences) -> Result<Self> {
        let path = path.into();

        let current = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match merge_over(defaults, &contents) {
                Ok(preferences) => {
                    tracing::debug!(path = ?path, "Loaded preferences");
                    preferences
                }
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Ignoring unreadable preferences file");
                    defaults
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?path, "No preferences file, using defaults");
                defaults
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub async fn load_shared(path: impl Into<PathBuf>, defaults: Preferences) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::load(path, defaults).await?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> Preferences {
        *self.current.read().await
    }

    /// Apply `change` and persist the result.
    ///
    /// The write lock is held until the file is written, so concurrent
    /// updates reach the disk in the order they were applied.
    pub async fn update<F>(&self, change: F) -> Result<Preferences>
    where
        F: FnOnce(&mut Preferences),
    {
        let mut current = self.current.write().await;
        change(&mut *current);
        self.persist(&current).await?;
        Ok(*current)
    }

    /// Write the current preferences to disk.
    pub async fn save(&self) -> Result<()> {
        let current = self.current.write().await;
        self.persist(&current).await
    }

    /// Write to a sibling temp file and rename it over the target.
    async fn persist(&self, preferences: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| AppError::Internal(format!("Failed to encode preferences: {}", e)))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = ?self.path, "Saved preferences");
        Ok(())
    }
}
