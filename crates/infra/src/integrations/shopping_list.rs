//! File-backed household shopping list
//!
//! The list is a JSON array of `{id, name, complete}` rows. Rewrites go
//! through a temporary file and a rename so a crash never leaves a
//! truncated list behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use harvest_core::ShoppingList;
use harvest_domain::{HarvestError, Result, ShoppingListEntry};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::InfraError;

pub struct FileShoppingList {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileShoppingList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<ShoppingListEntry>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Shopping list file missing; treating as empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(InfraError::from(err).into()),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|err| {
            HarvestError::InvalidInput(format!(
                "shopping list {} is not a valid entry array: {err}",
                self.path.display()
            ))
        })
    }

    async fn write(&self, entries: &[ShoppingListEntry]) -> Result<()> {
        let json = serde_json::to_vec_pretty(entries).map_err(InfraError::from)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(InfraError::from)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(InfraError::from)?;
        Ok(())
    }
}

#[async_trait]
impl ShoppingList for FileShoppingList {
    async fn list_entries(&self) -> Result<Vec<ShoppingListEntry>> {
        self.read().await
    }

    async fn complete_entry(&self, name: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read().await?;
        let wanted = name.to_lowercase();

        let Some(entry) =
            entries.iter_mut().find(|entry| !entry.complete && entry.name.to_lowercase() == wanted)
        else {
            debug!(name, "No open shopping list entry to complete");
            return Ok(());
        };
        entry.complete = true;
        let id = entry.id.clone();

        self.write(&entries).await?;
        info!(name, id = %id, "Completed shopping list entry");
        Ok(())
    }
}
