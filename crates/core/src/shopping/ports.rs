//! Port interface for the household shopping list

use async_trait::async_trait;
use harvest_domain::{Result, ShoppingListEntry};

#[async_trait]
pub trait ShoppingList: Send + Sync {
    /// All entries, completed ones included
    async fn list_entries(&self) -> Result<Vec<ShoppingListEntry>>;

    /// Mark the entry with this name complete.
    ///
    /// Completing an entry that is already complete must be a no-op.
    async fn complete_entry(&self, name: &str) -> Result<()>;
}
