use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use harvest_core::ShoppingList;
use harvest_domain::{HarvestError, Result as DomainResult, ShoppingListEntry};

/// In-memory shopping list that records completions.
#[derive(Default, Clone)]
pub struct MockShoppingList {
    entries: Arc<Mutex<Vec<ShoppingListEntry>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    list_error: Arc<Mutex<Option<HarvestError>>>,
    completed: Arc<Mutex<Vec<String>>>,
}

impl MockShoppingList {
    pub fn with_open(names: &[&str]) -> Self {
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, name)| ShoppingListEntry::open(format!("entry-{i}"), *name))
            .collect();
        Self { entries: Arc::new(Mutex::new(entries)), ..Self::default() }
    }

    /// Completing this name fails with an I/O error.
    pub fn fail_completion_of(self, name: &str) -> Self {
        self.failing.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn fail_listing(&self, err: HarvestError) {
        *self.list_error.lock().unwrap() = Some(err);
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn entries(&self) -> Vec<ShoppingListEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShoppingList for MockShoppingList {
    async fn list_entries(&self) -> DomainResult<Vec<ShoppingListEntry>> {
        if let Some(err) = self.list_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.entries())
    }

    async fn complete_entry(&self, name: &str) -> DomainResult<()> {
        if self.failing.lock().unwrap().contains(name) {
            return Err(HarvestError::Io(format!("cannot complete {name}")));
        }
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.iter_mut().find(|e| !e.complete && e.name == name) {
            entry.complete = true;
        }
        self.completed.lock().unwrap().push(name.to_string());
        Ok(())
    }
}
