//! In-process document store.
//!
//! Holds documents in a map behind a single mutex, so each read-modify-write
//! runs alone. Useful for tests and single-process setups.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::ledger_traits::{DocumentMutation, DocumentStore};
use crate::errors::{DatabaseError, Result};

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<String, Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or replaces a document directly, bypassing any mutation.
    pub fn insert(&self, key: &str, document: Value) -> Result<()> {
        self.lock()?.insert(key.to_string(), document);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Value>>> {
        self.documents
            .lock()
            .map_err(|e| DatabaseError::Internal(format!("document store poisoned: {}", e)).into())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn load_document(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn atomic_read_modify_write(
        &self,
        key: &str,
        mutation: DocumentMutation,
    ) -> Result<Value> {
        let mut documents = self.lock()?;
        let next = mutation(documents.get(key).cloned())?;
        if documents.get(key) != Some(&next) {
            documents.insert(key.to_string(), next.clone());
        }
        Ok(next)
    }
}
