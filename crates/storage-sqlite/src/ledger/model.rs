//! Database models for ledger documents.

use diesel::prelude::*;
use serde_json::Value;

use crate::errors::StorageError;

/// One account's ledger document, stored as JSON text.
#[derive(Queryable, Selectable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerDocumentDB {
    pub account_id: String,
    pub document: String,
    pub updated_at: String,
}

impl LedgerDocumentDB {
    pub fn new(account_id: &str, document: &Value, updated_at: String) -> Result<Self, StorageError> {
        Ok(Self {
            account_id: account_id.to_string(),
            document: serde_json::to_string(document)?,
            updated_at,
        })
    }

    pub fn parse_document(&self) -> Result<Value, StorageError> {
        Ok(serde_json::from_str(&self.document)?)
    }
}
