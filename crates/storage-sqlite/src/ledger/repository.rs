use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::warn;
use serde_json::Value;
use std::sync::Arc;

use super::model::LedgerDocumentDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::ledger_documents;
use youinc_core::ledger::{DocumentMutation, DocumentStore};
use youinc_core::Result;

/// Ledger documents keyed by account id.
///
/// Reads go through the pool; every read-modify-write runs on the single
/// writer inside one `BEGIN IMMEDIATE` transaction, so concurrent updates to
/// the same account are serialized and a failed mutation rolls back.
pub struct LedgerDocumentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LedgerDocumentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        LedgerDocumentRepository { pool, writer }
    }

    fn find_row(conn: &mut SqliteConnection, key: &str) -> Result<Option<LedgerDocumentDB>> {
        ledger_documents::table
            .find(key)
            .select(LedgerDocumentDB::as_select())
            .first::<LedgerDocumentDB>(conn)
            .optional()
            .into_core()
    }

    /// A row that no longer parses is treated as absent so the ledger falls
    /// back to its defaults; the next write replaces it.
    fn parse(row: Option<LedgerDocumentDB>) -> Option<Value> {
        let row = row?;
        match row.parse_document() {
            Ok(document) => Some(document),
            Err(e) => {
                warn!(
                    "Ignoring unreadable ledger document for {}: {}",
                    row.account_id, e
                );
                None
            }
        }
    }
}

#[async_trait]
impl DocumentStore for LedgerDocumentRepository {
    fn load_document(&self, key: &str) -> Result<Option<Value>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(Self::parse(Self::find_row(&mut conn, key)?))
    }

    async fn atomic_read_modify_write(
        &self,
        key: &str,
        mutation: DocumentMutation,
    ) -> Result<Value> {
        let key = key.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Value> {
                let previous = Self::parse(Self::find_row(conn, &key)?);
                let stored = previous.clone();
                let next = mutation(previous)?;
                if stored.as_ref() == Some(&next) {
                    return Ok(next);
                }

                let row = LedgerDocumentDB::new(&key, &next, Utc::now().to_rfc3339())
                    .map_err(youinc_core::Error::from)?;
                diesel::insert_into(ledger_documents::table)
                    .values(&row)
                    .on_conflict(ledger_documents::account_id)
                    .do_update()
                    .set((
                        ledger_documents::document.eq(&row.document),
                        ledger_documents::updated_at.eq(&row.updated_at),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(next)
            })
            .await
    }
}
