//! PostgreSQL-backed document store.
//!
//! Documents are kept as JSONB rows in the `documents` table, grouped by
//! collection name. A session reads straight from the pool and flushes its
//! buffered changes inside a single database transaction.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;

use super::{
    Document, DocumentSession, DocumentStore, PendingChange, PendingChanges, StoreError,
};
use crate::db::DbPool;

/// Insert or replace a document. The update only applies within the same
/// collection, so a foreign row with the same id is left alone and no row is affected.
const UPSERT_DOCUMENT: &str = r#"
    INSERT INTO documents (id, collection, body)
    VALUES ($1, $2, $3)
    ON CONFLICT (id) DO UPDATE
    SET body = EXCLUDED.body,
        updated_at = NOW()
    WHERE documents.collection = EXCLUDED.collection
"#;

/// Row shape of the `documents` table used by queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    body: Json<Value>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            body: row.body.0,
        }
    }
}

/// [`DocumentStore`] persisting one collection in PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: DbPool,
    collection: String,
}

impl PostgresDocumentStore {
    pub fn new(pool: DbPool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn open_session(&self) -> Box<dyn DocumentSession> {
        Box::new(PostgresSession {
            pool: self.pool.clone(),
            collection: self.collection.clone(),
            pending: PendingChanges::default(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

struct PostgresSession {
    pool: DbPool,
    collection: String,
    pending: PendingChanges,
}

#[async_trait]
impl DocumentSession for PostgresSession {
    fn store(&mut self, id: Option<String>, body: Value) -> String {
        self.pending.store(id, body)
    }

    async fn load(&mut self, id: &str) -> Result<Option<Document>, StoreError> {
        if let Some(buffered) = self.pending.lookup(id) {
            return Ok(buffered);
        }

        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, body FROM documents WHERE id = $1 AND collection = $2",
        )
        .bind(id)
        .bind(&self.collection)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn query_all(&mut self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn delete(&mut self, id: &str) {
        self.pending.delete(id);
    }

    async fn save_changes(&mut self) -> Result<(), StoreError> {
        let changes = self.pending.take();
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for change in changes {
            match change {
                PendingChange::Store(doc) => {
                    let upserted = sqlx::query(UPSERT_DOCUMENT)
                        .bind(&doc.id)
                        .bind(&self.collection)
                        .bind(Json(&doc.body))
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                    ensure_upserted(&doc.id, upserted)?;
                }
                PendingChange::Delete(id) => {
                    sqlx::query("DELETE FROM documents WHERE id = $1 AND collection = $2")
                        .bind(&id)
                        .bind(&self.collection)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        // Commit all changes atomically; an early return above rolls back on drop
        tx.commit().await?;

        Ok(())
    }
}

/// An upsert that touched no row hit an id owned by another collection.
fn ensure_upserted(id: &str, rows_affected: u64) -> Result<(), StoreError> {
    if rows_affected == 0 {
        return Err(StoreError::CollectionConflict(id.to_string()));
    }
    Ok(())
}
