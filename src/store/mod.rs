//! Document store abstraction.
//!
//! Records are persisted as opaque JSON documents addressed by a generated id.
//! Every operation works through a [`DocumentSession`], a unit of work that
//! buffers writes until [`DocumentSession::save_changes`] is called. Dropping a
//! session without saving discards its buffered changes.
//!
//! Two backends are provided:
//! - [`memory::MemoryDocumentStore`]: process-local, used when no database is configured
//! - [`postgres::PostgresDocumentStore`]: JSONB documents in PostgreSQL

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// Errors raised by a document store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database rejected a query or could not be reached.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The id is already taken by a document of another collection.
    #[error("Document {0} belongs to another collection")]
    CollectionConflict(String),
}

/// A stored document: its id plus the opaque JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

/// Entry point to a document collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open an independent session against the collection.
    fn open_session(&self) -> Box<dyn DocumentSession>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name, used in logs and the health report.
    fn backend(&self) -> &'static str;
}

/// Unit of work over a document collection.
#[async_trait]
pub trait DocumentSession: Send {
    /// Buffer a document for storage and return its id.
    ///
    /// A new id is generated when `id` is `None`. Storing under an existing id
    /// replaces that document on save.
    fn store(&mut self, id: Option<String>, body: Value) -> String;

    /// Load a document by id, seeing this session's buffered changes first.
    async fn load(&mut self, id: &str) -> Result<Option<Document>, StoreError>;

    /// All saved documents of the collection in the store's default order.
    async fn query_all(&mut self) -> Result<Vec<Document>, StoreError>;

    /// Buffer the deletion of a document.
    fn delete(&mut self, id: &str);

    /// Flush buffered changes to the backend.
    async fn save_changes(&mut self) -> Result<(), StoreError>;
}

/// A buffered change waiting for `save_changes`.
#[derive(Debug, Clone)]
pub(crate) enum PendingChange {
    Store(Document),
    Delete(String),
}

/// Changes recorded by a session but not yet flushed.
#[derive(Debug, Default)]
pub(crate) struct PendingChanges {
    changes: Vec<PendingChange>,
}

impl PendingChanges {
    pub(crate) fn store(&mut self, id: Option<String>, body: Value) -> String {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.changes.push(PendingChange::Store(Document {
            id: id.clone(),
            body,
        }));
        id
    }

    pub(crate) fn delete(&mut self, id: &str) {
        self.changes.push(PendingChange::Delete(id.to_string()));
    }

    /// The latest buffered state of a document.
    ///
    /// `None` means the session has not touched the id, `Some(None)` that it was
    /// deleted, `Some(Some(doc))` that it was stored.
    pub(crate) fn lookup(&self, id: &str) -> Option<Option<Document>> {
        self.changes.iter().rev().find_map(|change| match change {
            PendingChange::Store(doc) if doc.id == id => Some(Some(doc.clone())),
            PendingChange::Delete(deleted) if deleted == id => Some(None),
            _ => None,
        })
    }

    pub(crate) fn take(&mut self) -> Vec<PendingChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn store_generates_id_when_missing() {
        let mut pending = PendingChanges::default();
        let id = pending.store(None, json!({"a": 1}));

        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(
            pending.lookup(&id),
            Some(Some(Document {
                id: id.clone(),
                body: json!({"a": 1})
            }))
        );
    }

    #[test]
    fn lookup_returns_latest_change() {
        let mut pending = PendingChanges::default();
        pending.store(Some("doc-1".to_string()), json!({"v": 1}));
        pending.store(Some("doc-1".to_string()), json!({"v": 2}));
        assert_eq!(
            pending.lookup("doc-1").flatten().map(|doc| doc.body),
            Some(json!({"v": 2}))
        );

        pending.delete("doc-1");
        assert_eq!(pending.lookup("doc-1"), Some(None));
        assert_eq!(pending.lookup("doc-2"), None);
    }

    #[test]
    fn take_drains_changes() {
        let mut pending = PendingChanges::default();
        pending.delete("doc-1");

        assert_eq!(pending.take().len(), 1);
        assert!(pending.take().is_empty());
    }
}
