//! In-process document store.
//!
//! Documents live in an insertion-ordered vector shared by all sessions.
//! Used when no `DATABASE_URL` is configured and throughout the tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    Document, DocumentSession, DocumentStore, PendingChange, PendingChanges, StoreError,
};

/// Memory-backed [`DocumentStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn open_session(&self) -> Box<dyn DocumentSession> {
        Box::new(MemorySession {
            documents: Arc::clone(&self.documents),
            pending: PendingChanges::default(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

struct MemorySession {
    documents: Arc<RwLock<Vec<Document>>>,
    pending: PendingChanges,
}

#[async_trait]
impl DocumentSession for MemorySession {
    fn store(&mut self, id: Option<String>, body: Value) -> String {
        self.pending.store(id, body)
    }

    async fn load(&mut self, id: &str) -> Result<Option<Document>, StoreError> {
        if let Some(buffered) = self.pending.lookup(id) {
            return Ok(buffered);
        }

        let documents = self.documents.read().await;
        Ok(documents.iter().find(|doc| doc.id == id).cloned())
    }

    async fn query_all(&mut self) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents.read().await.clone())
    }

    fn delete(&mut self, id: &str) {
        self.pending.delete(id);
    }

    async fn save_changes(&mut self) -> Result<(), StoreError> {
        let changes = self.pending.take();
        if changes.is_empty() {
            return Ok(());
        }

        // Single write lock so concurrent sessions see all or none of the batch
        let mut documents = self.documents.write().await;
        for change in changes {
            match change {
                PendingChange::Store(doc) => {
                    match documents.iter_mut().find(|existing| existing.id == doc.id) {
                        Some(existing) => existing.body = doc.body,
                        None => documents.push(doc),
                    }
                }
                PendingChange::Delete(id) => documents.retain(|doc| doc.id != id),
            }
        }

        Ok(())
    }
}
