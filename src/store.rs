//! Document store seam.
//!
//! Schedules are persisted as whole configuration documents keyed by id.
//! The store is an external collaborator: this crate only reads a
//! document on load and overwrites it on save. Errors are surfaced as-is
//! and never retried.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Keyed document persistence.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches the document stored under `document_id`.
    ///
    /// # Errors
    /// `StoreError::NotFound` if nothing is stored under the id.
    async fn get(&self, document_id: &str) -> StoreResult<Value>;

    /// Replaces the whole document stored under `document_id`.
    async fn set(&self, document_id: &str, document: Value) -> StoreResult<()>;
}

/// In-memory store for tests and local use.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<RwLock<StoreData>>,
}

#[derive(Debug, Default)]
struct StoreData {
    documents: HashMap<String, Value>,
    writes: usize,
    reject_writes: bool,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one document.
    pub async fn with_document(document_id: impl Into<String>, document: Value) -> Self {
        let store = Self::new();
        store
            .inner
            .write()
            .await
            .documents
            .insert(document_id.into(), document);
        store
    }

    /// Makes every subsequent `set` fail with a backend error.
    pub async fn set_reject_writes(&self, reject: bool) {
        self.inner.write().await.reject_writes = reject;
    }

    /// Number of successful writes so far.
    pub async fn write_count(&self) -> usize {
        self.inner.read().await.writes
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.inner.read().await.documents.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, document_id: &str) -> StoreResult<Value> {
        let data = self.inner.read().await;
        data.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))
    }

    async fn set(&self, document_id: &str, document: Value) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        if data.reject_writes {
            return Err(StoreError::Backend(format!(
                "writes to '{document_id}' are disabled"
            )));
        }
        data.documents.insert(document_id.to_string(), document);
        data.writes += 1;
        debug!(document_id, writes = data.writes, "document stored");
        Ok(())
    }
}
