//! Persistence contract for session records.
//!
//! The engine itself performs no I/O; durable storage is an external
//! collaborator behind the [`SessionStore`] trait. A session serializes to
//! a flat record (see [`Session`]), and the contract is whole-record
//! writes: `save` replaces the stored record atomically, so retried saves
//! are idempotent and a crash between mutation and save never leaves a
//! partially applied record behind.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::game::{Session, SessionId};

/// Errors from a storage backend.
///
/// `Backend` failures are transient from the engine's point of view and
/// are retried by the caller; the engine never produces them itself.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
    #[error("session record could not be encoded: {0}")]
    Encoding(String),
}

/// Trait for session record storage operations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session record by id. `Ok(None)` means no such session.
    async fn load(&self, id: SessionId) -> Result<Option<Session>, StoreError>;

    /// Persist the full session record, replacing any previous one.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Delete a session record. Deleting a missing record is not an error.
    async fn delete(&self, id: SessionId) -> Result<(), StoreError>;
}

/// In-memory store used by tests and as the default backend.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<SessionId, Session>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(session.id, session.clone());
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.remove(&id);
        Ok(())
    }
}
