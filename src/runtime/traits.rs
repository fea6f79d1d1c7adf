//! Trait abstractions for runtime I/O
//!
//! The store is a trait so the executor can be tested with an in-memory
//! mock that injects failures.

use crate::db::{Database, DbResult, SessionSummary};
use crate::state_machine::TravelState;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable storage for one `TravelState` per session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session with a fresh id
    async fn create(&self) -> DbResult<TravelState>;

    async fn get(&self, session_id: &str) -> DbResult<TravelState>;

    /// Overwrite the stored revision, returning it as stored
    async fn save(&self, state: &TravelState) -> DbResult<TravelState>;

    async fn list(&self) -> DbResult<Vec<SessionSummary>>;

    async fn delete(&self, session_id: &str) -> DbResult<()>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn create(&self) -> DbResult<TravelState> {
        (**self).create().await
    }

    async fn get(&self, session_id: &str) -> DbResult<TravelState> {
        (**self).get(session_id).await
    }

    async fn save(&self, state: &TravelState) -> DbResult<TravelState> {
        (**self).save(state).await
    }

    async fn list(&self) -> DbResult<Vec<SessionSummary>> {
        (**self).list().await
    }

    async fn delete(&self, session_id: &str) -> DbResult<()> {
        (**self).delete(session_id).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use Database as a `SessionStore`
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for DatabaseStorage {
    async fn create(&self) -> DbResult<TravelState> {
        let id = uuid::Uuid::new_v4().to_string();
        self.db.create_session(&id)
    }

    async fn get(&self, session_id: &str) -> DbResult<TravelState> {
        self.db.get_session(session_id)
    }

    async fn save(&self, state: &TravelState) -> DbResult<TravelState> {
        self.db.save_session(state)
    }

    async fn list(&self) -> DbResult<Vec<SessionSummary>> {
        self.db.list_sessions()
    }

    async fn delete(&self, session_id: &str) -> DbResult<()> {
        self.db.delete_session(session_id)
    }
}
