//! Runtime for executing planning sessions
//!
//! Each session with recent traffic gets its own task that owns the
//! session's turns, so two requests for one session never interleave while
//! different sessions run fully in parallel. A task that sees no turns for
//! the idle timeout exits and drops its handle; the next turn starts a new one.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{Orchestrator, SessionRuntime, TurnOutcome, TurnRequest};
pub use traits::*;

use crate::db::{DbError, SessionSummary};
use crate::providers::Providers;
use crate::state_machine::TravelState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Pending turns a session may queue before callers wait to enqueue
const TURN_QUEUE_DEPTH: usize = 16;

/// Default lifetime of a session task without turns
const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Why a turn or lookup failed
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DbError> for TurnError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::SessionNotFound(id) => TurnError::SessionNotFound(id),
            other => TurnError::Persistence(other.to_string()),
        }
    }
}

/// Handle to a running session
struct SessionHandle {
    turn_tx: mpsc::Sender<TurnRequest>,
}

impl SessionHandle {
    /// False once the runtime has gone idle and stopped taking turns
    fn is_live(&self) -> bool {
        !self.turn_tx.is_closed()
    }
}

type SessionMap = Arc<RwLock<HashMap<String, SessionHandle>>>;

/// Manager for all session runtimes
pub struct RuntimeManager {
    store: Arc<dyn SessionStore>,
    orchestrator: Orchestrator<Arc<dyn SessionStore>>,
    sessions: SessionMap,
    idle_timeout: Duration,
}

impl RuntimeManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        providers: Providers,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            orchestrator: Orchestrator::new(store.clone(), providers, provider_timeout),
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: SESSION_IDLE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Run one chat turn. Without a session id a new session is created.
    pub async fn chat(
        &self,
        session_id: Option<&str>,
        text: String,
    ) -> Result<TurnOutcome, TurnError> {
        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => {
                let state = self.store.create().await?;
                tracing::info!(session_id = %state.session_id, "Created session");
                state.session_id
            }
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        let request = TurnRequest {
            text,
            reply: reply_tx,
        };

        let turn_tx = self.get_or_start(&session_id).await?;
        if let Err(mpsc::error::SendError(request)) = turn_tx.send(request).await {
            // The runtime went idle between lookup and send
            tracing::debug!(session_id = %session_id, "Restarting idle session runtime");
            let turn_tx = self.get_or_start(&session_id).await?;
            turn_tx.send(request).await.map_err(|_| {
                TurnError::Internal(format!("runtime for session {session_id} stopped"))
            })?;
        }
        reply_rx
            .await
            .map_err(|_| TurnError::Internal("turn dropped without a result".to_string()))?
    }

    /// Get the session's turn channel, starting its runtime if needed
    async fn get_or_start(
        &self,
        session_id: &str,
    ) -> Result<mpsc::Sender<TurnRequest>, TurnError> {
        let live = self
            .sessions
            .read()
            .await
            .get(session_id)
            .filter(|h| h.is_live())
            .map(|h| h.turn_tx.clone());
        if let Some(turn_tx) = live {
            return Ok(turn_tx);
        }

        // Unknown ids are rejected before any runtime exists for them
        self.store.get(session_id).await?;

        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.get(session_id).filter(|h| h.is_live()) {
            return Ok(handle.turn_tx.clone());
        }

        let (turn_tx, turn_rx) = mpsc::channel(TURN_QUEUE_DEPTH);
        let runtime = SessionRuntime::new(
            session_id.to_string(),
            self.orchestrator.clone(),
            turn_rx,
            self.idle_timeout,
        );
        let map = self.sessions.clone();
        let id = session_id.to_string();
        tokio::spawn(async move {
            runtime.run().await;
            // A replacement runtime may already own the slot
            let mut sessions = map.write().await;
            if sessions.get(&id).is_some_and(|handle| !handle.is_live()) {
                sessions.remove(&id);
            }
        });

        sessions.insert(
            session_id.to_string(),
            SessionHandle {
                turn_tx: turn_tx.clone(),
            },
        );
        Ok(turn_tx)
    }

    #[cfg(test)]
    async fn running_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn get_session(&self, session_id: &str) -> Result<TravelState, TurnError> {
        Ok(self.store.get(session_id).await?)
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, TurnError> {
        Ok(self.store.list().await?)
    }

    /// Delete the stored session and stop its runtime
    pub async fn delete_session(&self, session_id: &str) -> Result<(), TurnError> {
        self.store.delete(session_id).await?;
        self.sessions.write().await.remove(session_id);
        tracing::info!(session_id = %session_id, "Deleted session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{catalog_providers, MemoryStore};
    use super::*;
    use crate::state_machine::TravelStep;

    fn manager() -> RuntimeManager {
        RuntimeManager::new(
            Arc::new(MemoryStore::new()),
            catalog_providers(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_chat_without_id_creates_session() {
        let manager = manager();
        let outcome = manager.chat(None, "안녕".to_string()).await.unwrap();
        assert_eq!(outcome.state.messages.len(), 2);

        let stored = manager.get_session(&outcome.state.session_id).await.unwrap();
        assert_eq!(stored, outcome.state);
    }

    #[tokio::test]
    async fn test_unknown_session_is_rejected() {
        let manager = manager();
        let err = manager.chat(Some("nope"), "안녕".to_string()).await.unwrap_err();
        assert!(matches!(err, TurnError::SessionNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_concurrent_turns_on_one_session_are_serialized() {
        let manager = Arc::new(manager());
        let first = manager.chat(None, "오사카".to_string()).await.unwrap();
        let id = first.state.session_id.clone();

        let turns = ["2박 3일", "1인당 50만원", "2명", "맛집"];
        let handles: Vec<_> = turns
            .into_iter()
            .map(|text| {
                let manager = manager.clone();
                let id = id.clone();
                tokio::spawn(async move { manager.chat(Some(&id), text.to_string()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let state = manager.get_session(&id).await.unwrap();
        // No lost updates: every turn's two messages are present
        assert_eq!(state.messages.len(), 10);
        assert_eq!(state.current_step, TravelStep::Done);
    }

    #[tokio::test]
    async fn test_idle_runtime_is_evicted_and_restarted() {
        let manager = RuntimeManager::new(
            Arc::new(MemoryStore::new()),
            catalog_providers(),
            Duration::from_secs(5),
        )
        .with_idle_timeout(Duration::from_millis(50));

        let first = manager.chat(None, "오사카".to_string()).await.unwrap();
        let id = first.state.session_id.clone();
        assert_eq!(manager.running_sessions().await, 1);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(manager.running_sessions().await, 0);

        let second = manager.chat(Some(&id), "2박 3일".to_string()).await.unwrap();
        assert_eq!(second.state.duration, 2);
        assert_eq!(second.state.messages.len(), 4);
        assert_eq!(manager.running_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_stopped_runtime_handle_is_replaced() {
        let manager = manager();
        let first = manager.chat(None, "오사카".to_string()).await.unwrap();
        let id = first.state.session_id.clone();

        // A handle whose runtime is gone, as left behind by an idle exit
        let (turn_tx, turn_rx) = mpsc::channel(TURN_QUEUE_DEPTH);
        drop(turn_rx);
        manager
            .sessions
            .write()
            .await
            .insert(id.clone(), SessionHandle { turn_tx });

        let second = manager.chat(Some(&id), "2박 3일".to_string()).await.unwrap();
        assert_eq!(second.state.messages.len(), 4);
        assert!(manager.sessions.read().await[&id].is_live());
    }

    #[tokio::test]
    async fn test_delete_removes_session() {
        let manager = manager();
        let outcome = manager.chat(None, "안녕".to_string()).await.unwrap();
        let id = outcome.state.session_id;

        manager.delete_session(&id).await.unwrap();
        assert!(matches!(
            manager.get_session(&id).await,
            Err(TurnError::SessionNotFound(_))
        ));
        assert!(matches!(
            manager.chat(Some(&id), "안녕".to_string()).await,
            Err(TurnError::SessionNotFound(_))
        ));
    }
}
