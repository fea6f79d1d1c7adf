//! Session persistence
//!
//! One row per session. The full `TravelState` is stored as JSON; the
//! step, destination and timestamps are duplicated into columns for listing.

mod schema;

pub use schema::*;

use crate::state_machine::state::TravelState;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Corrupt session state: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Database lock poisoned")]
    LockPoisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Create a new session in the collecting step
    pub fn create_session(&self, id: &str) -> DbResult<TravelState> {
        let state = TravelState::new(id, Utc::now());
        let state_json = serde_json::to_string(&state)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO sessions (id, state, current_step, destination, created_at, updated_at)
             VALUES (?1, ?2, ?3, '', ?4, ?4)",
            params![
                id,
                state_json,
                state.current_step.as_str(),
                timestamp(state.created_at)
            ],
        )?;
        Ok(state)
    }

    pub fn get_session(&self, id: &str) -> DbResult<TravelState> {
        let conn = self.lock()?;
        let state_json: Option<String> = conn
            .query_row("SELECT state FROM sessions WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;

        let state_json = state_json.ok_or_else(|| DbError::SessionNotFound(id.to_string()))?;
        Ok(serde_json::from_str(&state_json)?)
    }

    /// Overwrite the stored revision. `updated_at` is bumped to now and
    /// never moves backwards; the stored state is returned.
    pub fn save_session(&self, state: &TravelState) -> DbResult<TravelState> {
        let mut saved = state.clone();
        saved.updated_at = Utc::now().max(state.updated_at);
        let state_json = serde_json::to_string(&saved)?;
        let conn = self.lock()?;

        let updated = conn.execute(
            "UPDATE sessions SET state = ?1, current_step = ?2, destination = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                state_json,
                saved.current_step.as_str(),
                saved.destination,
                timestamp(saved.updated_at),
                saved.session_id
            ],
        )?;

        if updated == 0 {
            return Err(DbError::SessionNotFound(saved.session_id));
        }
        Ok(saved)
    }

    /// Most recently updated first
    pub fn list_sessions(&self) -> DbResult<Vec<SessionSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT state FROM sessions ORDER BY updated_at DESC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut sessions = Vec::new();
        for row in rows {
            let state: TravelState = serde_json::from_str(&row?)?;
            sessions.push(SessionSummary::from_state(&state));
        }
        Ok(sessions)
    }

    pub fn delete_session(&self, id: &str) -> DbResult<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;

        if deleted == 0 {
            return Err(DbError::SessionNotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Fixed-width so the text column sorts chronologically
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
