//! Database schema and row types

use crate::state_machine::state::{TravelState, TravelStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    state TEXT NOT NULL,
    current_step TEXT NOT NULL DEFAULT 'collecting',
    destination TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_updated ON sessions(updated_at DESC);
CREATE INDEX IF NOT EXISTS idx_sessions_step ON sessions(current_step);
";

/// Session overview for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub status: SessionStatus,
    pub current_step: TravelStep,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_state(state: &TravelState) -> Self {
        Self {
            session_id: state.session_id.clone(),
            destination: (!state.destination.is_empty()).then(|| state.destination.clone()),
            duration: (state.duration > 0).then_some(state.duration),
            status: SessionStatus::of(state.current_step),
            current_step: state.current_step,
            created_at: state.created_at,
            updated_at: state.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn of(step: TravelStep) -> Self {
        if step.is_terminal() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }
}
