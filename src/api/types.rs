//! API request and response types

use crate::db::{SessionStatus, SessionSummary};
use crate::model::{BudgetBreakdown, FlightOption, HotelOption, Itinerary};
use crate::state_machine::state::{ChatMessage, Progress, TravelState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Omitted to start a new session
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Reply to a chat turn, or the current state of a session
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub session_id: String,
    pub state: TravelState,
    pub progress: Progress,
    pub is_complete: bool,
}

impl ChatResponse {
    pub fn new(message: String, state: TravelState) -> Self {
        Self {
            message,
            session_id: state.session_id.clone(),
            progress: state.progress(),
            is_complete: state.current_step.is_terminal(),
            state,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The collected requirements
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub destination: String,
    pub duration: u32,
    pub budget: u64,
    pub num_people: u32,
    pub travel_style: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanDetails {
    pub flights: Vec<FlightOption>,
    pub hotels: Vec<HotelOption>,
    pub itinerary: Itinerary,
    pub budget_breakdown: BudgetBreakdown,
    pub status_message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub session_id: String,
    pub status: SessionStatus,
    pub user_info: UserInfo,
    pub plan: PlanDetails,
    pub progress: Progress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FlightsResponse {
    pub session_id: String,
    pub destination: String,
    pub duration: u32,
    pub flights: Vec<FlightOption>,
}

#[derive(Debug, Serialize)]
pub struct HotelsResponse {
    pub session_id: String,
    pub destination: String,
    pub duration: u32,
    pub hotels: Vec<HotelOption>,
}

#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub session_id: String,
    pub destination: String,
    pub duration: u32,
    pub travel_style: Vec<String>,
    pub itinerary: Itinerary,
}

/// Markdown rendering of a finished plan
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub session_id: String,
    pub summary: String,
    pub format: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
