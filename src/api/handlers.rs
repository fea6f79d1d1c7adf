//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, DeleteResponse, ErrorResponse, FlightsResponse, HealthResponse,
    HistoryResponse, HotelsResponse, ItineraryResponse, PlanDetails, PlanResponse,
    SessionListResponse, SummaryResponse, UserInfo,
};
use super::AppState;
use crate::db::SessionStatus;
use crate::replies;
use crate::runtime::TurnError;
use crate::state_machine::TravelStep;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router. Every route is served both at the root and under `/api`.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        // Chat turns
        .route("/chat", post(chat))
        .route("/chat/:id/history", get(chat_history))
        // Sessions
        .route("/sessions", get(list_sessions))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        // Plan views
        .route("/plan/:id", get(get_plan))
        .route("/plan/:id/flights", get(get_flights))
        .route("/plan/:id/hotels", get(get_hotels))
        .route("/plan/:id/itinerary", get(get_itinerary))
        .route("/plan/:id/summary", get(get_summary));

    Router::new()
        .nest("/api", routes.clone())
        .merge(routes)
        .with_state(state)
}

// ============================================================
// Health
// ============================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.as_str(),
    })
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = body?;
    let outcome = state
        .runtime
        .chat(req.session_id.as_deref(), req.message)
        .await?;

    Ok(Json(ChatResponse::new(outcome.reply, outcome.state)))
}

async fn chat_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let session = state.runtime.get_session(&id).await?;
    Ok(Json(HistoryResponse {
        session_id: session.session_id,
        messages: session.messages,
        created_at: session.created_at,
        updated_at: session.updated_at,
    }))
}

// ============================================================
// Sessions
// ============================================================

async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionListResponse>, AppError> {
    let sessions = state.runtime.list_sessions().await?;
    Ok(Json(SessionListResponse {
        total: sessions.len(),
        sessions,
    }))
}

/// Current stored state; no reply message is generated
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChatResponse>, AppError> {
    let session = state.runtime.get_session(&id).await?;
    Ok(Json(ChatResponse::new(String::new(), session)))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.runtime.delete_session(&id).await?;
    Ok(Json(DeleteResponse {
        message: "세션이 삭제되었습니다".to_string(),
        session_id: id,
    }))
}

// ============================================================
// Plan views
// ============================================================

fn status_message(step: TravelStep) -> &'static str {
    match step {
        TravelStep::Collecting => "정보 수집 중입니다",
        TravelStep::SearchingFlights => "항공권을 검색하고 있습니다",
        TravelStep::SearchingHotels => "숙박을 검색하고 있습니다",
        TravelStep::Planning => "일정을 생성하고 있습니다",
        TravelStep::Done => "여행 계획이 완료되었습니다",
    }
}

async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanResponse>, AppError> {
    let session = state.runtime.get_session(&id).await?;
    let budget_breakdown = session.budget_breakdown();
    let progress = session.progress();
    let step = session.current_step;

    Ok(Json(PlanResponse {
        status: SessionStatus::of(step),
        user_info: UserInfo {
            destination: session.destination,
            duration: session.duration,
            budget: session.budget,
            num_people: session.num_people,
            travel_style: session.travel_style,
        },
        plan: PlanDetails {
            flights: session.flight_options,
            hotels: session.hotel_options,
            itinerary: session.itinerary,
            budget_breakdown,
            status_message: status_message(step),
        },
        progress,
        session_id: session.session_id,
        created_at: session.created_at,
        updated_at: session.updated_at,
    }))
}

async fn get_flights(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FlightsResponse>, AppError> {
    let session = state.runtime.get_session(&id).await?;
    if session.flight_options.is_empty() {
        return Err(AppError::NotFound("항공권 정보가 없습니다".to_string()));
    }
    Ok(Json(FlightsResponse {
        session_id: session.session_id,
        destination: session.destination,
        duration: session.duration,
        flights: session.flight_options,
    }))
}

async fn get_hotels(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HotelsResponse>, AppError> {
    let session = state.runtime.get_session(&id).await?;
    if session.hotel_options.is_empty() {
        return Err(AppError::NotFound("숙박 정보가 없습니다".to_string()));
    }
    Ok(Json(HotelsResponse {
        session_id: session.session_id,
        destination: session.destination,
        duration: session.duration,
        hotels: session.hotel_options,
    }))
}

async fn get_itinerary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItineraryResponse>, AppError> {
    let session = state.runtime.get_session(&id).await?;
    if session.itinerary.is_empty() {
        return Err(AppError::NotFound("일정 정보가 없습니다".to_string()));
    }
    Ok(Json(ItineraryResponse {
        session_id: session.session_id,
        destination: session.destination,
        duration: session.duration,
        travel_style: session.travel_style,
        itinerary: session.itinerary,
    }))
}

async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, AppError> {
    let session = state.runtime.get_session(&id).await?;
    if !session.current_step.is_terminal() {
        return Err(AppError::BadRequest(
            "여행 계획이 아직 완성되지 않았습니다".to_string(),
        ));
    }
    Ok(Json(SummaryResponse {
        summary: replies::plan_summary(&session),
        session_id: session.session_id,
        format: "markdown",
    }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Body could not be read as the expected JSON shape
    Unprocessable(StatusCode, String),
    NotFound(String),
    Internal(String),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        match e {
            TurnError::SessionNotFound(_) => {
                AppError::NotFound("세션을 찾을 수 없습니다".to_string())
            }
            TurnError::Persistence(_) | TurnError::Internal(_) => {
                tracing::error!(error = %e, "Request failed");
                AppError::Internal(format!("처리 중 오류 발생: {e}"))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Unprocessable(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unprocessable(status, msg) => (status, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
