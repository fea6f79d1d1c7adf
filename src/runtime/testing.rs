//! Mock implementations for testing
//!
//! These mocks enable turn-level testing without real I/O.

use super::traits::*;
use super::{Orchestrator, TurnError};
use crate::db::{DbError, DbResult, SessionSummary};
use crate::extract::MessageExtractor;
use crate::itinerary::ItineraryPlanner;
use crate::model::{FlightOption, HotelOption};
use crate::providers::{FlightSearch, HotelSearch, ProviderError, Providers, SearchQuery};
use crate::search::{CatalogFlights, CatalogHotels};
use crate::state_machine::TravelState;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// In-memory store
// ============================================================================

/// Session store backed by a map, with switchable save failures
#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, TravelState>>,
    next_id: AtomicUsize,
    fail_saves: AtomicBool,
    pub saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn insert(&self, state: TravelState) {
        self.sessions
            .lock()
            .unwrap()
            .insert(state.session_id.clone(), state);
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self) -> DbResult<TravelState> {
        let id = format!("session-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let state = TravelState::new(id, Utc::now());
        self.insert(state.clone());
        Ok(state)
    }

    async fn get(&self, session_id: &str) -> DbResult<TravelState> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| DbError::SessionNotFound(session_id.to_string()))
    }

    async fn save(&self, state: &TravelState) -> DbResult<TravelState> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DbError::LockPoisoned);
        }
        let mut sessions = self.sessions.lock().unwrap();
        let Some(slot) = sessions.get_mut(&state.session_id) else {
            return Err(DbError::SessionNotFound(state.session_id.clone()));
        };
        let mut saved = state.clone();
        saved.updated_at = Utc::now().max(state.updated_at);
        slot.clone_from(&saved);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(saved)
    }

    async fn list(&self) -> DbResult<Vec<SessionSummary>> {
        let mut states: Vec<TravelState> =
            self.sessions.lock().unwrap().values().cloned().collect();
        states.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(states.iter().map(SessionSummary::from_state).collect())
    }

    async fn delete(&self, session_id: &str) -> DbResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| DbError::SessionNotFound(session_id.to_string()))
    }
}

// ============================================================================
// Mock providers
// ============================================================================

/// Flight search that fails a fixed number of times, then uses the catalog
pub struct FlakyFlights {
    failures_left: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FlakyFlights {
    pub fn failing(times: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(times),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FlightSearch for FlakyFlights {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<FlightOption>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(ProviderError::unavailable("flight inventory unreachable"));
        }
        CatalogFlights.search(query).await
    }
}

/// Hotel search that never answers in time
pub struct StalledHotels;

#[async_trait]
impl HotelSearch for StalledHotels {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<HotelOption>, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![])
    }
}

/// Rule extractor, catalog search and template planner
pub fn catalog_providers() -> Providers {
    Providers {
        extractor: Arc::new(MessageExtractor::new()),
        flights: Arc::new(CatalogFlights),
        hotels: Arc::new(CatalogHotels),
        planner: Arc::new(ItineraryPlanner::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::state::{ChatMessage, MessageRole};
    use crate::state_machine::{TransitionError, TravelStep};

    const FULL_REQUEST: &str = "3박4일 도쿄 여행 1인 100만원 관광";

    async fn seeded(store: &Arc<MemoryStore>) -> String {
        store.create().await.unwrap().session_id
    }

    fn orchestrator(store: &Arc<MemoryStore>) -> Orchestrator<Arc<MemoryStore>> {
        Orchestrator::new(store.clone(), catalog_providers(), Duration::from_secs(5))
    }

    /// Stored state with the user's message added, as a turn holds it when it aborts
    async fn aborted_turn(store: &Arc<MemoryStore>) -> TravelState {
        let id = seeded(store).await;
        let mut state = store.get(&id).await.unwrap();
        state.messages.push(ChatMessage::user("도쿄", Utc::now()));
        state
    }

    #[tokio::test]
    async fn test_full_request_reaches_done_in_one_turn() {
        let store = Arc::new(MemoryStore::new());
        let id = seeded(&store).await;
        let orchestrator = orchestrator(&store);

        let outcome = orchestrator.run_turn(&id, FULL_REQUEST.to_string()).await.unwrap();
        let state = &outcome.state;
        assert_eq!(state.destination, "Tokyo");
        assert_eq!(state.duration, 3);
        assert_eq!(state.budget, 1_000_000);
        assert_eq!(state.num_people, 1);
        assert_eq!(state.travel_style, vec!["sightseeing".to_string()]);
        assert!(state.info_collected);
        assert_eq!(state.current_step, TravelStep::Done);
        assert_eq!(state.itinerary.len(), 4);
        assert_eq!(state.flight_options.len(), 3);
        assert_eq!(state.hotel_options.len(), 3);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].role, MessageRole::Assistant);
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_greeting_stays_collecting() {
        let store = Arc::new(MemoryStore::new());
        let id = seeded(&store).await;
        let orchestrator = orchestrator(&store);

        let outcome = orchestrator.run_turn(&id, "안녕".to_string()).await.unwrap();
        assert_eq!(outcome.state.current_step, TravelStep::Collecting);
        assert!(outcome.state.destination.is_empty());
        assert!(outcome.reply.contains("어디로"));
        assert_eq!(outcome.state.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_flight_failure_parks_then_retry_succeeds() {
        let store = Arc::new(MemoryStore::new());
        let id = seeded(&store).await;
        let flights = Arc::new(FlakyFlights::failing(1));
        let providers = Providers {
            flights: flights.clone(),
            ..catalog_providers()
        };
        let orchestrator = Orchestrator::new(store.clone(), providers, Duration::from_secs(5));

        let failed = orchestrator.run_turn(&id, FULL_REQUEST.to_string()).await.unwrap();
        assert_eq!(failed.state.current_step, TravelStep::SearchingFlights);
        assert!(failed.state.flight_options.is_empty());
        assert!(failed.state.error.as_deref().unwrap().starts_with("항공권 검색 실패"));
        assert!(failed.reply.contains("다시 시도"));

        let retried = orchestrator.run_turn(&id, "다시 해줘".to_string()).await.unwrap();
        assert_eq!(retried.state.current_step, TravelStep::Done);
        assert_eq!(retried.state.error, None);
        assert_eq!(retried.state.messages.len(), 4);
        assert_eq!(flights.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stalled_provider_times_out() {
        let store = Arc::new(MemoryStore::new());
        let id = seeded(&store).await;
        let providers = Providers {
            hotels: Arc::new(StalledHotels),
            ..catalog_providers()
        };
        let orchestrator = Orchestrator::new(store.clone(), providers, Duration::from_millis(50));

        let outcome = orchestrator.run_turn(&id, FULL_REQUEST.to_string()).await.unwrap();
        assert_eq!(outcome.state.current_step, TravelStep::SearchingHotels);
        assert_eq!(outcome.state.flight_options.len(), 3);
        assert!(outcome.state.error.as_deref().unwrap().contains("no response within"));
    }

    #[tokio::test]
    async fn test_persistence_failure_saves_nothing() {
        let store = Arc::new(MemoryStore::new());
        let id = seeded(&store).await;
        let orchestrator = orchestrator(&store);

        store.set_fail_saves(true);
        let err = orchestrator.run_turn(&id, FULL_REQUEST.to_string()).await.unwrap_err();
        assert!(matches!(err, TurnError::Persistence(_)));

        let stored = store.get(&id).await.unwrap();
        assert!(stored.messages.is_empty());
        assert_eq!(stored.current_step, TravelStep::Collecting);
    }

    #[tokio::test]
    async fn test_follow_up_at_done_does_not_search_again() {
        let store = Arc::new(MemoryStore::new());
        let id = seeded(&store).await;
        let flights = Arc::new(FlakyFlights::failing(0));
        let providers = Providers {
            flights: flights.clone(),
            ..catalog_providers()
        };
        let orchestrator = Orchestrator::new(store.clone(), providers, Duration::from_secs(5));

        let done = orchestrator.run_turn(&id, FULL_REQUEST.to_string()).await.unwrap();
        let follow = orchestrator.run_turn(&id, "호텔 다시 보여줘".to_string()).await.unwrap();
        assert!(follow.reply.starts_with("## 숙소"));
        assert_eq!(follow.state.hotel_options, done.state.hotel_options);
        assert_eq!(flights.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = orchestrator(&store);
        let err = orchestrator.run_turn("ghost", "안녕".to_string()).await.unwrap_err();
        assert!(matches!(err, TurnError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_fault_is_recorded_with_the_user_message() {
        let store = Arc::new(MemoryStore::new());
        let state = aborted_turn(&store).await;
        let id = state.session_id.clone();

        let err = orchestrator(&store)
            .record_fault(state, &TransitionError::ChainExhausted(5))
            .await;
        assert!(matches!(err, TurnError::Internal(ref msg) if msg.contains("5 steps")));

        let stored = store.get(&id).await.unwrap();
        assert_eq!(stored.messages.len(), 1);
        assert_eq!(stored.messages[0].role, MessageRole::User);
        assert!(stored.error.as_deref().unwrap().starts_with("내부 오류: "));
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fault_with_failing_save_reports_persistence() {
        let store = Arc::new(MemoryStore::new());
        let state = aborted_turn(&store).await;
        let id = state.session_id.clone();

        store.set_fail_saves(true);
        let err = orchestrator(&store)
            .record_fault(state, &TransitionError::ChainExhausted(5))
            .await;
        assert!(matches!(err, TurnError::Persistence(_)));

        let stored = store.get(&id).await.unwrap();
        assert!(stored.messages.is_empty());
        assert_eq!(stored.error, None);
    }

    #[tokio::test]
    async fn test_style_follow_up_keeps_collected_fields() {
        let store = Arc::new(MemoryStore::new());
        let id = seeded(&store).await;
        let orchestrator = orchestrator(&store);

        let first = orchestrator
            .run_turn(&id, "3박4일 도쿄 여행 1인 100만원".to_string())
            .await
            .unwrap();
        assert_eq!(first.state.current_step, TravelStep::Collecting);

        let done = orchestrator
            .run_turn(&id, "세부 일정은 맛집 위주로 부탁해요".to_string())
            .await
            .unwrap();
        assert_eq!(done.state.current_step, TravelStep::Done);
        assert_eq!(done.state.destination, "Tokyo");
        assert_eq!(done.state.num_people, 1);
        assert_eq!(done.state.travel_style, vec!["food".to_string()]);
    }
}
