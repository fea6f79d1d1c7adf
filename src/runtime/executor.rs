//! Turn execution
//!
//! A turn feeds the user message into the state machine, executes the
//! provider effects it asks for, and feeds each outcome back in until a
//! reply is produced. The state is saved once, at the very end.

use super::traits::SessionStore;
use super::TurnError;
use crate::providers::{ProviderError, Providers};
use crate::state_machine::state::{ChatMessage, RequirementUpdate};
use crate::state_machine::{transition, Effect, Event, TransitionError, TravelState, TravelStep};
use chrono::Utc;
use std::collections::VecDeque;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};

/// Provider calls allowed in one turn before the chain is declared stuck
const MAX_PROVIDER_CALLS: usize = TravelStep::ALL.len();

/// Result of a successful turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub state: TravelState,
}

/// Runs turns against a store with a fixed set of providers
#[derive(Clone)]
pub struct Orchestrator<S> {
    store: S,
    providers: Providers,
    provider_timeout: Duration,
}

impl<S: SessionStore> Orchestrator<S> {
    pub fn new(store: S, providers: Providers, provider_timeout: Duration) -> Self {
        Self {
            store,
            providers,
            provider_timeout,
        }
    }

    pub async fn run_turn(
        &self,
        session_id: &str,
        text: String,
    ) -> Result<TurnOutcome, TurnError> {
        let started = Instant::now();
        let mut state = self.store.get(session_id).await?;
        let history_len = state.messages.len();
        let event = Event::UserMessage {
            text: text.clone(),
            at: Utc::now(),
        };

        let reply = match self.drive(&mut state, event).await {
            Ok(reply) => reply,
            Err(e) => {
                if state.messages.len() == history_len {
                    state.messages.push(ChatMessage::user(text, Utc::now()));
                }
                return Err(self.record_fault(state, &e).await);
            }
        };

        state
            .messages
            .push(ChatMessage::assistant(reply.clone(), Utc::now()));
        let state = self.store.save(&state).await?;

        tracing::info!(
            session_id = %session_id,
            step = %state.current_step,
            duration_ms = %started.elapsed().as_millis(),
            "Turn complete"
        );
        Ok(TurnOutcome { reply, state })
    }

    /// Process events until the machine produces a reply
    async fn drive(
        &self,
        state: &mut TravelState,
        first: Event,
    ) -> Result<String, TransitionError> {
        let mut queue = VecDeque::from([first]);
        let mut provider_calls = 0;
        let mut reply = None;

        while let Some(event) = queue.pop_front() {
            let previous = state.current_step;
            let result = transition(state, event)?;
            *state = result.new_state;

            if state.current_step != previous {
                tracing::info!(
                    session_id = %state.session_id,
                    from = %previous,
                    to = %state.current_step,
                    "Step transition"
                );
            }

            for effect in result.effects {
                if let Effect::Reply { content } = effect {
                    reply = Some(content);
                    continue;
                }
                provider_calls += 1;
                if provider_calls > MAX_PROVIDER_CALLS {
                    return Err(TransitionError::ChainExhausted(MAX_PROVIDER_CALLS));
                }
                if let Some(next) = self.execute_effect(state, effect).await {
                    queue.push_back(next);
                }
            }
        }

        reply.ok_or_else(|| {
            TransitionError::InvalidTransition("turn ended without a reply".into())
        })
    }

    /// Run one provider effect and turn its outcome into the next event
    async fn execute_effect(&self, state: &TravelState, effect: Effect) -> Option<Event> {
        let name = effect.name();
        let started = Instant::now();

        let event = match effect {
            Effect::ExtractRequirements { text } => {
                let outcome = self
                    .bounded(self.providers.extractor.extract(state, &text))
                    .await;
                let update = outcome.unwrap_or_else(|e| {
                    tracing::warn!(
                        session_id = %state.session_id,
                        error = %e,
                        "Extraction failed, treating message as no change"
                    );
                    RequirementUpdate::default()
                });
                Event::RequirementsExtracted { update }
            }
            Effect::SearchFlights { query } => {
                match self.bounded(self.providers.flights.search(&query)).await {
                    Ok(options) => Event::FlightsFound { options },
                    Err(error) => Event::ProviderFailed { error },
                }
            }
            Effect::SearchHotels { query } => {
                match self.bounded(self.providers.hotels.search(&query)).await {
                    Ok(options) => Event::HotelsFound { options },
                    Err(error) => Event::ProviderFailed { error },
                }
            }
            Effect::SynthesizeItinerary { request } => {
                match self.bounded(self.providers.planner.synthesize(&request)).await {
                    Ok(itinerary) => Event::ItineraryReady { itinerary },
                    Err(error) => Event::ProviderFailed { error },
                }
            }
            Effect::Reply { .. } => return None,
        };

        let duration_ms = started.elapsed().as_millis();
        if let Event::ProviderFailed { error } = &event {
            tracing::warn!(
                session_id = %state.session_id,
                effect = name,
                kind = error.kind.as_str(),
                error = %error,
                duration_ms = %duration_ms,
                "Provider call failed"
            );
        } else {
            tracing::info!(
                session_id = %state.session_id,
                effect = name,
                duration_ms = %duration_ms,
                "Provider call succeeded"
            );
        }
        Some(event)
    }

    /// Apply the provider deadline to a call
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        tokio::time::timeout(self.provider_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::timeout(format!(
                    "no response within {}s",
                    self.provider_timeout.as_secs_f32()
                )))
            })
    }

    /// Save the user message and the fault, then report an internal error.
    /// A failing save turns this into a persistence error instead.
    pub(super) async fn record_fault(
        &self,
        mut state: TravelState,
        fault: &TransitionError,
    ) -> TurnError {
        tracing::error!(session_id = %state.session_id, error = %fault, "Turn aborted");
        state.error = Some(format!("내부 오류: {fault}"));
        match self.store.save(&state).await {
            Ok(_) => TurnError::Internal(fault.to_string()),
            Err(e) => e.into(),
        }
    }
}

// ============================================================================
// Per-session actor
// ============================================================================

/// One chat turn waiting for its session's actor
pub struct TurnRequest {
    pub text: String,
    pub reply: oneshot::Sender<Result<TurnOutcome, TurnError>>,
}

/// Processes a single session's turns strictly one at a time.
///
/// The runtime stops once no turn arrives within `idle_timeout`. Turns
/// already queued at that moment are still answered; later sends fail and
/// the caller starts a fresh runtime.
pub struct SessionRuntime<S> {
    session_id: String,
    orchestrator: Orchestrator<S>,
    turn_rx: mpsc::Receiver<TurnRequest>,
    idle_timeout: Duration,
}

impl<S: SessionStore> SessionRuntime<S> {
    pub fn new(
        session_id: String,
        orchestrator: Orchestrator<S>,
        turn_rx: mpsc::Receiver<TurnRequest>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            session_id,
            orchestrator,
            turn_rx,
            idle_timeout,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(session_id = %self.session_id, "Starting session runtime");

        loop {
            match tokio::time::timeout(self.idle_timeout, self.turn_rx.recv()).await {
                Ok(Some(request)) => self.handle(request).await,
                Ok(None) => break,
                Err(_) => {
                    tracing::debug!(session_id = %self.session_id, "Session runtime idle");
                    self.turn_rx.close();
                    while let Some(request) = self.turn_rx.recv().await {
                        self.handle(request).await;
                    }
                    break;
                }
            }
        }

        tracing::debug!(session_id = %self.session_id, "Session runtime stopped");
    }

    async fn handle(&self, request: TurnRequest) {
        let outcome = self
            .orchestrator
            .run_turn(&self.session_id, request.text)
            .await;
        if request.reply.send(outcome).is_err() {
            tracing::debug!(
                session_id = %self.session_id,
                "Caller went away before the reply"
            );
        }
    }
}
