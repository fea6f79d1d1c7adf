//! Pure state transition function

use super::state::{ChatMessage, TravelState, TravelStep};
use super::{Effect, Event};
use crate::model::check_tier_contract;
use crate::replies;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TravelState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TravelState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Provider chain did not settle within {0} steps")]
    ChainExhausted(usize),
}

/// Pure transition function
///
/// Given the same state and event it always produces the same result. The
/// only mutations are on the returned copy of the state.
pub fn transition(state: &TravelState, event: Event) -> Result<TransitionResult, TransitionError> {
    let step = state.current_step;
    match (step, event) {
        // ============================================================
        // User messages
        // ============================================================
        (_, Event::UserMessage { text, at }) => {
            let mut next = state.clone();
            next.messages.push(ChatMessage::user(text.clone(), at));

            if text.trim().is_empty() {
                let reply = replies::reprompt(&next);
                return Ok(TransitionResult::new(next).with_effect(Effect::reply(reply)));
            }

            let effect = match step {
                TravelStep::Collecting => Effect::ExtractRequirements { text },
                // A parked step retries its own action
                TravelStep::SearchingFlights => Effect::SearchFlights {
                    query: next.search_query(),
                },
                TravelStep::SearchingHotels => Effect::SearchHotels {
                    query: next.search_query(),
                },
                TravelStep::Planning => Effect::SynthesizeItinerary {
                    request: next.plan_request(),
                },
                TravelStep::Done => Effect::reply(replies::follow_up(&next, &text)),
            };
            Ok(TransitionResult::new(next).with_effect(effect))
        }

        // ============================================================
        // Requirement collection
        // ============================================================
        (TravelStep::Collecting, Event::RequirementsExtracted { update }) => {
            let mut next = state.clone();
            let (accepted, issues) = update.validated();
            next.apply(&accepted);
            if !accepted.is_empty() {
                next.error = None;
            }

            if next.info_collected {
                next.current_step = TravelStep::SearchingFlights;
                next.error = None;
                let query = next.search_query();
                return Ok(TransitionResult::new(next).with_effect(Effect::SearchFlights { query }));
            }

            let reply = replies::clarification(&next, &accepted, &issues);
            Ok(TransitionResult::new(next).with_effect(Effect::reply(reply)))
        }

        // ============================================================
        // Search and synthesis results
        // ============================================================
        (TravelStep::SearchingFlights, Event::FlightsFound { options }) => {
            if let Err(reason) = check_tier_contract(&options) {
                return Ok(fail(state, &format!("잘못된 항공권 결과: {reason}")));
            }
            let mut next = state.clone();
            next.flight_options = options;
            next.current_step = TravelStep::SearchingHotels;
            next.error = None;
            let query = next.search_query();
            Ok(TransitionResult::new(next).with_effect(Effect::SearchHotels { query }))
        }

        (TravelStep::SearchingHotels, Event::HotelsFound { options }) => {
            if let Err(reason) = check_tier_contract(&options) {
                return Ok(fail(state, &format!("잘못된 숙소 결과: {reason}")));
            }
            let mut next = state.clone();
            next.hotel_options = options;
            next.current_step = TravelStep::Planning;
            next.error = None;
            let request = next.plan_request();
            Ok(TransitionResult::new(next).with_effect(Effect::SynthesizeItinerary { request }))
        }

        (TravelStep::Planning, Event::ItineraryReady { itinerary }) => {
            if let Err(reason) = itinerary.check_shape(state.trip_days() as usize) {
                return Ok(fail(state, &format!("잘못된 일정: {reason}")));
            }
            let mut next = state.clone();
            next.itinerary = itinerary;
            next.current_step = TravelStep::Done;
            next.error = None;
            let summary = replies::plan_summary(&next);
            Ok(TransitionResult::new(next).with_effect(Effect::reply(summary)))
        }

        (
            TravelStep::SearchingFlights | TravelStep::SearchingHotels | TravelStep::Planning,
            Event::ProviderFailed { error },
        ) => Ok(fail(state, &error.message)),

        // ============================================================
        // Everything else is a runtime bug
        // ============================================================
        (step, event) => Err(TransitionError::InvalidTransition(format!(
            "{} while {step}",
            event.name()
        ))),
    }
}

/// Park at the current step with the failure recorded
fn fail(state: &TravelState, reason: &str) -> TransitionResult {
    let mut next = state.clone();
    let step = next.current_step;
    next.error = Some(replies::failure_note(step, reason));
    let reply = replies::failure(step, reason);
    TransitionResult::new(next).with_effect(Effect::reply(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Activity, ActivityType, DayPlan, FlightLeg, FlightOption, HotelOption, Itinerary, Tier,
    };
    use crate::providers::ProviderError;
    use crate::state_machine::state::{MessageRole, RequirementUpdate};
    use chrono::{TimeZone, Utc};

    fn fresh() -> TravelState {
        TravelState::new("s", Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
    }

    fn user(text: &str) -> Event {
        Event::UserMessage {
            text: text.to_string(),
            at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 1, 0).unwrap(),
        }
    }

    fn full_update() -> RequirementUpdate {
        RequirementUpdate {
            destination: Some("Tokyo".into()),
            duration: Some(3),
            budget: Some(1_000_000),
            num_people: Some(1),
            travel_style: Some(vec!["sightseeing".into()]),
        }
    }

    fn flights(prices: [u64; 3]) -> Vec<FlightOption> {
        Tier::ALL
            .into_iter()
            .zip(prices)
            .map(|(tier, price)| {
                let leg = FlightLeg {
                    date: "2025-03-31".into(),
                    departure_time: "09:00".into(),
                    arrival_time: "11:30".into(),
                    flight_time: "2h 30m".into(),
                };
                FlightOption {
                    tier,
                    price,
                    airline: "Test Air".into(),
                    outbound: leg.clone(),
                    inbound: leg,
                }
            })
            .collect()
    }

    fn hotels() -> Vec<HotelOption> {
        Tier::ALL
            .into_iter()
            .zip([40_000, 90_000, 300_000])
            .map(|(tier, price)| HotelOption {
                tier,
                name: format!("{tier} hotel"),
                price_per_night: price,
                total_price: price * 3,
                location: "center".into(),
                rating: 4.0,
                amenities: vec![],
                distance_from_center: "1km".into(),
            })
            .collect()
    }

    fn itinerary(days: usize) -> Itinerary {
        let mut itinerary = Itinerary::new();
        for day in 1..=days {
            itinerary.insert_day(
                day,
                DayPlan {
                    date: format!("2025-04-0{day}"),
                    theme: "관광".into(),
                    activities: vec![Activity::new(
                        "09:00",
                        "명소 관람",
                        ActivityType::Sightseeing,
                    )],
                },
            );
        }
        itinerary
    }

    fn at_step(step: TravelStep) -> TravelState {
        let mut state = fresh();
        state.apply(&full_update());
        state.current_step = step;
        state
    }

    #[test]
    fn test_user_message_in_collecting_requests_extraction() {
        let result = transition(&fresh(), user("도쿄 가고 싶어")).unwrap();
        assert_eq!(result.new_state.messages.len(), 1);
        assert_eq!(result.new_state.messages[0].role, MessageRole::User);
        assert_eq!(
            result.effects,
            vec![Effect::ExtractRequirements {
                text: "도쿄 가고 싶어".into()
            }]
        );
    }

    #[test]
    fn test_blank_message_reprompts_without_extraction() {
        let result = transition(&fresh(), user("   ")).unwrap();
        assert_eq!(result.new_state.current_step, TravelStep::Collecting);
        assert!(matches!(
            &result.effects[..],
            [Effect::Reply { content }] if content.contains("비어")
        ));
    }

    #[test]
    fn test_complete_requirements_start_flight_search() {
        let event = Event::RequirementsExtracted {
            update: full_update(),
        };
        let result = transition(&fresh(), event).unwrap();
        assert!(result.new_state.info_collected);
        assert_eq!(result.new_state.current_step, TravelStep::SearchingFlights);
        assert!(matches!(result.effects[0], Effect::SearchFlights { .. }));
    }

    #[test]
    fn test_partial_requirements_ask_for_next_field() {
        let event = Event::RequirementsExtracted {
            update: RequirementUpdate {
                destination: Some("Osaka".into()),
                ..Default::default()
            },
        };
        let result = transition(&fresh(), event).unwrap();
        assert_eq!(result.new_state.current_step, TravelStep::Collecting);
        assert!(matches!(
            &result.effects[..],
            [Effect::Reply { content }] if content.contains("기간")
        ));
    }

    #[test]
    fn test_chain_through_to_done() {
        let state = at_step(TravelStep::SearchingFlights);
        let r = transition(&state, Event::FlightsFound { options: flights([1, 2, 3]) }).unwrap();
        assert_eq!(r.new_state.current_step, TravelStep::SearchingHotels);

        let r = transition(&r.new_state, Event::HotelsFound { options: hotels() }).unwrap();
        assert_eq!(r.new_state.current_step, TravelStep::Planning);
        let Effect::SynthesizeItinerary { request } = &r.effects[0] else {
            panic!("expected synthesis, got {:?}", r.effects);
        };
        assert_eq!(request.hotel.as_ref().map(|h| h.tier), Some(Tier::Standard));

        let ready = Event::ItineraryReady {
            itinerary: itinerary(4),
        };
        let r = transition(&r.new_state, ready).unwrap();
        assert_eq!(r.new_state.current_step, TravelStep::Done);
        assert!(matches!(
            &r.effects[..],
            [Effect::Reply { content }] if content.starts_with("# 도쿄")
        ));
    }

    #[test]
    fn test_unordered_flights_are_a_failure() {
        let state = at_step(TravelStep::SearchingFlights);
        let r = transition(&state, Event::FlightsFound { options: flights([3, 2, 1]) }).unwrap();
        assert_eq!(r.new_state.current_step, TravelStep::SearchingFlights);
        assert!(r.new_state.flight_options.is_empty());
        assert!(r.new_state.error.is_some());
    }

    #[test]
    fn test_wrong_day_count_is_a_failure() {
        let state = at_step(TravelStep::Planning);
        let r = transition(&state, Event::ItineraryReady { itinerary: itinerary(3) }).unwrap();
        assert_eq!(r.new_state.current_step, TravelStep::Planning);
        assert!(r.new_state.itinerary.is_empty());
    }

    #[test]
    fn test_provider_failure_parks_and_retry_clears_error() {
        let state = at_step(TravelStep::SearchingFlights);
        let failed = transition(
            &state,
            Event::ProviderFailed {
                error: ProviderError::timeout("flight search timed out"),
            },
        )
        .unwrap();
        assert_eq!(failed.new_state.current_step, TravelStep::SearchingFlights);
        assert_eq!(
            failed.new_state.error.as_deref(),
            Some("항공권 검색 실패: flight search timed out")
        );

        let retry = transition(&failed.new_state, user("다시")).unwrap();
        assert!(matches!(retry.effects[0], Effect::SearchFlights { .. }));

        let ok = transition(&retry.new_state, Event::FlightsFound { options: flights([1, 2, 3]) })
            .unwrap();
        assert_eq!(ok.new_state.error, None);
    }

    #[test]
    fn test_done_answers_follow_ups_without_providers() {
        let state = at_step(TravelStep::Done);
        let r = transition(&state, user("예산 알려줘")).unwrap();
        assert_eq!(r.new_state.current_step, TravelStep::Done);
        assert!(matches!(&r.effects[..], [Effect::Reply { .. }]));
    }

    #[test]
    fn test_out_of_order_events_are_rejected() {
        let err = transition(&fresh(), Event::HotelsFound { options: hotels() }).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTransition(_)));

        let done = at_step(TravelStep::Done);
        let err = transition(&done, Event::RequirementsExtracted { update: full_update() });
        assert!(err.is_err());
    }
}
