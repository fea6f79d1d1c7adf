//! Property-based tests for the state machine
//!
//! Arbitrary event sequences are replayed from a fresh session; rejected
//! events leave the state untouched, so every invariant is checked after
//! each accepted transition.

use super::state::*;
use super::transition::*;
use super::*;
use crate::model::{
    Activity, ActivityType, DayPlan, FlightLeg, FlightOption, HotelOption, Itinerary, Tier,
};
use crate::providers::ProviderError;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn fresh() -> TravelState {
    TravelState::new("prop", Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
}

fn leg() -> FlightLeg {
    FlightLeg {
        date: "2025-01-31".into(),
        departure_time: "10:00".into(),
        arrival_time: "12:00".into(),
        flight_time: "2h 0m".into(),
    }
}

fn flight(tier: Tier, price: u64) -> FlightOption {
    FlightOption {
        tier,
        price,
        airline: "Prop Air".into(),
        outbound: leg(),
        inbound: leg(),
    }
}

fn hotel(tier: Tier, price: u64) -> HotelOption {
    HotelOption {
        tier,
        name: "Prop Inn".into(),
        price_per_night: price,
        total_price: price,
        location: "center".into(),
        rating: 4.0,
        amenities: vec![],
        distance_from_center: "1km".into(),
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_update() -> impl Strategy<Value = RequirementUpdate> {
    (
        proptest::option::of(prop_oneof![
            Just("Tokyo".to_string()),
            Just("Osaka".to_string()),
            Just(" ".to_string()),
        ]),
        proptest::option::of(0u32..20),
        proptest::option::of(prop_oneof![Just(50_000u64), Just(1_000_000), Just(20_000_000)]),
        proptest::option::of(0u32..12),
        proptest::option::of(proptest::collection::vec(
            prop_oneof![Just("food".to_string()), Just("shopping".to_string())],
            0..3,
        )),
    )
        .prop_map(
            |(destination, duration, budget, num_people, travel_style)| RequirementUpdate {
                destination,
                duration,
                budget,
                num_people,
                travel_style,
            },
        )
}

fn arb_prices() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(1u64..1_000_000, 0..4)
}

fn arb_itinerary() -> impl Strategy<Value = Itinerary> {
    (0usize..17, any::<bool>()).prop_map(|(days, with_activities)| {
        let mut itinerary = Itinerary::new();
        for day in 1..=days {
            let activities = if with_activities {
                vec![Activity::new("10:00", "산책", ActivityType::Sightseeing)]
            } else {
                vec![]
            };
            itinerary.insert_day(
                day,
                DayPlan {
                    date: "2025-02-01".into(),
                    theme: "산책".into(),
                    activities,
                },
            );
        }
        itinerary
    })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        prop_oneof![Just(""), Just("안녕"), Just("도쿄 3박")].prop_map(|text| Event::UserMessage {
            text: text.to_string(),
            at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 5, 0).unwrap(),
        }),
        arb_update().prop_map(|update| Event::RequirementsExtracted { update }),
        arb_prices().prop_map(|prices| Event::FlightsFound {
            options: Tier::ALL.into_iter().zip(prices).map(|(t, p)| flight(t, p)).collect(),
        }),
        arb_prices().prop_map(|prices| Event::HotelsFound {
            options: Tier::ALL.into_iter().zip(prices).map(|(t, p)| hotel(t, p)).collect(),
        }),
        arb_itinerary().prop_map(|itinerary| Event::ItineraryReady { itinerary }),
        Just(Event::ProviderFailed {
            error: ProviderError::unavailable("down"),
        }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_step_never_regresses(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = fresh();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                prop_assert!(result.new_state.current_step >= state.current_step);
                if state.current_step.is_terminal() {
                    prop_assert_eq!(result.new_state.current_step, TravelStep::Done);
                }
                state = result.new_state;
            }
        }
    }

    #[test]
    fn prop_info_collected_iff_all_fields_present(
        updates in proptest::collection::vec(arb_update(), 1..10)
    ) {
        let mut state = fresh();
        for update in updates {
            if let Ok(result) = transition(&state, Event::RequirementsExtracted { update }) {
                state = result.new_state;
                let expected = !state.destination.is_empty()
                    && state.duration > 0
                    && state.budget > 0
                    && state.num_people > 0
                    && !state.travel_style.is_empty();
                prop_assert_eq!(state.info_collected, expected);
            }
        }
    }

    #[test]
    fn prop_accepted_requirements_stay_in_range(
        updates in proptest::collection::vec(arb_update(), 1..10)
    ) {
        let mut state = fresh();
        for update in updates {
            if let Ok(result) = transition(&state, Event::RequirementsExtracted { update }) {
                state = result.new_state;
            }
        }
        prop_assert!(state.duration == 0 || DURATION_RANGE.contains(&state.duration));
        prop_assert!(state.budget == 0 || BUDGET_RANGE.contains(&state.budget));
        prop_assert!(state.num_people == 0 || PARTY_RANGE.contains(&state.num_people));
    }

    #[test]
    fn prop_only_user_messages_append_history(
        events in proptest::collection::vec(arb_event(), 0..40)
    ) {
        let mut state = fresh();
        for event in events {
            let is_user = matches!(event, Event::UserMessage { .. });
            if let Ok(result) = transition(&state, event) {
                let expected = state.messages.len() + usize::from(is_user);
                prop_assert_eq!(result.new_state.messages.len(), expected);
                prop_assert_eq!(
                    &result.new_state.messages[..state.messages.len()],
                    &state.messages[..]
                );
                state = result.new_state;
            }
        }
    }

    #[test]
    fn prop_every_transition_yields_exactly_one_effect(
        events in proptest::collection::vec(arb_event(), 0..40)
    ) {
        let mut state = fresh();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                prop_assert_eq!(result.effects.len(), 1);
                state = result.new_state;
            }
        }
    }

    #[test]
    fn prop_stored_results_satisfy_contracts(
        events in proptest::collection::vec(arb_event(), 0..60)
    ) {
        let mut state = fresh();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
            if !state.flight_options.is_empty() {
                prop_assert!(crate::model::check_tier_contract(&state.flight_options).is_ok());
            }
            if !state.hotel_options.is_empty() {
                prop_assert!(crate::model::check_tier_contract(&state.hotel_options).is_ok());
            }
            if state.current_step == TravelStep::Done {
                prop_assert!(state.itinerary.check_shape(state.trip_days() as usize).is_ok());
            }
        }
    }
}
