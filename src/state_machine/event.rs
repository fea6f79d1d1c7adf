//! Events that drive a planning session

use crate::model::{FlightOption, HotelOption, Itinerary};
use crate::providers::ProviderError;
use crate::state_machine::state::RequirementUpdate;
use chrono::{DateTime, Utc};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage {
        text: String,
        at: DateTime<Utc>,
    },

    // Provider outcomes
    RequirementsExtracted {
        update: RequirementUpdate,
    },
    FlightsFound {
        options: Vec<FlightOption>,
    },
    HotelsFound {
        options: Vec<HotelOption>,
    },
    ItineraryReady {
        itinerary: Itinerary,
    },
    ProviderFailed {
        error: ProviderError,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserMessage { .. } => "user_message",
            Event::RequirementsExtracted { .. } => "requirements_extracted",
            Event::FlightsFound { .. } => "flights_found",
            Event::HotelsFound { .. } => "hotels_found",
            Event::ItineraryReady { .. } => "itinerary_ready",
            Event::ProviderFailed { .. } => "provider_failed",
        }
    }
}
