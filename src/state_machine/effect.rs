//! Effects produced by state transitions

use crate::providers::{PlanRequest, SearchQuery};

/// Work the runtime performs after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Interpret a chat message as requirement data
    ExtractRequirements { text: String },

    SearchFlights { query: SearchQuery },

    SearchHotels { query: SearchQuery },

    SynthesizeItinerary { request: PlanRequest },

    /// Append an assistant message and end the turn
    Reply { content: String },
}

impl Effect {
    pub fn reply(content: impl Into<String>) -> Self {
        Effect::Reply {
            content: content.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::ExtractRequirements { .. } => "extract_requirements",
            Effect::SearchFlights { .. } => "search_flights",
            Effect::SearchHotels { .. } => "search_hotels",
            Effect::SynthesizeItinerary { .. } => "synthesize_itinerary",
            Effect::Reply { .. } => "reply",
        }
    }
}
