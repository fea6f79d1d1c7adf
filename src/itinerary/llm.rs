//! Generation-backed itinerary synthesis

use crate::destination;
use crate::llm::{LlmRequest, LlmService};
use crate::model::Itinerary;
use crate::providers::{PlanRequest, ProviderError};
use std::fmt::Write as _;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You plan day-by-day travel itineraries. Reply with a single JSON \
object and nothing else. Keys are \"day1\", \"day2\", ... for every day of the trip. Each value \
is {\"date\": \"YYYY-MM-DD\", \"theme\": short label, \"activities\": [{\"time\": \"HH:MM\", \
\"activity\": label, \"type\": one of transport|sightseeing|food|shopping|rest, \"location\": \
optional, \"duration\": optional, \"description\": optional}]}. Day 1 starts with the flight \
from Incheon and the last day ends with the return flight. Every travel style the traveller \
asked for must appear as #tag in the description of at least one activity.";

pub struct LlmPlanner {
    llm: Arc<dyn LlmService>,
}

impl LlmPlanner {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    /// Ask the model for a plan. The result is not validated here.
    pub async fn plan(&self, request: &PlanRequest) -> Result<Itinerary, ProviderError> {
        let prompt = LlmRequest::prompt(SYSTEM_PROMPT, user_prompt(request)).with_max_tokens(4096);
        let response = self.llm.complete(&prompt).await?;
        let mut itinerary: Itinerary = serde_json::from_str(response.json_payload())
            .map_err(|e| ProviderError::invalid_result(format!("unparseable itinerary: {e}")))?;
        itinerary.sort_all();
        Ok(itinerary)
    }
}

fn user_prompt(request: &PlanRequest) -> String {
    let mut prompt = format!(
        "Destination: {} ({})\n\
         Nights: {}\n\
         Days: {}\n\
         First day: {}\n\
         Travellers: {}\n\
         Budget per person: {} KRW\n\
         Travel style: {}\n",
        request.destination,
        destination::display_name(&request.destination),
        request.duration,
        request.days(),
        request.start_date.format("%Y-%m-%d"),
        request.num_people,
        request.budget,
        request.travel_style.join(", "),
    );
    if let Some(flight) = &request.flight {
        let _ = writeln!(
            prompt,
            "Flight: {} departing {} arriving {}, returning {}",
            flight.airline,
            flight.outbound.departure_time,
            flight.outbound.arrival_time,
            flight.inbound.departure_time
        );
    }
    if let Some(hotel) = &request.hotel {
        let _ = writeln!(prompt, "Hotel: {} in {}", hotel.name, hotel.location);
    }
    prompt
}
