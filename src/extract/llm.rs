//! Generation-backed requirement extraction

use super::rules::normalize_style;
use crate::destination;
use crate::llm::{LlmRequest, LlmService};
use crate::providers::ProviderError;
use crate::state_machine::state::{RequirementUpdate, TravelState};
use serde::Deserialize;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You extract travel requirements from a traveller's chat message. \
Reply with a single JSON object and nothing else. Use only these keys and omit any key the \
message does not mention: destination (city name), duration (nights, integer), budget (per \
person in KRW, integer), num_people (integer), travel_style (array of short tags such as \
sightseeing, food, shopping, relaxation, activity, culture, nature, history).";

/// Fields as the model reports them; every key is optional
#[derive(Debug, Default, Deserialize)]
struct ExtractedFields {
    destination: Option<String>,
    duration: Option<u32>,
    budget: Option<u64>,
    num_people: Option<u32>,
    #[serde(default)]
    travel_style: Vec<String>,
}

pub struct LlmExtractor {
    llm: Arc<dyn LlmService>,
}

impl LlmExtractor {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    pub async fn extract(
        &self,
        state: &TravelState,
        text: &str,
    ) -> Result<RequirementUpdate, ProviderError> {
        let request =
            LlmRequest::prompt(SYSTEM_PROMPT, user_prompt(state, text)).with_max_tokens(512);
        let response = self.llm.complete(&request).await?;
        let fields: ExtractedFields = serde_json::from_str(response.json_payload())
            .map_err(|e| ProviderError::invalid_result(format!("unparseable extraction: {e}")))?;
        Ok(to_update(fields))
    }
}

fn user_prompt(state: &TravelState, text: &str) -> String {
    let known = |present: bool, value: String| {
        if present {
            value
        } else {
            "unknown".to_string()
        }
    };
    format!(
        "Already known:\n\
         - destination: {}\n\
         - duration: {}\n\
         - budget: {}\n\
         - num_people: {}\n\
         - travel_style: {}\n\n\
         Message:\n{}",
        known(!state.destination.is_empty(), state.destination.clone()),
        known(state.duration > 0, format!("{} nights", state.duration)),
        known(state.budget > 0, format!("{} KRW", state.budget)),
        known(state.num_people > 0, state.num_people.to_string()),
        known(!state.travel_style.is_empty(), state.travel_style.join(", ")),
        text,
    )
}

fn to_update(fields: ExtractedFields) -> RequirementUpdate {
    let destination = fields.destination.map(|raw| {
        destination::lookup(&raw).map_or_else(|| raw.trim().to_string(), |d| d.name.to_string())
    });
    let styles: Vec<String> = fields
        .travel_style
        .iter()
        .map(|s| normalize_style(s))
        .filter(|s| !s.is_empty())
        .collect();

    RequirementUpdate {
        destination,
        duration: fields.duration,
        budget: fields.budget,
        num_people: fields.num_people,
        travel_style: (!styles.is_empty()).then_some(styles),
    }
}
