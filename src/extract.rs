//! Requirement extraction
//!
//! Pattern rules run first. When they recognise nothing and a generation
//! provider is configured, the message is handed to the model instead.

mod llm;
pub mod rules;

pub use rules::style_label;

use crate::llm::LlmService;
use crate::providers::{ProviderError, RequirementExtractor};
use crate::state_machine::state::{RequirementUpdate, TravelState};
use async_trait::async_trait;
use llm::LlmExtractor;
use std::sync::Arc;

#[derive(Default)]
pub struct MessageExtractor {
    fallback: Option<LlmExtractor>,
}

impl MessageExtractor {
    /// Rules only
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_llm(mut self, llm: Arc<dyn LlmService>) -> Self {
        self.fallback = Some(LlmExtractor::new(llm));
        self
    }
}

#[async_trait]
impl RequirementExtractor for MessageExtractor {
    async fn extract(
        &self,
        state: &TravelState,
        text: &str,
    ) -> Result<RequirementUpdate, ProviderError> {
        let update = rules::extract(state, text);
        if !update.is_empty() {
            return Ok(update);
        }
        let Some(fallback) = &self.fallback else {
            return Ok(update);
        };

        match fallback.extract(state, text).await {
            Ok(update) => Ok(update),
            Err(e) => {
                tracing::warn!(
                    session_id = %state.session_id,
                    error = %e,
                    "LLM extraction failed, treating message as no change"
                );
                Ok(RequirementUpdate::default())
            }
        }
    }
}
