//! Model definitions for the supported LLM providers

use super::anthropic::AnthropicModel;
use super::openai::OpenAIModel;
use super::{AnthropicService, LlmService, OpenAIService};
use std::sync::Arc;

/// LLM provider enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

impl Provider {
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic",
            Provider::OpenAI => "OpenAI",
        }
    }
}

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// User-facing model ID (e.g., "claude-4.5-haiku")
    pub id: &'static str,
    pub provider: Provider,
    pub description: &'static str,
    /// Factory taking the API key and optional gateway URL
    pub factory: fn(&str, Option<&str>) -> Result<Arc<dyn LlmService>, String>,
}

fn anthropic(
    model: AnthropicModel,
    api_key: &str,
    gateway: Option<&str>,
) -> Result<Arc<dyn LlmService>, String> {
    if api_key.is_empty() {
        return Err(format!("{} requires ANTHROPIC_API_KEY or gateway", model.model_id()));
    }
    let service = AnthropicService::new(api_key.to_string(), model, gateway)
        .map_err(|e| e.message)?;
    Ok(Arc::new(service))
}

fn openai(
    model: OpenAIModel,
    api_key: &str,
    gateway: Option<&str>,
) -> Result<Arc<dyn LlmService>, String> {
    if api_key.is_empty() {
        return Err(format!("{} requires OPENAI_API_KEY or gateway", model.model_id()));
    }
    let service =
        OpenAIService::new(api_key.to_string(), model, gateway).map_err(|e| e.message)?;
    Ok(Arc::new(service))
}

/// Every model the registry may offer, in preference order
pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            id: "claude-4.5-haiku",
            provider: Provider::Anthropic,
            description: "Claude Haiku 4.5 (fast, efficient)",
            factory: |key, gw| anthropic(AnthropicModel::Claude45Haiku, key, gw),
        },
        ModelDef {
            id: "claude-4.5-sonnet",
            provider: Provider::Anthropic,
            description: "Claude Sonnet 4.5 (balanced performance)",
            factory: |key, gw| anthropic(AnthropicModel::Claude45Sonnet, key, gw),
        },
        ModelDef {
            id: "gpt-4o-mini",
            provider: Provider::OpenAI,
            description: "GPT-4o mini (fast, inexpensive)",
            factory: |key, gw| openai(OpenAIModel::GPT4oMini, key, gw),
        },
        ModelDef {
            id: "gpt-4o",
            provider: Provider::OpenAI,
            description: "GPT-4o",
            factory: |key, gw| openai(OpenAIModel::GPT4o, key, gw),
        },
    ]
}
