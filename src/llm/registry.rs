//! Model registry for managing available LLM providers

use super::{all_models, LlmService, LoggingService, ModelDef, Provider};
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration for LLM providers
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    /// Gateway URL; when set, every model is routed through it
    pub gateway: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            gateway: non_empty_var("LLM_GATEWAY"),
            default_model: non_empty_var("DEFAULT_MODEL"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Registry of available LLM models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: Option<String>,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        let mut services: HashMap<String, Arc<dyn LlmService>> = HashMap::new();
        let mut first_available = None;

        for model_def in all_models() {
            if let Some(service) = Self::try_create_model(model_def, config) {
                first_available.get_or_insert(model_def.id.to_string());
                services.insert(model_def.id.to_string(), service);
            }
        }

        let default_model = config
            .default_model
            .clone()
            .filter(|id| services.contains_key(id))
            .or(first_available);

        Self {
            services,
            default_model,
        }
    }

    /// Try to create a model service, validating prerequisites
    fn try_create_model(model_def: &ModelDef, config: &LlmConfig) -> Option<Arc<dyn LlmService>> {
        // The gateway handles authentication itself
        let api_key = if config.gateway.is_some() {
            "implicit".to_string()
        } else {
            match model_def.provider {
                Provider::Anthropic => config.anthropic_api_key.as_ref()?,
                Provider::OpenAI => config.openai_api_key.as_ref()?,
            }
            .clone()
        };

        match (model_def.factory)(&api_key, config.gateway.as_deref()) {
            Ok(service) => {
                tracing::debug!(
                    model = model_def.id,
                    provider = model_def.provider.display_name(),
                    description = model_def.description,
                    "Model available"
                );
                Some(Arc::new(LoggingService::new(service)))
            }
            Err(e) => {
                tracing::warn!(model = model_def.id, error = %e, "Model unavailable");
                None
            }
        }
    }

    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// The model used for extraction and itinerary generation
    pub fn default(&self) -> Option<Arc<dyn LlmService>> {
        self.default_model.as_deref().and_then(|id| self.get(id))
    }

    pub fn default_model_id(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// All available model IDs, sorted
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }
}
