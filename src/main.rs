//! Trip Planner - conversational travel planning backend
//!
//! Collects trip requirements over chat, searches flights and hotels, and
//! builds a day-by-day itinerary, all driven by a per-session state machine.

mod api;
mod config;
mod db;
mod destination;
mod extract;
mod itinerary;
mod llm;
mod model;
mod providers;
mod replies;
mod runtime;
mod search;
mod state_machine;

use api::{create_router, AppState};
use config::{AppConfig, DbLocation, Environment};
use db::Database;
use extract::MessageExtractor;
use itinerary::ItineraryPlanner;
use llm::{LlmConfig, ModelRegistry};
use providers::Providers;
use runtime::{DatabaseStorage, RuntimeManager};
use search::{CatalogFlights, CatalogHotels};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("trip_planner={},tower_http=debug", config.log_level).into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Initialize database
    let db = match &config.db {
        DbLocation::InMemory => {
            tracing::info!("Using in-memory database");
            Database::open_in_memory()?
        }
        DbLocation::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            tracing::info!(path = %path.display(), "Opening database");
            Database::open(path)?
        }
    };

    // Optional LLM backing for extraction and itinerary generation
    let llm_registry = ModelRegistry::new(&LlmConfig::from_env());
    let mut extractor = MessageExtractor::new();
    let mut planner = ItineraryPlanner::new();
    if let Some(llm) = llm_registry.default() {
        tracing::info!(
            models = ?llm_registry.available_models(),
            default = ?llm_registry.default_model_id(),
            "LLM registry initialized"
        );
        extractor = extractor.with_llm(llm.clone());
        planner = planner.with_llm(llm);
    } else {
        tracing::warn!("No LLM API keys configured, using rule-based extraction and planning");
    }

    let providers = Providers {
        extractor: Arc::new(extractor),
        flights: Arc::new(CatalogFlights),
        hotels: Arc::new(CatalogHotels),
        planner: Arc::new(planner),
    };
    let runtime = RuntimeManager::new(
        Arc::new(DatabaseStorage::new(db)),
        providers,
        config.provider_timeout,
    )
    .with_idle_timeout(config.session_idle_timeout);

    // Create router
    let cors = match (&config.frontend_url, config.environment) {
        (Some(origin), _) => CorsLayer::new()
            .allow_origin([origin.parse::<axum::http::HeaderValue>()?])
            .allow_methods(Any)
            .allow_headers(Any),
        (None, Environment::Production) => {
            tracing::warn!("TRIP_PLANNER_FRONTEND_URL unset in production, allowing any origin");
            CorsLayer::permissive()
        }
        (None, _) => CorsLayer::permissive(),
    };

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let addr = config.bind_addr();
    let environment = config.environment;
    let app = create_router(AppState::new(runtime, config))
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!(%addr, %environment, "Trip planner listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
