//! HTTP API for the travel planner

mod handlers;
mod types;


pub use handlers::create_router;

use crate::config::AppConfig;
use crate::runtime::RuntimeManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(runtime: RuntimeManager, config: AppConfig) -> Self {
        Self {
            runtime: Arc::new(runtime),
            config: Arc::new(config),
        }
    }
}
