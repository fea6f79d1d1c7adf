//! Capability interfaces for the collaborators driven by the planner
//!
//! Requirement extraction, flight search, hotel search and itinerary
//! synthesis are each a trait so the orchestration logic never depends on a
//! particular vendor.

mod error;

pub use error::{ProviderError, ProviderErrorKind};

use crate::model::{FlightOption, HotelOption, Itinerary};
use crate::state_machine::state::{RequirementUpdate, TravelState};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Confirmed requirements handed to the search providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub destination: String,
    pub duration: u32,
    pub budget: u64,
    pub num_people: u32,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// Input to itinerary synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub destination: String,
    pub duration: u32,
    pub budget: u64,
    pub num_people: u32,
    pub travel_style: Vec<String>,
    pub start_date: NaiveDate,
    pub flight: Option<FlightOption>,
    pub hotel: Option<HotelOption>,
}

impl PlanRequest {
    pub fn days(&self) -> usize {
        self.duration as usize + 1
    }
}

/// Turns a raw chat message into requirement updates
#[async_trait]
pub trait RequirementExtractor: Send + Sync {
    /// Returns an empty update when nothing was recognised
    async fn extract(
        &self,
        state: &TravelState,
        text: &str,
    ) -> Result<RequirementUpdate, ProviderError>;
}

/// Returns exactly one option per tier, ordered budget, standard, premium
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<FlightOption>, ProviderError>;
}

/// Returns exactly one option per tier, ordered budget, standard, premium
#[async_trait]
pub trait HotelSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<HotelOption>, ProviderError>;
}

/// Produces a day-by-day plan of `request.days()` days
#[async_trait]
pub trait ItinerarySynthesizer: Send + Sync {
    async fn synthesize(&self, request: &PlanRequest) -> Result<Itinerary, ProviderError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: RequirementExtractor + ?Sized> RequirementExtractor for Arc<T> {
    async fn extract(
        &self,
        state: &TravelState,
        text: &str,
    ) -> Result<RequirementUpdate, ProviderError> {
        (**self).extract(state, text).await
    }
}

#[async_trait]
impl<T: FlightSearch + ?Sized> FlightSearch for Arc<T> {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<FlightOption>, ProviderError> {
        (**self).search(query).await
    }
}

#[async_trait]
impl<T: HotelSearch + ?Sized> HotelSearch for Arc<T> {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<HotelOption>, ProviderError> {
        (**self).search(query).await
    }
}

#[async_trait]
impl<T: ItinerarySynthesizer + ?Sized> ItinerarySynthesizer for Arc<T> {
    async fn synthesize(&self, request: &PlanRequest) -> Result<Itinerary, ProviderError> {
        (**self).synthesize(request).await
    }
}

/// The full set of collaborators used by the runtime
#[derive(Clone)]
pub struct Providers {
    pub extractor: Arc<dyn RequirementExtractor>,
    pub flights: Arc<dyn FlightSearch>,
    pub hotels: Arc<dyn HotelSearch>,
    pub planner: Arc<dyn ItinerarySynthesizer>,
}
