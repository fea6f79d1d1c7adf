//! Catalog-backed flight and hotel search
//!
//! Prices come from a static catalog with random jitter, so results vary
//! between calls but always respect the tier ordering.

pub mod catalog;
mod flights;
mod hotels;

use crate::model::{FlightOption, HotelOption};
use crate::providers::{FlightSearch, HotelSearch, ProviderError, SearchQuery};
use async_trait::async_trait;
use rand::Rng;
use std::ops::RangeInclusive;

/// Scale `base` by a random factor given in permille
fn jitter<R: Rng + ?Sized>(base: u64, permille: RangeInclusive<u64>, rng: &mut R) -> u64 {
    base * rng.gen_range(permille) / 1000
}

fn require_destination(query: &SearchQuery) -> Result<(), ProviderError> {
    if query.destination.trim().is_empty() {
        return Err(ProviderError::no_inventory("no destination to search for"));
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogFlights;

#[async_trait]
impl FlightSearch for CatalogFlights {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<FlightOption>, ProviderError> {
        require_destination(query)?;
        let options = flights::build_options(query, &mut rand::thread_rng());
        tracing::debug!(
            destination = %query.destination,
            count = options.len(),
            "Flight catalog search"
        );
        Ok(options)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogHotels;

#[async_trait]
impl HotelSearch for CatalogHotels {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<HotelOption>, ProviderError> {
        require_destination(query)?;
        let options = hotels::build_options(query, &mut rand::thread_rng());
        tracing::debug!(
            destination = %query.destination,
            count = options.len(),
            "Hotel catalog search"
        );
        Ok(options)
    }
}
