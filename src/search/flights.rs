//! Flight option generation from the route catalog

use super::catalog::{self, Route};
use super::jitter;
use crate::model::{FlightLeg, FlightOption, Tier};
use crate::providers::SearchQuery;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

/// One option per tier with fares jittered by up to ±10%
pub fn build_options<R: Rng + ?Sized>(query: &SearchQuery, rng: &mut R) -> Vec<FlightOption> {
    let route = catalog::route(&query.destination);
    let mut floor = 0;

    Tier::ALL
        .into_iter()
        .map(|tier| {
            let base = route.fares[catalog::tier_index(tier)];
            // Jitter never lets a tier undercut the one before it
            let price = jitter(base, 900..=1100, rng).max(floor);
            floor = price;
            build_option(tier, price, &route, query, rng)
        })
        .collect()
}

fn build_option<R: Rng + ?Sized>(
    tier: Tier,
    price: u64,
    route: &Route,
    query: &SearchQuery,
    rng: &mut R,
) -> FlightOption {
    let airline = catalog::airlines(tier).choose(rng).copied().unwrap_or("대한항공");
    let (outbound_window, inbound_window) = catalog::departure_windows(tier);
    let outbound_departure = outbound_window.choose(rng).copied().unwrap_or("10:00");
    let inbound_departure = inbound_window.choose(rng).copied().unwrap_or("12:00");

    FlightOption {
        tier,
        price,
        airline: airline.to_string(),
        outbound: leg(query.departure_date, outbound_departure, route.flight_minutes),
        inbound: leg(query.return_date, inbound_departure, route.flight_minutes),
    }
}

fn leg(date: NaiveDate, departure: &str, minutes: u32) -> FlightLeg {
    FlightLeg {
        date: date.format("%Y-%m-%d").to_string(),
        departure_time: departure.to_string(),
        arrival_time: add_minutes(departure, minutes),
        flight_time: format_flight_time(minutes),
    }
}

/// `HH:MM` plus minutes, wrapping past midnight
pub fn add_minutes(time: &str, minutes: u32) -> String {
    let (hour, minute) = time.split_once(':').unwrap_or(("0", "0"));
    let hour: u32 = hour.parse().unwrap_or(0);
    let minute: u32 = minute.parse().unwrap_or(0);
    let total = hour * 60 + minute + minutes;
    format!("{:02}:{:02}", (total / 60) % 24, total % 60)
}

pub fn format_flight_time(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
