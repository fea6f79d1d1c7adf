//! Wire types for search results and itineraries
//!
//! These shapes are shared with the presentation layer and serialized
//! field-for-field.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Tiers
// ============================================================================

/// Service level used to bucket flight and hotel options
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Budget,
    Standard,
    Premium,
}

impl Tier {
    /// Canonical display and selection order
    pub const ALL: [Tier; 3] = [Tier::Budget, Tier::Standard, Tier::Premium];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Budget => "budget",
            Tier::Standard => "standard",
            Tier::Premium => "premium",
        }
    }

    /// Label shown to travellers
    pub fn label(self) -> &'static str {
        match self {
            Tier::Budget => "저가형",
            Tier::Standard => "추천",
            Tier::Premium => "프리미엄",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that belongs to exactly one tier and has a comparable price
pub trait Tiered {
    fn tier(&self) -> Tier;
    fn comparable_price(&self) -> u64;
}

/// Verify a search result set: exactly one option per tier, in canonical
/// order, with non-decreasing price.
pub fn check_tier_contract<T: Tiered>(options: &[T]) -> Result<(), String> {
    if options.len() != Tier::ALL.len() {
        return Err(format!(
            "expected {} options, got {}",
            Tier::ALL.len(),
            options.len()
        ));
    }
    for (option, expected) in options.iter().zip(Tier::ALL) {
        if option.tier() != expected {
            return Err(format!(
                "expected {expected} option, found {}",
                option.tier()
            ));
        }
    }
    if options
        .windows(2)
        .any(|pair| pair[0].comparable_price() > pair[1].comparable_price())
    {
        return Err("prices are not ordered by tier".to_string());
    }
    Ok(())
}

/// Pick the option for a tier, falling back to the first option
pub fn select_tier<T: Tiered>(options: &[T], tier: Tier) -> Option<&T> {
    options
        .iter()
        .find(|o| o.tier() == tier)
        .or_else(|| options.first())
}

// ============================================================================
// Flights
// ============================================================================

/// One direction of a round trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightLeg {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub departure_time: String,
    /// `HH:MM`
    pub arrival_time: String,
    /// e.g. `2h 30m`
    pub flight_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOption {
    #[serde(rename = "type")]
    pub tier: Tier,
    /// Round-trip price per person
    pub price: u64,
    pub airline: String,
    pub outbound: FlightLeg,
    pub inbound: FlightLeg,
}

impl Tiered for FlightOption {
    fn tier(&self) -> Tier {
        self.tier
    }

    fn comparable_price(&self) -> u64 {
        self.price
    }
}

// ============================================================================
// Hotels
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOption {
    #[serde(rename = "type")]
    pub tier: Tier,
    pub name: String,
    pub price_per_night: u64,
    pub total_price: u64,
    pub location: String,
    /// 0.0 to 5.0
    pub rating: f32,
    pub amenities: Vec<String>,
    pub distance_from_center: String,
}

impl Tiered for HotelOption {
    fn tier(&self) -> Tier {
        self.tier
    }

    fn comparable_price(&self) -> u64 {
        self.price_per_night
    }
}

// ============================================================================
// Itinerary
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Transport,
    Sightseeing,
    Food,
    Shopping,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// `HH:MM`
    pub time: String,
    pub activity: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Activity {
    pub fn new(time: impl Into<String>, activity: impl Into<String>, kind: ActivityType) -> Self {
        Self {
            time: time.into(),
            activity: activity.into(),
            kind,
            location: None,
            duration: None,
            description: None,
        }
    }

    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn lasting(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Clock time, accepting `9:00` as well as `09:00`
    pub fn clock(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// `YYYY-MM-DD`
    pub date: String,
    pub theme: String,
    pub activities: Vec<Activity>,
}

impl DayPlan {
    /// Order activities by clock time (stable for equal times) and write
    /// every readable time back as `HH:MM`
    pub fn sort_activities(&mut self) {
        self.activities.sort_by_key(Activity::clock);
        for activity in &mut self.activities {
            if let Some(clock) = activity.clock() {
                activity.time = clock.format("%H:%M").to_string();
            }
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.activities
            .windows(2)
            .all(|w| w[0].clock() <= w[1].clock())
    }
}

/// Day plans keyed by `day1`, `day2`, ...
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary(BTreeMap<String, DayPlan>);

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day_key(day: usize) -> String {
        format!("day{day}")
    }

    /// Parse `dayN` into N
    pub fn day_index(key: &str) -> Option<usize> {
        key.strip_prefix("day")?.parse().ok()
    }

    pub fn insert_day(&mut self, day: usize, plan: DayPlan) {
        self.0.insert(Self::day_key(day), plan);
    }

    #[cfg(test)]
    pub fn get(&self, day: usize) -> Option<&DayPlan> {
        self.0.get(&Self::day_key(day))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Days in numeric order (`day2` before `day10`)
    pub fn days(&self) -> Vec<(usize, &DayPlan)> {
        let mut days: Vec<(usize, &DayPlan)> = self
            .0
            .iter()
            .filter_map(|(key, plan)| Self::day_index(key).map(|i| (i, plan)))
            .collect();
        days.sort_by_key(|(i, _)| *i);
        days
    }

    /// Keys are exactly `day1..=dayN`
    pub fn keys_are_dense(&self) -> bool {
        let days = self.days();
        days.len() == self.0.len() && days.iter().enumerate().all(|(i, (day, _))| *day == i + 1)
    }

    /// Order every day's activities by time
    pub fn sort_all(&mut self) {
        for plan in self.0.values_mut() {
            plan.sort_activities();
        }
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.0.values().flat_map(|plan| plan.activities.iter())
    }

    /// Verify the shape of a synthesized itinerary: exactly `days` dense
    /// keys, a theme and at least one activity per day, and readable times
    /// in order.
    pub fn check_shape(&self, days: usize) -> Result<(), String> {
        if self.len() != days || !self.keys_are_dense() {
            return Err(format!(
                "expected day1..day{days}, got {} day entries",
                self.len()
            ));
        }
        for (day, plan) in self.days() {
            if plan.theme.trim().is_empty() {
                return Err(format!("day{day} has no theme"));
            }
            if plan.activities.is_empty() {
                return Err(format!("day{day} has no activities"));
            }
            if let Some(bad) = plan.activities.iter().find(|a| a.clock().is_none()) {
                return Err(format!("day{day} has an unreadable time {:?}", bad.time));
            }
            if !plan.is_sorted() {
                return Err(format!("day{day} activities are not ordered by time"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Budget
// ============================================================================

pub const FOOD_PER_PERSON_DAY: u64 = 50_000;
pub const TRANSPORT_PER_PERSON: u64 = 30_000;
pub const ACTIVITIES_PER_PERSON_DAY: u64 = 20_000;

/// Estimated trip cost for the whole party
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub flights: u64,
    pub accommodation: u64,
    pub food: u64,
    pub transport: u64,
    pub attractions: u64,
    pub total: u64,
}

impl BudgetBreakdown {
    pub fn estimate(
        flight: Option<&FlightOption>,
        hotel: Option<&HotelOption>,
        days: u32,
        num_people: u32,
    ) -> Self {
        let people = u64::from(num_people);
        let days = u64::from(days);
        let flights = flight.map_or(0, |f| f.price * people);
        let accommodation = hotel.map_or(0, |h| h.total_price);
        let food = FOOD_PER_PERSON_DAY * days * people;
        let transport = TRANSPORT_PER_PERSON * people;
        let attractions = ACTIVITIES_PER_PERSON_DAY * days * people;
        Self {
            flights,
            accommodation,
            food,
            transport,
            attractions,
            total: flights + accommodation + food + transport + attractions,
        }
    }
}
