//! Travel session state types

use crate::model::{
    select_tier, BudgetBreakdown, FlightOption, HotelOption, Itinerary, Tier,
};
use crate::providers::{PlanRequest, SearchQuery};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days between session creation and the assumed departure
pub const DEPARTURE_LEAD_DAYS: u64 = 30;

pub const DURATION_RANGE: std::ops::RangeInclusive<u32> = 1..=14;
pub const BUDGET_RANGE: std::ops::RangeInclusive<u64> = 100_000..=10_000_000;
pub const PARTY_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

// ============================================================================
// Steps
// ============================================================================

/// Phase of the planning flow. Declaration order is progression order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TravelStep {
    #[default]
    Collecting,
    SearchingFlights,
    SearchingHotels,
    Planning,
    Done,
}

impl TravelStep {
    pub const ALL: [TravelStep; 5] = [
        TravelStep::Collecting,
        TravelStep::SearchingFlights,
        TravelStep::SearchingHotels,
        TravelStep::Planning,
        TravelStep::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelStep::Collecting => "collecting",
            TravelStep::SearchingFlights => "searching_flights",
            TravelStep::SearchingHotels => "searching_hotels",
            TravelStep::Planning => "planning",
            TravelStep::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TravelStep::Collecting => "정보 수집 중",
            TravelStep::SearchingFlights => "항공권 검색 중",
            TravelStep::SearchingHotels => "숙박 검색 중",
            TravelStep::Planning => "일정 생성 중",
            TravelStep::Done => "완료",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == TravelStep::Done
    }
}

impl fmt::Display for TravelStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp,
        }
    }
}

// ============================================================================
// Requirements
// ============================================================================

/// Requirement fields in elicitation priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementField {
    Destination,
    Duration,
    Budget,
    NumPeople,
    TravelStyle,
}

impl RequirementField {
    pub const ALL: [RequirementField; 5] = [
        RequirementField::Destination,
        RequirementField::Duration,
        RequirementField::Budget,
        RequirementField::NumPeople,
        RequirementField::TravelStyle,
    ];
}

/// A value that was recognised but lies outside the accepted range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeIssue {
    Duration(u32),
    Budget(u64),
    NumPeople(u32),
}

/// Partial update of requirement fields. `None` means "not mentioned".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_people: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_style: Option<Vec<String>>,
}

impl RequirementUpdate {
    pub fn is_empty(&self) -> bool {
        self.destination.is_none()
            && self.duration.is_none()
            && self.budget.is_none()
            && self.num_people.is_none()
            && self.travel_style.is_none()
    }

    /// Split into the in-range part and the rejected values.
    /// Blank strings and empty style lists count as "not mentioned".
    pub fn validated(self) -> (RequirementUpdate, Vec<RangeIssue>) {
        let mut issues = Vec::new();

        let duration = match self.duration {
            Some(d) if DURATION_RANGE.contains(&d) => Some(d),
            Some(d) => {
                issues.push(RangeIssue::Duration(d));
                None
            }
            None => None,
        };
        let budget = match self.budget {
            Some(b) if BUDGET_RANGE.contains(&b) => Some(b),
            Some(b) => {
                issues.push(RangeIssue::Budget(b));
                None
            }
            None => None,
        };
        let num_people = match self.num_people {
            Some(n) if PARTY_RANGE.contains(&n) => Some(n),
            Some(n) => {
                issues.push(RangeIssue::NumPeople(n));
                None
            }
            None => None,
        };
        let destination = self
            .destination
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let travel_style = self.travel_style.map(dedup_styles).filter(|s| !s.is_empty());

        (
            RequirementUpdate {
                destination,
                duration,
                budget,
                num_people,
                travel_style,
            },
            issues,
        )
    }
}

fn dedup_styles(styles: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(styles.len());
    for style in styles {
        let style = style.trim().to_string();
        if !style.is_empty() && !out.contains(&style) {
            out.push(style);
        }
    }
    out
}

// ============================================================================
// Travel State
// ============================================================================

/// Everything known about one planning session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelState {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub destination: String,
    /// Nights; 0 means unknown
    #[serde(default)]
    pub duration: u32,
    /// Per person; 0 means unknown
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub num_people: u32,
    #[serde(default)]
    pub travel_style: Vec<String>,

    #[serde(default)]
    pub info_collected: bool,
    #[serde(default)]
    pub current_step: TravelStep,

    #[serde(default)]
    pub flight_options: Vec<FlightOption>,
    #[serde(default)]
    pub hotel_options: Vec<HotelOption>,
    #[serde(default)]
    pub itinerary: Itinerary,

    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TravelState {
    pub fn new(session_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            created_at: now,
            updated_at: now,
            destination: String::new(),
            duration: 0,
            budget: 0,
            num_people: 0,
            travel_style: Vec::new(),
            info_collected: false,
            current_step: TravelStep::Collecting,
            flight_options: Vec::new(),
            hotel_options: Vec::new(),
            itinerary: Itinerary::new(),
            messages: Vec::new(),
            error: None,
        }
    }

    pub fn has_field(&self, field: RequirementField) -> bool {
        match field {
            RequirementField::Destination => !self.destination.is_empty(),
            RequirementField::Duration => self.duration > 0,
            RequirementField::Budget => self.budget > 0,
            RequirementField::NumPeople => self.num_people > 0,
            RequirementField::TravelStyle => !self.travel_style.is_empty(),
        }
    }

    /// Missing fields in elicitation priority order
    pub fn missing_fields(&self) -> Vec<RequirementField> {
        RequirementField::ALL
            .into_iter()
            .filter(|f| !self.has_field(*f))
            .collect()
    }

    pub fn requirements_complete(&self) -> bool {
        RequirementField::ALL.iter().all(|f| self.has_field(*f))
    }

    /// Apply a partial update field by field; newer values win.
    /// `info_collected` is recomputed afterwards.
    pub fn apply(&mut self, update: &RequirementUpdate) {
        if let Some(destination) = &update.destination {
            self.destination.clone_from(destination);
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
        if let Some(budget) = update.budget {
            self.budget = budget;
        }
        if let Some(num_people) = update.num_people {
            self.num_people = num_people;
        }
        if let Some(styles) = &update.travel_style {
            self.travel_style.clone_from(styles);
        }
        self.info_collected = self.requirements_complete();
    }

    /// Number of itinerary days: N nights means N+1 days
    pub fn trip_days(&self) -> u32 {
        self.duration + 1
    }

    pub fn departure_date(&self) -> NaiveDate {
        let created = self.created_at.date_naive();
        created
            .checked_add_days(Days::new(DEPARTURE_LEAD_DAYS))
            .unwrap_or(created)
    }

    pub fn return_date(&self) -> NaiveDate {
        let departure = self.departure_date();
        departure
            .checked_add_days(Days::new(u64::from(self.duration)))
            .unwrap_or(departure)
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            destination: self.destination.clone(),
            duration: self.duration,
            budget: self.budget,
            num_people: self.num_people,
            departure_date: self.departure_date(),
            return_date: self.return_date(),
        }
    }

    /// Synthesis input; options default to the standard tier
    pub fn plan_request(&self) -> PlanRequest {
        PlanRequest {
            destination: self.destination.clone(),
            duration: self.duration,
            budget: self.budget,
            num_people: self.num_people,
            travel_style: self.travel_style.clone(),
            start_date: self.departure_date(),
            flight: select_tier(&self.flight_options, Tier::Standard).cloned(),
            hotel: select_tier(&self.hotel_options, Tier::Standard).cloned(),
        }
    }

    /// Cost estimate using the standard tier options
    pub fn budget_breakdown(&self) -> BudgetBreakdown {
        BudgetBreakdown::estimate(
            select_tier(&self.flight_options, Tier::Standard),
            select_tier(&self.hotel_options, Tier::Standard),
            self.trip_days(),
            self.num_people,
        )
    }

    pub fn progress(&self) -> Progress {
        let total = RequirementField::ALL.len();
        let current = if self.current_step.is_terminal() {
            total
        } else {
            RequirementField::ALL
                .iter()
                .filter(|f| self.has_field(**f))
                .count()
        };
        Progress {
            current,
            total,
            percentage: current * 100 / total,
            step: self.current_step,
            step_label: self.current_step.label().to_string(),
        }
    }
}

/// Requirement-collection progress shown next to every reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percentage: usize,
    pub step: TravelStep,
    pub step_label: String,
}
