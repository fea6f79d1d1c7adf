//! Template-based day planning

use super::spots::{self, pick, Spots};
use super::{is_style_covered, style_note};
use crate::destination;
use crate::extract::style_label;
use crate::model::{Activity, ActivityType, DayPlan, Itinerary};
use crate::providers::PlanRequest;
use chrono::{Days, NaiveDate};

/// Slot used for style activities that no template slot covered
const EXTRA_SLOT: &str = "16:30";

/// Build a plan of `request.days()` days. Deterministic for a given request.
pub fn plan(request: &PlanRequest) -> Itinerary {
    let spots = spots::for_destination(&request.destination);
    let city = destination::display_name(&request.destination);
    let days = request.days();

    let mut plans: Vec<DayPlan> = (1..=days)
        .map(|day| {
            let date = date_for(request.start_date, day);
            if day == 1 {
                arrival_day(request, &spots, city, date)
            } else if day == days {
                departure_day(&spots, city, date)
            } else {
                middle_day(request, &spots, city, date, day)
            }
        })
        .collect();

    cover_remaining_styles(&mut plans, &request.travel_style, &spots);

    let mut itinerary = Itinerary::new();
    for (i, mut plan) in plans.into_iter().enumerate() {
        plan.sort_activities();
        itinerary.insert_day(i + 1, plan);
    }
    itinerary
}

fn date_for(start: NaiveDate, day: usize) -> String {
    let offset = u64::try_from(day.saturating_sub(1)).unwrap_or(0);
    start
        .checked_add_days(Days::new(offset))
        .unwrap_or(start)
        .format("%Y-%m-%d")
        .to_string()
}

fn arrival_day(request: &PlanRequest, spots: &Spots, city: &str, date: String) -> DayPlan {
    let mut departure =
        Activity::new("09:00", "인천공항 출발", ActivityType::Transport).at("인천국제공항");
    if let Some(flight) = &request.flight {
        departure = departure
            .lasting(flight.outbound.flight_time.clone())
            .described(format!(
                "{} {} 출발, {} 도착",
                flight.airline, flight.outbound.departure_time, flight.outbound.arrival_time
            ));
    }

    let hotel = request
        .hotel
        .as_ref()
        .map_or_else(|| "숙소".to_string(), |h| h.name.clone());

    DayPlan {
        date,
        theme: format!("{city} 도착 및 첫인상"),
        activities: vec![
            departure,
            Activity::new("12:00", format!("{city} 도착"), ActivityType::Transport),
            Activity::new("14:00", "호텔 체크인", ActivityType::Rest).at(hotel),
            Activity::new("15:00", pick(spots.sightseeing, 0), ActivityType::Sightseeing)
                .at(pick(spots.sightseeing, 0))
                .lasting("2시간"),
            Activity::new("18:00", "저녁 식사", ActivityType::Food)
                .at(pick(spots.food, 0))
                .lasting("1시간 30분"),
        ],
    }
}

fn middle_day(
    request: &PlanRequest,
    spots: &Spots,
    city: &str,
    date: String,
    day: usize,
) -> DayPlan {
    // Day 2 is the first full day; rotate pools from there
    let n = day - 1;
    let styles = &request.travel_style;
    let focus = (!styles.is_empty()).then(|| styles[(day - 2) % styles.len()].as_str());

    let mut activities = vec![
        Activity::new("08:00", "호텔 조식", ActivityType::Food),
        Activity::new("09:00", pick(spots.sightseeing, n * 2 - 1), ActivityType::Sightseeing)
            .at(pick(spots.sightseeing, n * 2 - 1))
            .lasting("2시간"),
        Activity::new("11:00", pick(spots.sightseeing, n * 2), ActivityType::Sightseeing)
            .at(pick(spots.sightseeing, n * 2))
            .lasting("1시간 30분"),
        Activity::new("12:30", "점심 식사", ActivityType::Food)
            .at(pick(spots.food, n))
            .lasting("1시간"),
        match focus {
            Some(tag) => style_activity(tag, spots, n, "14:00"),
            None => Activity::new("14:00", pick(spots.culture, n), ActivityType::Sightseeing)
                .at(pick(spots.culture, n))
                .lasting("2시간"),
        },
        Activity::new("18:30", "저녁 식사", ActivityType::Food)
            .at(pick(spots.food, n + 1))
            .lasting("1시간 30분"),
    ];

    if styles.iter().any(|s| s == "food") {
        activities.push(
            Activity::new("20:00", "야식 투어", ActivityType::Food)
                .at(pick(spots.food, n + 2))
                .described(style_note("food")),
        );
    } else if styles.iter().any(|s| s == "shopping") {
        activities.push(
            Activity::new("20:00", "야간 쇼핑", ActivityType::Shopping)
                .at(pick(spots.shopping, n + 1))
                .described(style_note("shopping")),
        );
    }

    let theme = match focus {
        Some(tag) => format!("{} 중심의 {city} 여행", style_label(tag)),
        None => format!("{city} 명소 탐방"),
    };

    DayPlan {
        date,
        theme,
        activities,
    }
}

fn departure_day(spots: &Spots, city: &str, date: String) -> DayPlan {
    DayPlan {
        date,
        theme: format!("{city} 마무리 및 귀국"),
        activities: vec![
            Activity::new("08:00", "호텔 조식", ActivityType::Food),
            Activity::new("10:00", "호텔 체크아웃", ActivityType::Rest),
            Activity::new("10:30", "기념품 쇼핑", ActivityType::Shopping)
                .at(pick(spots.shopping, 0))
                .lasting("1시간"),
            Activity::new("12:00", "공항 이동", ActivityType::Transport),
            Activity::new("15:00", "인천공항 도착", ActivityType::Transport).at("인천국제공항"),
        ],
    }
}

/// An activity chosen for a style tag, annotated with that tag
fn style_activity(tag: &str, spots: &Spots, n: usize, time: &str) -> Activity {
    let (name, kind, place) = match tag {
        "sightseeing" => ("명소 관람", ActivityType::Sightseeing, pick(spots.sightseeing, n + 2)),
        "food" => ("맛집 탐방", ActivityType::Food, pick(spots.food, n + 1)),
        "shopping" => ("쇼핑", ActivityType::Shopping, pick(spots.shopping, n)),
        "relaxation" => ("스파 및 휴식", ActivityType::Rest, pick(spots.nature, n)),
        "nature" => ("자연 산책", ActivityType::Sightseeing, pick(spots.nature, n)),
        "culture" => ("문화 체험", ActivityType::Sightseeing, pick(spots.culture, n)),
        "history" => ("역사 탐방", ActivityType::Sightseeing, pick(spots.culture, n + 1)),
        "activity" => ("체험 액티비티", ActivityType::Sightseeing, pick(spots.nature, n + 1)),
        _ => ("테마 체험", ActivityType::Sightseeing, pick(spots.sightseeing, n)),
    };
    Activity::new(time, format!("{place} {name}"), kind)
        .at(place)
        .lasting("2시간")
        .described(style_note(tag))
}

/// Add one activity for each style tag not yet reflected anywhere,
/// spreading them over the full days (or the arrival day for short trips).
fn cover_remaining_styles(plans: &mut [DayPlan], styles: &[String], spots: &Spots) {
    let days = plans.len();
    let targets: Vec<usize> = if days > 2 {
        (1..days - 1).collect()
    } else {
        vec![0]
    };

    let mut placed = 0;
    for tag in styles {
        let covered = plans
            .iter()
            .flat_map(|p| p.activities.iter())
            .any(|a| is_style_covered(tag, a));
        if covered {
            continue;
        }
        let day = targets[placed % targets.len()];
        plans[day]
            .activities
            .push(style_activity(tag, spots, day + placed, EXTRA_SLOT));
        placed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::uncovered_styles;

    fn request(duration: u32, styles: &[&str]) -> PlanRequest {
        PlanRequest {
            destination: "Tokyo".to_string(),
            duration,
            budget: 1_000_000,
            num_people: 1,
            travel_style: styles.iter().map(|s| (*s).to_string()).collect(),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            flight: None,
            hotel: None,
        }
    }

    #[test]
    fn test_day_count_is_nights_plus_one() {
        for nights in 1..=14 {
            let itinerary = plan(&request(nights, &["sightseeing"]));
            let days = nights as usize + 1;
            assert!(itinerary.check_shape(days).is_ok(), "{nights} nights");
        }
    }

    #[test]
    fn test_dates_are_consecutive_from_start() {
        let itinerary = plan(&request(3, &["food"]));
        assert_eq!(itinerary.get(1).unwrap().date, "2025-04-01");
        assert_eq!(itinerary.get(4).unwrap().date, "2025-04-04");
    }

    #[test]
    fn test_every_style_is_reflected_even_on_short_trips() {
        let styles = [
            "sightseeing",
            "food",
            "shopping",
            "relaxation",
            "culture",
            "nature",
            "history",
            "activity",
            "nightlife",
        ];
        for nights in [1, 2, 5] {
            let req = request(nights, &styles);
            let itinerary = plan(&req);
            assert!(uncovered_styles(&itinerary, &req.travel_style).is_empty());
            assert!(itinerary.check_shape(req.days()).is_ok());
        }
    }

    #[test]
    fn test_food_style_adds_evening_food() {
        let itinerary = plan(&request(3, &["food"]));
        let day2 = itinerary.get(2).unwrap();
        assert!(day2
            .activities
            .iter()
            .any(|a| a.time == "20:00" && a.kind == ActivityType::Food));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let req = request(4, &["culture", "shopping"]);
        assert_eq!(plan(&req), plan(&req));
    }
}
