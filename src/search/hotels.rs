//! Hotel option generation from the hotel catalog

use super::catalog;
use super::jitter;
use crate::model::{HotelOption, Tier};
use crate::providers::SearchQuery;
use rand::seq::SliceRandom;
use rand::Rng;

/// Per-night surcharge for each guest beyond two
pub const EXTRA_GUEST_FEE: u64 = 20_000;

/// One option per tier; nightly rate jittered by -5% to +15%
pub fn build_options<R: Rng + ?Sized>(query: &SearchQuery, rng: &mut R) -> Vec<HotelOption> {
    let extra_guests = u64::from(query.num_people.saturating_sub(2));
    let nights = u64::from(query.duration.max(1));
    let mut floor = 0;

    Tier::ALL
        .into_iter()
        .filter_map(|tier| {
            let hotel = catalog::hotels(&query.destination, tier).choose(rng)?;
            let nightly =
                jitter(hotel.base_price, 950..=1150, rng) + EXTRA_GUEST_FEE * extra_guests;
            let price_per_night = nightly.max(floor);
            floor = price_per_night;

            Some(HotelOption {
                tier,
                name: hotel.name.to_string(),
                price_per_night,
                total_price: price_per_night * nights,
                location: hotel.location.to_string(),
                rating: hotel.rating,
                amenities: catalog::amenities(tier)
                    .iter()
                    .map(|a| (*a).to_string())
                    .collect(),
                distance_from_center: catalog::distances(tier)
                    .choose(rng)
                    .copied()
                    .unwrap_or("0.5km")
                    .to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::check_tier_contract;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn query(destination: &str, num_people: u32) -> SearchQuery {
        SearchQuery {
            destination: destination.to_string(),
            duration: 3,
            budget: 1_000_000,
            num_people,
            departure_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(),
        }
    }

    #[test]
    fn test_options_satisfy_tier_contract_for_every_seed() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for destination in ["Osaka", "Bangkok", "Jeju", "Cebu"] {
                let options = build_options(&query(destination, 2), &mut rng);
                assert!(check_tier_contract(&options).is_ok(), "{destination} seed {seed}");
            }
        }
    }

    #[test]
    fn test_total_is_nightly_times_nights() {
        let mut rng = StdRng::seed_from_u64(3);
        for option in build_options(&query("Tokyo", 2), &mut rng) {
            assert_eq!(option.total_price, option.price_per_night * 3);
            assert!(!option.amenities.is_empty());
        }
    }

    #[test]
    fn test_extra_guests_raise_nightly_rate() {
        let solo = build_options(&query("Lisbon", 2), &mut StdRng::seed_from_u64(11));
        let group = build_options(&query("Lisbon", 5), &mut StdRng::seed_from_u64(11));
        for (a, b) in solo.iter().zip(&group) {
            assert_eq!(b.price_per_night - a.price_per_night, 3 * EXTRA_GUEST_FEE);
        }
    }
}
