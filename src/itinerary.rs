//! Itinerary synthesis
//!
//! The template planner always produces a valid plan. When a generation
//! provider is configured it is asked first, and its plan is kept only if
//! it has the right shape and reflects every requested travel style.

mod llm;
mod planner;
mod spots;

use crate::extract::style_label;
use crate::llm::LlmService;
use crate::model::{Activity, Itinerary};
use crate::providers::{ItinerarySynthesizer, PlanRequest, ProviderError};
use async_trait::async_trait;
use llm::LlmPlanner;
use std::sync::Arc;

/// Description fragment marking an activity chosen for a style
pub fn style_note(tag: &str) -> String {
    format!("{} 취향 반영 #{tag}", style_label(tag))
}

/// Whether an activity visibly reflects a style tag
pub fn is_style_covered(tag: &str, activity: &Activity) -> bool {
    let hashtag = format!("#{tag}");
    let label = style_label(tag);
    std::iter::once(activity.activity.as_str())
        .chain(activity.description.as_deref())
        .any(|text| text.contains(&hashtag) || (label != tag && text.contains(label)))
}

/// Style tags that no activity in the plan reflects
pub fn uncovered_styles(itinerary: &Itinerary, styles: &[String]) -> Vec<String> {
    styles
        .iter()
        .filter(|tag| !itinerary.activities().any(|a| is_style_covered(tag, a)))
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct ItineraryPlanner {
    generator: Option<LlmPlanner>,
}

impl ItineraryPlanner {
    /// Templates only
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_llm(mut self, llm: Arc<dyn LlmService>) -> Self {
        self.generator = Some(LlmPlanner::new(llm));
        self
    }

    async fn generated(&self, generator: &LlmPlanner, request: &PlanRequest) -> Option<Itinerary> {
        let itinerary = match generator.plan(request).await {
            Ok(itinerary) => itinerary,
            Err(e) => {
                tracing::warn!(error = %e, "LLM itinerary failed, using templates");
                return None;
            }
        };
        if let Err(reason) = itinerary.check_shape(request.days()) {
            tracing::warn!(%reason, "LLM itinerary has the wrong shape, using templates");
            return None;
        }
        let missing = uncovered_styles(&itinerary, &request.travel_style);
        if !missing.is_empty() {
            tracing::warn!(?missing, "LLM itinerary ignores travel styles, using templates");
            return None;
        }
        Some(itinerary)
    }
}

#[async_trait]
impl ItinerarySynthesizer for ItineraryPlanner {
    async fn synthesize(&self, request: &PlanRequest) -> Result<Itinerary, ProviderError> {
        if let Some(generator) = &self.generator {
            if let Some(itinerary) = self.generated(generator, request).await {
                return Ok(itinerary);
            }
        }
        Ok(planner::plan(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, LlmRequest, LlmResponse, Usage};
    use crate::model::ActivityType;
    use chrono::NaiveDate;

    struct CannedLlm(Result<String, LlmError>);

    #[async_trait]
    impl LlmService for CannedLlm {
        async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
            self.0.clone().map(|text| LlmResponse {
                text,
                usage: Usage::default(),
            })
        }

        fn model_id(&self) -> &str {
            "canned"
        }
    }

    fn request(styles: &[&str]) -> PlanRequest {
        PlanRequest {
            destination: "Osaka".to_string(),
            duration: 1,
            budget: 800_000,
            num_people: 2,
            travel_style: styles.iter().map(|s| (*s).to_string()).collect(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            flight: None,
            hotel: None,
        }
    }

    const TWO_DAY_PLAN: &str = r##"{
        "day1": {"date": "2025-06-01", "theme": "도착", "activities": [
            {"time": "18:00", "activity": "도톤보리 먹방", "type": "food", "description": "#food"},
            {"time": "09:00", "activity": "출발", "type": "transport"}
        ]},
        "day2": {"date": "2025-06-02", "theme": "귀국", "activities": [
            {"time": "12:00", "activity": "공항 이동", "type": "transport"}
        ]}
    }"##;

    #[test]
    fn test_style_coverage_accepts_tag_or_label() {
        let tagged = Activity::new("10:00", "시장", ActivityType::Food).described("#food");
        let labelled = Activity::new("10:00", "쇼핑 거리", ActivityType::Shopping);
        let plain = Activity::new("10:00", "산책", ActivityType::Sightseeing);
        assert!(is_style_covered("food", &tagged));
        assert!(is_style_covered("shopping", &labelled));
        assert!(!is_style_covered("nature", &plain));
    }

    #[tokio::test]
    async fn test_valid_generated_plan_is_kept_and_sorted() {
        let planner = ItineraryPlanner::new()
            .with_llm(Arc::new(CannedLlm(Ok(TWO_DAY_PLAN.to_string()))));
        let itinerary = planner.synthesize(&request(&["food"])).await.unwrap();
        let day1 = itinerary.get(1).unwrap();
        assert_eq!(day1.theme, "도착");
        assert_eq!(day1.activities[0].time, "09:00");
    }

    #[tokio::test]
    async fn test_generated_plan_missing_a_style_falls_back() {
        let planner = ItineraryPlanner::new()
            .with_llm(Arc::new(CannedLlm(Ok(TWO_DAY_PLAN.to_string()))));
        let req = request(&["food", "history"]);
        let itinerary = planner.synthesize(&req).await.unwrap();
        assert_ne!(itinerary.get(1).unwrap().theme, "도착");
        assert!(uncovered_styles(&itinerary, &req.travel_style).is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_templates() {
        let planner = ItineraryPlanner::new()
            .with_llm(Arc::new(CannedLlm(Err(LlmError::network("offline")))));
        let req = request(&["nature"]);
        let itinerary = planner.synthesize(&req).await.unwrap();
        assert!(itinerary.check_shape(req.days()).is_ok());
    }

    #[tokio::test]
    async fn test_wrong_day_count_falls_back() {
        let planner = ItineraryPlanner::new().with_llm(Arc::new(CannedLlm(Ok(
            r#"{"day1": {"date": "2025-06-01", "theme": "x", "activities": [
                {"time": "09:00", "activity": "맛집", "type": "food"}]}}"#
                .to_string(),
        ))));
        let itinerary = planner.synthesize(&request(&["food"])).await.unwrap();
        assert_eq!(itinerary.len(), 2);
    }
}
