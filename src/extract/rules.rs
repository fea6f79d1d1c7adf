//! Pattern rules for Korean/English trip requests

use crate::destination;
use crate::state_machine::state::{RequirementField, RequirementUpdate, TravelState};
use regex::Regex;
use std::sync::LazyLock;

static NIGHTS: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+)\s*박"));
static DAYS: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+\s*월\s*)?(\d+)\s*일"));
static MAN_WON: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+)\s*만\s*원?"));
static PLAIN_WON: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(\d{1,3}(?:,\d{3})+|\d{4,})\s*(원|년)?"));
static PEOPLE: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+)\s*(명|인)(당)?"));

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern is valid")
}

/// Spelled-out budgets, longest first so `이백만` is not read as `백만`
const BUDGET_WORDS: &[(&str, u64)] = &[
    ("삼백만", 3_000_000),
    ("이백만", 2_000_000),
    ("오십만", 500_000),
    ("백만", 1_000_000),
];

const PARTY_WORDS: &[(&[&str], u32)] = &[
    (&["혼자", "나홀로"], 1),
    (&["둘이", "커플"], 2),
    (&["셋이"], 3),
    (&["넷이", "가족"], 4),
];

/// Canonical style tags with their Korean label
pub const STYLE_TAGS: &[(&str, &str)] = &[
    ("sightseeing", "관광"),
    ("food", "맛집"),
    ("shopping", "쇼핑"),
    ("relaxation", "휴양"),
    ("activity", "액티비티"),
    ("culture", "문화"),
    ("nature", "자연"),
    ("history", "역사"),
];

const STYLE_SYNONYMS: &[(&str, &str)] = &[
    ("먹방", "food"),
    ("음식", "food"),
    ("맛있는", "food"),
    ("구경", "sightseeing"),
    ("명소", "sightseeing"),
    ("휴식", "relaxation"),
    ("쉬", "relaxation"),
];

/// Korean label for a style tag; unknown tags pass through
pub fn style_label(tag: &str) -> &str {
    STYLE_TAGS
        .iter()
        .find(|(t, _)| *t == tag)
        .map_or(tag, |(_, label)| label)
}

/// Map a free-form style word (either language) to its canonical tag
pub fn normalize_style(word: &str) -> String {
    let lowered = word.trim().to_lowercase();
    STYLE_TAGS
        .iter()
        .find(|(tag, label)| *tag == lowered || *label == lowered)
        .map(|(tag, _)| (*tag).to_string())
        .or_else(|| {
            STYLE_SYNONYMS
                .iter()
                .find(|(syn, _)| lowered.contains(syn))
                .map(|(_, tag)| (*tag).to_string())
        })
        .unwrap_or(lowered)
}

/// Extract the requirement fields the text mentions.
///
/// Loose cues (a city name anywhere in the text, `N일`, plain amounts,
/// words like `둘이`) only fill fields that are still missing. Explicit forms
/// (`N박`, `N만원`, `N명`) may also correct a value given earlier.
pub fn extract(state: &TravelState, text: &str) -> RequirementUpdate {
    let missing = |field| !state.has_field(field);
    RequirementUpdate {
        destination: missing(RequirementField::Destination)
            .then(|| destination::find_in(text))
            .flatten()
            .map(|d| d.name.to_string()),
        duration: extract_duration(text, missing(RequirementField::Duration)),
        budget: extract_budget(text, missing(RequirementField::Budget)),
        num_people: extract_num_people(text, missing(RequirementField::NumPeople)),
        travel_style: extract_styles(text),
    }
}

fn capture_number<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text)?.get(1)?.as_str().replace(',', "").parse().ok()
}

/// `N박` wins; a bare `N일` counts N-1 nights (at least one). Calendar
/// dates like `3월 15일` are not durations.
pub fn extract_duration(text: &str, loose: bool) -> Option<u32> {
    if let Some(nights) = capture_number::<u32>(&NIGHTS, text) {
        return Some(nights);
    }
    if !loose {
        return None;
    }
    DAYS.captures_iter(text)
        .filter(|caps| caps.get(1).is_none())
        .find_map(|caps| caps.get(2)?.as_str().parse::<u32>().ok())
        .map(|days| days.saturating_sub(1).max(1))
}

pub fn extract_budget(text: &str, loose: bool) -> Option<u64> {
    if let Some(man) = capture_number::<u64>(&MAN_WON, text) {
        return Some(man.saturating_mul(10_000));
    }
    if !loose {
        return None;
    }
    // Years such as `2025년` are not amounts
    let plain = PLAIN_WON
        .captures_iter(text)
        .filter(|caps| caps.get(2).map(|unit| unit.as_str()) != Some("년"))
        .find_map(|caps| caps.get(1)?.as_str().replace(',', "").parse().ok());
    if plain.is_some() {
        return plain;
    }
    BUDGET_WORDS
        .iter()
        .find(|(word, _)| text.contains(word))
        .map(|(_, value)| *value)
}

pub fn extract_num_people(text: &str, loose: bool) -> Option<u32> {
    // `1인당` is a per-person qualifier, not a party size
    let counted = PEOPLE
        .captures_iter(text)
        .filter(|caps| caps.get(3).is_none())
        .find_map(|caps| caps.get(1)?.as_str().parse().ok());
    if counted.is_some() || !loose {
        return counted;
    }
    PARTY_WORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| text.contains(w)))
        .map(|(_, n)| *n)
}

pub fn extract_styles(text: &str) -> Option<Vec<String>> {
    let lowered = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    let mut push = |tag: &str| {
        if !found.iter().any(|t| t == tag) {
            found.push(tag.to_string());
        }
    };

    for (tag, label) in STYLE_TAGS {
        if text.contains(label) || lowered.contains(tag) {
            push(tag);
        }
    }
    for (synonym, tag) in STYLE_SYNONYMS {
        if text.contains(synonym) {
            push(tag);
        }
    }

    (!found.is_empty()).then_some(found)
}
