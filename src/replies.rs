//! Assistant reply text
//!
//! Every function here is pure: it renders a reply from the state it is
//! given and never changes it.

use crate::destination;
use crate::extract::style_label;
use crate::model::{DayPlan, Tier};
use crate::state_machine::state::{
    RangeIssue, RequirementField, RequirementUpdate, TravelState, TravelStep, BUDGET_RANGE,
    DURATION_RANGE, PARTY_RANGE,
};
use std::fmt::Write as _;

/// `1234567` → `1,234,567원`
pub fn format_won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('원');
    out
}

fn nights_label(nights: u32) -> String {
    format!("{nights}박 {}일", nights + 1)
}

fn styles_label(styles: &[String]) -> String {
    styles
        .iter()
        .map(|s| style_label(s))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn question(field: RequirementField) -> &'static str {
    match field {
        RequirementField::Destination => {
            "어디로 여행을 떠나고 싶으신가요? (예: 오사카, 도쿄, 방콕, 제주)"
        }
        RequirementField::Duration => "여행 기간은 어떻게 되나요? (예: 3박 4일)",
        RequirementField::Budget => "1인당 예산은 어느 정도 생각하고 계신가요? (예: 100만원)",
        RequirementField::NumPeople => "몇 분이 함께 여행하시나요? (예: 2명)",
        RequirementField::TravelStyle => {
            "어떤 스타일의 여행을 원하시나요? (관광, 맛집, 쇼핑, 휴양, 액티비티, 문화, 자연, 역사)"
        }
    }
}

fn range_message(issue: RangeIssue) -> String {
    match issue {
        RangeIssue::Duration(_) => format!(
            "여행 기간은 {}박에서 {}박 사이로 알려주세요.",
            DURATION_RANGE.start(),
            DURATION_RANGE.end()
        ),
        RangeIssue::Budget(_) => format!(
            "1인당 예산은 {}에서 {} 사이로 알려주세요.",
            format_won(*BUDGET_RANGE.start()),
            format_won(*BUDGET_RANGE.end())
        ),
        RangeIssue::NumPeople(_) => format!(
            "인원은 {}명에서 {}명 사이로 알려주세요.",
            PARTY_RANGE.start(),
            PARTY_RANGE.end()
        ),
    }
}

fn captured(update: &RequirementUpdate) -> Vec<String> {
    let mut parts = Vec::new();
    if let Some(d) = &update.destination {
        parts.push(destination::display_name(d).to_string());
    }
    if let Some(nights) = update.duration {
        parts.push(nights_label(nights));
    }
    if let Some(budget) = update.budget {
        parts.push(format!("1인당 {}", format_won(budget)));
    }
    if let Some(n) = update.num_people {
        parts.push(format!("{n}명"));
    }
    if let Some(styles) = &update.travel_style {
        parts.push(format!("{} 스타일", styles_label(styles)));
    }
    parts
}

/// Reply while requirements are still missing
pub fn clarification(
    state: &TravelState,
    accepted: &RequirementUpdate,
    issues: &[RangeIssue],
) -> String {
    let mut reply = String::new();
    let parts = captured(accepted);

    if !parts.is_empty() {
        let _ = write!(reply, "{} - 좋아요! ", parts.join(", "));
    } else if issues.is_empty() {
        if state.missing_fields().len() == RequirementField::ALL.len() {
            reply.push_str("안녕하세요! 여행 계획을 도와드릴게요. ");
        } else {
            reply.push_str("말씀하신 내용에서 여행 정보를 찾지 못했어요. ");
        }
    }
    for issue in issues {
        reply.push_str(&range_message(*issue));
        reply.push(' ');
    }
    if let Some(field) = state.missing_fields().first() {
        reply.push_str(question(*field));
    }
    reply.trim_end().to_string()
}

/// Reply to a blank message
pub fn reprompt(state: &TravelState) -> String {
    match state.missing_fields().first() {
        Some(field) if state.current_step == TravelStep::Collecting => {
            format!("메시지가 비어 있어요. {}", question(*field))
        }
        _ => "메시지가 비어 있어요. 궁금한 점을 입력해 주세요.".to_string(),
    }
}

fn stage_name(step: TravelStep) -> &'static str {
    match step {
        TravelStep::SearchingFlights => "항공권 검색",
        TravelStep::SearchingHotels => "숙소 검색",
        TravelStep::Planning => "일정 생성",
        TravelStep::Collecting | TravelStep::Done => "여행 계획",
    }
}

/// Value stored in `TravelState::error` for a failed step
pub fn failure_note(step: TravelStep, reason: &str) -> String {
    format!("{} 실패: {reason}", stage_name(step))
}

pub fn failure(step: TravelStep, reason: &str) -> String {
    format!(
        "{} 중 문제가 발생했어요 ({reason}). 아무 메시지나 보내주시면 다시 시도할게요.",
        stage_name(step)
    )
}

// ============================================================================
// Plan summary
// ============================================================================

fn header(state: &TravelState) -> String {
    format!(
        "# {} {} 여행 계획\n",
        destination::display_name(&state.destination),
        nights_label(state.duration)
    )
}

fn info_section(state: &TravelState) -> String {
    let mut out = String::from("## 여행 정보\n");
    let _ = writeln!(out, "- 목적지: {}", destination::display_name(&state.destination));
    let _ = writeln!(
        out,
        "- 기간: {} ({} ~ {})",
        nights_label(state.duration),
        state.departure_date(),
        state.return_date()
    );
    let _ = writeln!(out, "- 인원: {}명", state.num_people);
    let _ = writeln!(out, "- 1인당 예산: {}", format_won(state.budget));
    let _ = writeln!(out, "- 여행 스타일: {}", styles_label(&state.travel_style));
    out
}

pub fn flights_section(state: &TravelState) -> String {
    let mut out = String::from("## 항공편\n");
    for f in &state.flight_options {
        let _ = writeln!(
            out,
            "- [{}] {} 1인 왕복 {} (가는 편 {} {}→{}, 오는 편 {} {}→{}, {})",
            f.tier.label(),
            f.airline,
            format_won(f.price),
            f.outbound.date,
            f.outbound.departure_time,
            f.outbound.arrival_time,
            f.inbound.date,
            f.inbound.departure_time,
            f.inbound.arrival_time,
            f.outbound.flight_time,
        );
    }
    out
}

pub fn hotels_section(state: &TravelState) -> String {
    let mut out = String::from("## 숙소\n");
    for h in &state.hotel_options {
        let _ = writeln!(
            out,
            "- [{}] {} ({}, ★{:.1}, 중심가 {}) 1박 {} / 총 {}",
            h.tier.label(),
            h.name,
            h.location,
            h.rating,
            h.distance_from_center,
            format_won(h.price_per_night),
            format_won(h.total_price),
        );
    }
    out
}

fn day_lines(out: &mut String, day: usize, plan: &DayPlan) {
    let _ = writeln!(out, "### Day {day} ({}) - {}", plan.date, plan.theme);
    for a in &plan.activities {
        match &a.location {
            Some(location) if *location != a.activity => {
                let _ = writeln!(out, "- {} {} @ {location}", a.time, a.activity);
            }
            _ => {
                let _ = writeln!(out, "- {} {}", a.time, a.activity);
            }
        }
    }
}

pub fn itinerary_section(state: &TravelState) -> String {
    let mut out = String::from("## 일정\n");
    for (day, plan) in state.itinerary.days() {
        day_lines(&mut out, day, plan);
    }
    out
}

pub fn budget_section(state: &TravelState) -> String {
    let b = state.budget_breakdown();
    let mut out = format!("## 예상 경비 ({} 옵션 기준)\n", Tier::Standard.label());
    out.push_str("| 항목 | 금액 |\n|---|---|\n");
    for (label, amount) in [
        ("항공", b.flights),
        ("숙박", b.accommodation),
        ("식비", b.food),
        ("교통", b.transport),
        ("관광", b.attractions),
        ("합계", b.total),
    ] {
        let _ = writeln!(out, "| {label} | {} |", format_won(amount));
    }

    let available = state.budget * u64::from(state.num_people);
    if available >= b.total {
        let _ = writeln!(
            out,
            "\n총 예산 {} 중 {}이 남아요.",
            format_won(available),
            format_won(available - b.total)
        );
    } else {
        let _ = writeln!(
            out,
            "\n총 예산 {}보다 {} 초과돼요. 저가형 옵션을 고려해 보세요.",
            format_won(available),
            format_won(b.total - available)
        );
    }
    out
}

/// Full markdown plan, used as the final reply and by the summary endpoint
pub fn plan_summary(state: &TravelState) -> String {
    [
        header(state),
        info_section(state),
        flights_section(state),
        hotels_section(state),
        itinerary_section(state),
        budget_section(state),
    ]
    .join("\n")
}

// ============================================================================
// Follow-up questions
// ============================================================================

const FLIGHT_WORDS: &[&str] = &["항공", "비행", "flight"];
const HOTEL_WORDS: &[&str] = &["호텔", "숙소", "숙박", "hotel"];
const ITINERARY_WORDS: &[&str] = &["일정", "코스", "itinerary", "schedule"];
const BUDGET_WORDS: &[&str] = &["예산", "비용", "경비", "얼마", "budget", "cost"];

/// Answer a question about a finished plan from stored results only
pub fn follow_up(state: &TravelState, text: &str) -> String {
    let lowered = text.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

    let mut sections = Vec::new();
    if mentions(FLIGHT_WORDS) {
        sections.push(flights_section(state));
    }
    if mentions(HOTEL_WORDS) {
        sections.push(hotels_section(state));
    }
    if mentions(ITINERARY_WORDS) {
        sections.push(itinerary_section(state));
    }
    if mentions(BUDGET_WORDS) {
        sections.push(budget_section(state));
    }

    if sections.is_empty() {
        return format!(
            "{} {} 여행 계획이 완성되어 있어요. \
             항공편, 숙소, 일정, 예산 중 궁금한 점을 물어보세요.",
            destination::display_name(&state.destination),
            nights_label(state.duration)
        );
    }
    sections.join("\n")
}
