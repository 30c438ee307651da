// SPDX-License-Identifier: MIT

//! Tick classification: pure, stateless-per-record derivations.
//!
//! Every rule is a fixed, ordered keyword table evaluated
//! first-match-wins, so new sources or vocabulary are additive. A rule
//! that cannot resolve applies a safe default and logs at debug; it
//! never fails the record.

use chrono::Datelike;

use crate::models::{CanonicalTick, ClassifiedTick, Discipline};
use crate::services::grades;

/// Discipline keywords, checked in order against the source hint and
/// then the free-text notes. "trad" must precede "tr" so top-rope does
/// not shadow it.
const DISCIPLINE_KEYWORDS: &[(&str, Discipline)] = &[
    ("boulder", Discipline::Boulder),
    ("trad", Discipline::Trad),
    ("sport", Discipline::Sport),
    ("toprope", Discipline::Tr),
    ("top rope", Discipline::Tr),
    ("tr", Discipline::Tr),
];

/// Lead-style vocabulary → send. Unknown styles default to false.
const SEND_STYLES: &[(&str, bool)] = &[
    ("onsight", true),
    ("flash", true),
    ("redpoint", true),
    ("pinkpoint", true),
    ("send", true),
    ("attempt", false),
    ("project", false),
    ("fell", false),
    ("hung", false),
];

/// Crux angle vocabulary (first match in the notes wins).
const ANGLE_KEYWORDS: &[(&str, &str)] = &[
    ("overhang", "overhang"),
    ("slab", "slab"),
    ("vertical", "vertical"),
    ("roof", "roof"),
];

/// Crux energy-system vocabulary (independent of angle).
const ENERGY_KEYWORDS: &[(&str, &str)] = &[
    ("power", "power"),
    ("endurance", "endurance"),
    ("techn", "technique"),
    ("techy", "technique"),
];

/// Hold/style tag vocabulary; unlike the crux fields, every match is
/// collected.
const TAG_KEYWORDS: &[(&str, &str)] = &[
    ("crimp", "crimpy"),
    ("sloper", "slopey"),
    ("jug", "juggy"),
    ("pocket", "pockets"),
    ("pinch", "pinchy"),
    ("dyno", "dyno"),
    ("compression", "compression"),
];

/// Length buckets in feet; any multipitch indication overrides them.
const SHORT_MAX_FEET: f64 = 80.0;
const MEDIUM_MAX_FEET: f64 = 160.0;

/// Derive every per-record classification for one canonical tick.
/// Running-max context is stamped later by the aggregator.
pub fn classify(tick: CanonicalTick) -> ClassifiedTick {
    let discipline = discipline(&tick);
    let send = send_bool(tick.lead_style.as_deref());
    let length_category = length_category(tick.length, tick.pitches);
    let season_category = season_category(&tick.tick_date);
    let crux_angle = first_keyword(tick.notes.as_deref(), ANGLE_KEYWORDS);
    let crux_energy = first_keyword(tick.notes.as_deref(), ENERGY_KEYWORDS);
    let binned_code = binned_code(&tick.route_grade, discipline);
    let binned_grade = binned_code
        .and_then(grades::binned_grade_for)
        .map(String::from);

    if binned_code.is_none() {
        tracing::debug!(grade = %tick.route_grade, "Grade did not bin; difficulty context unavailable");
    }

    let mut tags: Vec<String> = Vec::new();
    if let Some(notes) = tick.notes.as_deref() {
        let lowered = notes.to_lowercase();
        for (keyword, tag) in TAG_KEYWORDS {
            if lowered.contains(keyword) && !tags.iter().any(|t| t == tag) {
                tags.push((*tag).to_string());
            }
        }
    }
    for value in [&crux_angle, &crux_energy].into_iter().flatten() {
        if !tags.iter().any(|t| t == value) {
            tags.push(value.clone());
        }
    }

    ClassifiedTick {
        tick,
        discipline,
        send,
        length_category,
        season_category,
        crux_angle,
        crux_energy,
        binned_code,
        binned_grade,
        cur_max_sport: None,
        cur_max_trad: None,
        cur_max_boulder: None,
        difficulty_category: None,
        tags,
    }
}

/// Resolve the discipline: explicit source hint first, then the notes.
/// Unresolvable records default to `Unspecified` (logged, not failed).
fn discipline(tick: &CanonicalTick) -> Discipline {
    if let Some(hint) = tick.discipline_hint.as_deref() {
        if let Some(found) = keyword_discipline(hint) {
            return found;
        }
    }
    if let Some(notes) = tick.notes.as_deref() {
        if let Some(found) = keyword_discipline(notes) {
            return found;
        }
    }
    tracing::debug!(route = %tick.route_name, "Discipline unresolved; defaulting to unspecified");
    Discipline::Unspecified
}

fn keyword_discipline(text: &str) -> Option<Discipline> {
    let lowered = text.to_lowercase();
    DISCIPLINE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, discipline)| *discipline)
}

/// Fixed mapping from lead-style vocabulary to send status. A missing
/// or unknown style is not a send.
pub fn send_bool(lead_style: Option<&str>) -> bool {
    let Some(style) = lead_style else {
        return false;
    };
    let lowered = style.to_lowercase();
    SEND_STYLES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, send)| *send)
        .unwrap_or(false)
}

/// Bucket the physical length; any multi-pitch count forces
/// "multipitch" independent of raw length.
pub fn length_category(length: Option<f64>, pitches: Option<i64>) -> Option<String> {
    if pitches.is_some_and(|p| p > 1) {
        return Some("multipitch".to_string());
    }
    let feet = length?;
    let category = if feet < SHORT_MAX_FEET {
        "short"
    } else if feet <= MEDIUM_MAX_FEET {
        "medium"
    } else {
        "long"
    };
    Some(category.to_string())
}

/// Deterministic month→season mapping, qualified with the year.
pub fn season_category(date: &chrono::NaiveDate) -> String {
    let season = match date.month() {
        12 | 1 | 2 => "Winter",
        3..=5 => "Spring",
        6..=8 => "Summer",
        _ => "Fall",
    };
    format!("{} {}", season, date.year())
}

/// First-match-wins keyword extraction from free-text notes.
fn first_keyword(notes: Option<&str>, table: &[(&str, &str)]) -> Option<String> {
    let lowered = notes?.to_lowercase();
    table
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, value)| (*value).to_string())
}

/// Ordinal difficulty code for the grade, in the family the discipline
/// selects. Unspecified records try both families.
fn binned_code(grade: &str, discipline: Discipline) -> Option<i64> {
    match discipline {
        Discipline::Boulder => grades::boulder_code(grade),
        Discipline::Sport | Discipline::Trad | Discipline::Tr => grades::route_code(grade),
        Discipline::Unspecified => grades::route_code(grade).or_else(|| grades::boulder_code(grade)),
    }
}
