// SPDX-License-Identifier: MIT

//! Source processors: raw records → canonical ticks.
//!
//! Both sources run through the same base pass (declarative field
//! rename table, null-sentinel normalization, required-field
//! validation with a skip-and-continue policy), then a small
//! source-specific finishing step. A row missing route name, grade or
//! date is dropped with a warning; it never fails the batch.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{CanonicalTick, LogbookType, RawRecord};
use crate::services::grades::{GradeService, GradeSystem};

/// Canonical-slot → source-column rename table for Mountain Project.
const MP_RENAMES: &[(&str, &str)] = &[
    ("route_name", "Route"),
    ("tick_date", "Date"),
    ("route_grade", "Rating"),
    ("notes", "Notes"),
    ("location", "Location"),
    ("pitches", "Pitches"),
    ("length", "Length"),
    ("lead_style", "Lead Style"),
    ("style", "Style"),
    ("discipline_hint", "Route Type"),
];

/// Canonical-slot → source-field rename table for 8a.nu.
const EIGHT_A_RENAMES: &[(&str, &str)] = &[
    ("route_name", "zlaggableName"),
    ("tick_date", "date"),
    ("route_grade", "difficulty"),
    ("notes", "comment"),
    ("crag", "cragName"),
    ("area", "areaName"),
    ("lead_style", "ascentType"),
    ("category", "category"),
    ("traditional", "traditional"),
];

/// Shared normalization base plus the per-source finishing steps.
pub struct Normalizer {
    grades: Arc<GradeService>,
}

impl Normalizer {
    pub fn new(grades: Arc<GradeService>) -> Self {
        Self { grades }
    }

    /// Normalize Mountain Project export rows.
    ///
    /// Grades are already in the canonical vocabulary. Locations arrive
    /// delimiter-separated most-general-first ("Yosemite > El Capitan")
    /// and are recomposed most-specific-first ("El Capitan, Yosemite").
    pub fn normalize_mountain_project(
        &self,
        user_id: &str,
        records: &[RawRecord],
    ) -> Vec<CanonicalTick> {
        self.normalize_rows(records, |slots| {
            let route_name = slot_str(slots, "route_name")?;
            let route_grade = slot_str(slots, "route_grade")?;
            let tick_date =
                NaiveDate::parse_from_str(&slot_str(slots, "tick_date")?, "%Y-%m-%d").ok()?;

            // "Lead Style" is empty for non-lead ticks; fall back to
            // the plain style column (Send/Attempt for boulders, TR...)
            let lead_style = slot_str(slots, "lead_style")
                .or_else(|| slot_str(slots, "style"))
                .map(|s| s.to_lowercase());

            Some(CanonicalTick {
                user_id: user_id.to_string(),
                logbook_type: LogbookType::MountainProject,
                route_name,
                tick_date,
                route_grade,
                location: slot_str(slots, "location").map(|l| recompose_location(&l, " > ")),
                length: slot_f64(slots, "length"),
                pitches: slot_i64(slots, "pitches"),
                lead_style,
                notes: slot_str(slots, "notes"),
                discipline_hint: slot_str(slots, "discipline_hint").map(|h| h.to_lowercase()),
            })
        }, MP_RENAMES)
    }

    /// Normalize 8a.nu ascent objects.
    ///
    /// Grades arrive in the French/Font vocabulary and are converted
    /// through the grade table into the canonical one. A grade the
    /// table cannot resolve keeps its raw text (it will simply never
    /// bin), which beats dropping a real ascent over display trivia.
    pub fn normalize_eight_a(&self, user_id: &str, records: &[RawRecord]) -> Vec<CanonicalTick> {
        self.normalize_rows(records, |slots| {
            let route_name = slot_str(slots, "route_name")?;
            let raw_grade = slot_str(slots, "route_grade")?;
            let date_text = slot_str(slots, "tick_date")?;
            // ISO datetime; the date part is all we keep
            let tick_date =
                NaiveDate::parse_from_str(date_text.get(..10)?, "%Y-%m-%d").ok()?;

            let is_boulder = slot_i64(slots, "category") == Some(1);
            let (from, to) = if is_boulder {
                (GradeSystem::Font, GradeSystem::VScale)
            } else {
                (GradeSystem::French, GradeSystem::Yds)
            };
            let route_grade = match self.grades.convert_grade_system(&raw_grade, from, to) {
                Some(converted) => converted,
                None => {
                    tracing::debug!(grade = %raw_grade, "Grade not convertible, keeping raw text");
                    raw_grade
                }
            };

            let discipline_hint = if is_boulder {
                "boulder"
            } else if slot_bool(slots, "traditional") {
                "trad"
            } else {
                "sport"
            };

            // Crag then area: already most-specific-first
            let location = match (slot_str(slots, "crag"), slot_str(slots, "area")) {
                (Some(crag), Some(area)) => Some(format!("{}, {}", crag, area)),
                (Some(one), None) | (None, Some(one)) => Some(one),
                (None, None) => None,
            };

            Some(CanonicalTick {
                user_id: user_id.to_string(),
                logbook_type: LogbookType::EightA,
                route_name,
                tick_date,
                route_grade,
                location,
                length: None,
                pitches: None,
                lead_style: slot_str(slots, "lead_style").map(|s| canonical_ascent_style(&s)),
                notes: slot_str(slots, "notes"),
                discipline_hint: Some(discipline_hint.to_string()),
            })
        }, EIGHT_A_RENAMES)
    }

    /// Base pass: rename fields, normalize null sentinels, then hand
    /// each row to the source-specific builder. Rows the builder
    /// rejects (missing required fields, unparseable date) are skipped.
    fn normalize_rows<F>(
        &self,
        records: &[RawRecord],
        build: F,
        renames: &[(&str, &str)],
    ) -> Vec<CanonicalTick>
    where
        F: Fn(&RawRecord) -> Option<CanonicalTick>,
    {
        let mut ticks = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for (index, record) in records.iter().enumerate() {
            let slots = remap(record, renames);
            match build(&slots) {
                Some(tick) => ticks.push(tick),
                None => {
                    skipped += 1;
                    tracing::warn!(row = index, "Skipping row with missing required fields");
                }
            }
        }

        if skipped > 0 {
            tracing::info!(kept = ticks.len(), skipped, "Normalized batch with skips");
        }
        ticks
    }
}

/// Apply a rename table, carrying values over under canonical keys.
fn remap(record: &RawRecord, renames: &[(&str, &str)]) -> RawRecord {
    let mut slots = RawRecord::new();
    for (canonical, source_key) in renames {
        if let Some(value) = record.get(*source_key) {
            slots.insert((*canonical).to_string(), value.clone());
        }
    }
    slots
}

/// String slot with null-sentinel normalization: JSON null, empty
/// strings and textual "NaN" all read as absent.
fn slot_str(slots: &RawRecord, key: &str) -> Option<String> {
    match slots.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Numeric slot; `-1` is Mountain Project's missing-length sentinel.
fn slot_f64(slots: &RawRecord, key: &str) -> Option<f64> {
    let value = match slots.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    if value < 0.0 {
        None
    } else {
        Some(value)
    }
}

fn slot_i64(slots: &RawRecord, key: &str) -> Option<i64> {
    let value = match slots.get(key)? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    if value < 0 {
        None
    } else {
        Some(value)
    }
}

fn slot_bool(slots: &RawRecord, key: &str) -> bool {
    matches!(slots.get(key), Some(Value::Bool(true)))
}

/// Split a most-general-first hierarchy and recompose it
/// most-specific-first: "Yosemite > El Capitan" → "El Capitan, Yosemite".
fn recompose_location(raw: &str, delimiter: &str) -> String {
    let mut parts: Vec<&str> = raw
        .split(delimiter)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    parts.reverse();
    parts.join(", ")
}

/// Map 8a.nu ascent-type codes onto the canonical lead-style vocabulary.
fn canonical_ascent_style(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "os" => "onsight".to_string(),
        "f" | "fl" => "flash".to_string(),
        "rp" => "redpoint".to_string(),
        "go" => "attempt".to_string(),
        "tr" => "toprope".to_string(),
        other => other.to_string(),
    }
}
