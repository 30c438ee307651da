// SPDX-License-Identifier: MIT

//! Entity builder: classified ticks → persistable shapes.
//!
//! Projects each classified tick into the row the store inserts and
//! applies the last null-sentinel cleanup the persistence layer
//! requires. Each row carries its own tag texts; the store handles
//! create-or-reuse across the batch.

use crate::models::{ClassifiedTick, NewTick};

/// Build insert-ready rows for one classified batch.
pub fn build_entities(batch: Vec<ClassifiedTick>) -> Vec<NewTick> {
    batch.into_iter().map(project).collect()
}

fn project(record: ClassifiedTick) -> NewTick {
    let tick = record.tick;
    NewTick {
        user_id: tick.user_id,
        logbook_type: tick.logbook_type.as_str().to_string(),
        route_name: tick.route_name,
        tick_date: tick.tick_date,
        route_grade: tick.route_grade,
        binned_grade: record.binned_grade,
        binned_code: record.binned_code,
        location: clean_text(tick.location),
        length: tick.length,
        pitches: tick.pitches,
        lead_style: clean_text(tick.lead_style),
        discipline: record.discipline.as_str().to_string(),
        send_bool: record.send,
        length_category: record.length_category,
        season_category: record.season_category,
        crux_angle: record.crux_angle,
        crux_energy: record.crux_energy,
        notes: clean_text(tick.notes),
        cur_max_sport: record.cur_max_sport,
        cur_max_trad: record.cur_max_trad,
        cur_max_boulder: record.cur_max_boulder,
        difficulty_category: record.difficulty_category,
        tags: record.tags,
    }
}

/// Textual null sentinels ("NaN", blank) become true nulls.
fn clean_text(value: Option<String>) -> Option<String> {
    let text = value?;
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{CanonicalTick, LogbookType};
    use crate::services::{aggregator, classifier};

    fn classified(notes: Option<&str>) -> ClassifiedTick {
        classifier::classify(CanonicalTick {
            user_id: "u1".to_string(),
            logbook_type: LogbookType::MountainProject,
            route_name: "Moonlight Buttress".to_string(),
            tick_date: NaiveDate::from_ymd_opt(2023, 3, 20).unwrap(),
            route_grade: "5.12d".to_string(),
            location: Some("Zion, Utah".to_string()),
            length: Some(1200.0),
            pitches: Some(9),
            lead_style: Some("redpoint".to_string()),
            notes: notes.map(String::from),
            discipline_hint: Some("trad".to_string()),
        })
    }

    #[test]
    fn test_projection_keeps_classifications() {
        let batch = aggregator::stamp_running_max(vec![classified(Some("Endurance crimping"))]);
        let rows = build_entities(batch);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.discipline, "trad");
        assert!(row.send_bool);
        assert_eq!(row.length_category.as_deref(), Some("multipitch"));
        assert_eq!(row.season_category, "Spring 2023");
        assert_eq!(row.binned_code, Some(21));
        assert_eq!(
            row.tags,
            vec!["crimpy".to_string(), "endurance".to_string()]
        );
    }

    #[test]
    fn test_nan_notes_become_null() {
        let mut record = classified(None);
        record.tick.notes = Some("NaN".to_string());
        let rows = build_entities(vec![record]);
        assert_eq!(rows[0].notes, None);
    }

    #[test]
    fn test_rows_carry_their_own_tags() {
        let batch = vec![
            classified(Some("crimpy crux")),
            classified(Some("so crimpy, then a dyno")),
        ];
        let rows = build_entities(batch);
        assert_eq!(rows[0].tags, vec!["crimpy".to_string()]);
        assert_eq!(
            rows[1].tags,
            vec!["crimpy".to_string(), "dyno".to_string()]
        );
    }
}
