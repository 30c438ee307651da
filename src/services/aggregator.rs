// SPDX-License-Identifier: MIT

//! Running-max aggregation: per-discipline personal-best context.
//!
//! A single stateful pass over one batch, sorted ascending by tick
//! date (the sort is stable, so same-day records keep their arrival
//! order). The accumulator lives on the stack of this fold, never in
//! module state, so concurrent batches cannot share it.
//!
//! Each record is stamped with the running maxima as they stood
//! *before* the record's own contribution; only then may a send
//! advance its discipline's maximum. Reordering, unstable ties or
//! double-counting here would silently corrupt every downstream
//! difficulty label.

use crate::models::{ClassifiedTick, Discipline};

/// Highest binned code among sends observed so far, per discipline.
#[derive(Debug, Default, Clone, Copy)]
struct RunningMax {
    sport: Option<i64>,
    trad: Option<i64>,
    boulder: Option<i64>,
}

impl RunningMax {
    fn for_discipline(&self, discipline: Discipline) -> Option<i64> {
        match discipline {
            Discipline::Sport => self.sport,
            Discipline::Trad => self.trad,
            Discipline::Boulder => self.boulder,
            Discipline::Tr | Discipline::Unspecified => None,
        }
    }

    fn advance(&mut self, discipline: Discipline, code: i64) {
        let slot = match discipline {
            Discipline::Sport => &mut self.sport,
            Discipline::Trad => &mut self.trad,
            Discipline::Boulder => &mut self.boulder,
            Discipline::Tr | Discipline::Unspecified => return,
        };
        *slot = Some(slot.map_or(code, |current| current.max(code)));
    }
}

/// Sort the batch chronologically and stamp every record with its
/// pre-update running-max context and difficulty tier.
pub fn stamp_running_max(mut batch: Vec<ClassifiedTick>) -> Vec<ClassifiedTick> {
    // Stable: ties keep arrival order
    batch.sort_by_key(|t| t.tick.tick_date);

    let mut state = RunningMax::default();
    for record in &mut batch {
        record.cur_max_sport = state.sport;
        record.cur_max_trad = state.trad;
        record.cur_max_boulder = state.boulder;
        record.difficulty_category = difficulty_category(
            record.binned_code,
            state.for_discipline(record.discipline),
            record.discipline,
        );

        if record.send {
            if let Some(code) = record.binned_code {
                state.advance(record.discipline, code);
            }
        }
    }
    batch
}

/// Fixed offset table comparing a record's code to the stamped running
/// max of its discipline, evaluated first-match-wins.
///
/// A send beyond anything sent before (or the first send ever) is the
/// frontier tier; repeating the established max falls through to the
/// base-volume tier along with everything three or more codes down.
fn difficulty_category(
    code: Option<i64>,
    cur_max: Option<i64>,
    discipline: Discipline,
) -> Option<String> {
    if matches!(discipline, Discipline::Tr | Discipline::Unspecified) {
        return None;
    }
    let code = code?;

    let category = match cur_max {
        None => "Project",
        Some(max) => match code - max {
            delta if delta >= 1 => "Project",
            -1 => "Tier 2",
            -2 => "Tier 3",
            _ => "Base Volume",
        },
    };
    Some(category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{CanonicalTick, LogbookType};
    use crate::services::classifier;

    fn tick(date: &str, grade: &str, discipline: &str, style: &str) -> ClassifiedTick {
        classifier::classify(CanonicalTick {
            user_id: "u1".to_string(),
            logbook_type: LogbookType::MountainProject,
            route_name: format!("{} {}", grade, date),
            tick_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            route_grade: grade.to_string(),
            location: None,
            length: None,
            pitches: None,
            lead_style: Some(style.to_string()),
            notes: None,
            discipline_hint: Some(discipline.to_string()),
        })
    }

    #[test]
    fn test_stamp_is_pre_update() {
        // Chronological sport sends at 5.9 then 5.10a
        let batch = vec![
            tick("2023-01-01", "5.9", "sport", "onsight"),
            tick("2023-02-01", "5.10a", "sport", "redpoint"),
        ];
        let stamped = stamp_running_max(batch);

        assert_eq!(stamped[0].cur_max_sport, None);
        assert_eq!(stamped[1].cur_max_sport, Some(9));
        // The 5.10a is above the pre-update max: frontier tier
        assert_eq!(stamped[1].difficulty_category.as_deref(), Some("Project"));
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let batch = vec![
            tick("2023-02-01", "5.10a", "sport", "redpoint"),
            tick("2023-01-01", "5.9", "sport", "onsight"),
        ];
        let stamped = stamp_running_max(batch);

        assert_eq!(stamped[0].tick.route_grade, "5.9");
        assert_eq!(stamped[1].cur_max_sport, Some(9));
    }

    #[test]
    fn test_monotonic_per_discipline() {
        let batch = vec![
            tick("2023-01-01", "5.9", "sport", "onsight"),
            tick("2023-02-01", "5.11a", "sport", "redpoint"),
            tick("2023-03-01", "5.10a", "sport", "redpoint"),
            tick("2023-04-01", "5.8", "sport", "flash"),
            tick("2023-05-01", "5.12a", "sport", "redpoint"),
        ];
        let stamped = stamp_running_max(batch);

        let mut previous = None;
        for record in &stamped {
            assert!(record.cur_max_sport >= previous);
            previous = record.cur_max_sport;
        }
        // Post-batch max: stamped on a hypothetical next record
        assert_eq!(stamped.last().unwrap().cur_max_sport, Some(14));
    }

    #[test]
    fn test_attempts_do_not_advance_max() {
        let batch = vec![
            tick("2023-01-01", "5.9", "sport", "onsight"),
            tick("2023-02-01", "5.13a", "sport", "attempt"),
            tick("2023-03-01", "5.10a", "sport", "redpoint"),
        ];
        let stamped = stamp_running_max(batch);

        // The 5.13a attempt is frontier territory but moves nothing
        assert_eq!(stamped[1].difficulty_category.as_deref(), Some("Project"));
        assert_eq!(stamped[2].cur_max_sport, Some(9));
    }

    #[test]
    fn test_disciplines_tracked_independently() {
        let batch = vec![
            tick("2023-01-01", "5.11a", "sport", "redpoint"),
            tick("2023-02-01", "V5", "boulder", "send"),
            tick("2023-03-01", "5.9", "trad", "onsight"),
        ];
        let stamped = stamp_running_max(batch);

        assert_eq!(stamped[2].cur_max_sport, Some(14));
        assert_eq!(stamped[2].cur_max_boulder, Some(106));
        assert_eq!(stamped[2].cur_max_trad, None);
    }

    #[test]
    fn test_repeat_of_established_max_is_base_volume() {
        // Trad send at a code equal to the standing max
        let batch = vec![
            tick("2023-01-01", "5.9", "trad", "onsight"),
            tick("2023-02-01", "5.9", "trad", "redpoint"),
        ];
        let stamped = stamp_running_max(batch);

        assert_eq!(stamped[1].cur_max_trad, Some(9));
        assert_eq!(
            stamped[1].difficulty_category.as_deref(),
            Some("Base Volume")
        );
    }

    #[test]
    fn test_offset_tiers() {
        let batch = vec![
            tick("2023-01-01", "5.12a", "sport", "redpoint"), // establishes 18
            tick("2023-02-01", "5.11d", "sport", "redpoint"), // -1
            tick("2023-03-01", "5.11c", "sport", "redpoint"), // -2
            tick("2023-04-01", "5.11b", "sport", "redpoint"), // -3
        ];
        let stamped = stamp_running_max(batch);

        assert_eq!(stamped[1].difficulty_category.as_deref(), Some("Tier 2"));
        assert_eq!(stamped[2].difficulty_category.as_deref(), Some("Tier 3"));
        assert_eq!(
            stamped[3].difficulty_category.as_deref(),
            Some("Base Volume")
        );
    }

    #[test]
    fn test_tr_and_unspecified_get_no_category() {
        let batch = vec![
            tick("2023-01-01", "5.9", "tr", "toprope"),
            tick("2023-02-01", "5.9", "mystery", "redpoint"),
        ];
        let stamped = stamp_running_max(batch);

        assert_eq!(stamped[0].difficulty_category, None);
        assert_eq!(stamped[1].difficulty_category, None);
    }

    #[test]
    fn test_same_day_ties_keep_arrival_order() {
        let batch = vec![
            tick("2023-01-01", "5.9", "sport", "onsight"),
            tick("2023-01-01", "5.10a", "sport", "redpoint"),
        ];
        let stamped = stamp_running_max(batch);

        // Arrival order preserved: the 5.9 contributes first
        assert_eq!(stamped[0].tick.route_grade, "5.9");
        assert_eq!(stamped[1].cur_max_sport, Some(9));
    }
}
