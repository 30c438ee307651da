// SPDX-License-Identifier: MIT

//! Canonical and classified tick records (the in-pipeline shapes).

use chrono::NaiveDate;

use crate::models::LogbookType;

/// Climbing style category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discipline {
    Sport,
    Trad,
    Boulder,
    /// Top rope
    Tr,
    /// Could not be resolved from the source data
    Unspecified,
}

impl Discipline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Sport => "sport",
            Discipline::Trad => "trad",
            Discipline::Boulder => "boulder",
            Discipline::Tr => "tr",
            Discipline::Unspecified => "unspecified",
        }
    }
}

/// A tick normalized into the canonical schema, independent of source.
///
/// `route_name`, `route_grade` and `tick_date` are guaranteed present;
/// rows missing any of them were dropped during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTick {
    pub user_id: String,
    pub logbook_type: LogbookType,
    pub route_name: String,
    pub tick_date: NaiveDate,
    /// Grade in the canonical vocabulary (YDS for routes, V-scale for
    /// boulders). Foreign-vocabulary sources are converted during
    /// normalization.
    pub route_grade: String,
    /// Most-specific-first location, e.g. "El Capitan, Yosemite"
    pub location: Option<String>,
    /// Route length in feet
    pub length: Option<f64>,
    pub pitches: Option<i64>,
    /// Canonical lead-style vocabulary (onsight, flash, redpoint, ...)
    pub lead_style: Option<String>,
    pub notes: Option<String>,
    /// Source-provided discipline text, if any ("sport", "trad, aid", ...)
    pub discipline_hint: Option<String>,
}

/// A canonical tick plus every derived classification.
#[derive(Debug, Clone)]
pub struct ClassifiedTick {
    pub tick: CanonicalTick,
    pub discipline: Discipline,
    pub send: bool,
    pub length_category: Option<String>,
    pub season_category: String,
    pub crux_angle: Option<String>,
    pub crux_energy: Option<String>,
    /// Ordinal difficulty code within the discipline family
    pub binned_code: Option<i64>,
    /// Canonical display grade for `binned_code`
    pub binned_grade: Option<String>,
    /// Running per-discipline best send codes as they stood *before*
    /// this record's own contribution (stamped by the aggregator)
    pub cur_max_sport: Option<i64>,
    pub cur_max_trad: Option<i64>,
    pub cur_max_boulder: Option<i64>,
    /// Difficulty tier relative to the stamped running max
    pub difficulty_category: Option<String>,
    /// Hold/style tag texts extracted from the notes and crux fields
    pub tags: Vec<String>,
}
