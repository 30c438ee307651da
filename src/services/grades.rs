// SPDX-License-Identifier: MIT

//! Grade tables and conversion service.
//!
//! Two static bidirectional tables (routes, boulders) map grade strings
//! to an ordinal difficulty code and back. Conversion between grade
//! systems resolves through the code as an intermediate representation.
//! Unparseable input is a recoverable data-quality condition, so every
//! lookup returns an `Option` rather than an error.
//!
//! Conversions are pure functions over static tables invoked repeatedly
//! across long tick histories, so results are memoized in a bounded LRU
//! cache keyed by the full (grade, from, to) triple.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;

/// Grade vocabularies the service can translate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeSystem {
    /// Yosemite Decimal System (canonical route vocabulary)
    Yds,
    /// French sport grades
    French,
    /// Hueco V-scale (canonical boulder vocabulary)
    VScale,
    /// Fontainebleau boulder grades
    Font,
}

/// Route grades: (ordinal code, YDS, French).
///
/// The alignment is 8a.nu's published chart (7a+ ↔ 5.12a). Codes are
/// anchored so 5.9 → 9 and letter grades from 5.10a count up from 10.
const ROUTE_GRADES: &[(i64, &str, &str)] = &[
    (0, "5.0", "1"),
    (1, "5.1", "2"),
    (2, "5.2", "2+"),
    (3, "5.3", "3"),
    (4, "5.4", "3+"),
    (5, "5.5", "4a"),
    (6, "5.6", "4b"),
    (7, "5.7", "4c"),
    (8, "5.8", "5a"),
    (9, "5.9", "5b"),
    (10, "5.10a", "5c"),
    (11, "5.10b", "6a"),
    (12, "5.10c", "6a+"),
    (13, "5.10d", "6b"),
    (14, "5.11a", "6b+"),
    (15, "5.11b", "6c"),
    (16, "5.11c", "6c+"),
    (17, "5.11d", "7a"),
    (18, "5.12a", "7a+"),
    (19, "5.12b", "7b"),
    (20, "5.12c", "7b+"),
    (21, "5.12d", "7c"),
    (22, "5.13a", "7c+"),
    (23, "5.13b", "8a"),
    (24, "5.13c", "8a+"),
    (25, "5.13d", "8b"),
    (26, "5.14a", "8b+"),
    (27, "5.14b", "8c"),
    (28, "5.14c", "8c+"),
    (29, "5.14d", "9a"),
    (30, "5.15a", "9a+"),
    (31, "5.15b", "9b"),
    (32, "5.15c", "9b+"),
    (33, "5.15d", "9c"),
];

/// Boulder grades: (ordinal code, V-scale, Font). Codes are offset by
/// 100 so the two discipline families never compare equal.
const BOULDER_GRADES: &[(i64, &str, &str)] = &[
    (100, "VB", "3"),
    (101, "V0", "4"),
    (102, "V1", "5"),
    (103, "V2", "5+"),
    (104, "V3", "6A"),
    (105, "V4", "6B"),
    (106, "V5", "6C"),
    (107, "V6", "7A"),
    (108, "V7", "7A+"),
    (109, "V8", "7B"),
    (110, "V9", "7C"),
    (111, "V10", "7C+"),
    (112, "V11", "8A"),
    (113, "V12", "8A+"),
    (114, "V13", "8B"),
    (115, "V14", "8B+"),
    (116, "V15", "8C"),
    (117, "V16", "8C+"),
    (118, "V17", "9A"),
];

fn table_column(system: GradeSystem) -> (&'static [(i64, &'static str, &'static str)], bool) {
    // (table, use_second_column)
    match system {
        GradeSystem::Yds => (ROUTE_GRADES, false),
        GradeSystem::French => (ROUTE_GRADES, true),
        GradeSystem::VScale => (BOULDER_GRADES, false),
        GradeSystem::Font => (BOULDER_GRADES, true),
    }
}

/// Exact-match lookup of a grade string in the given system's column.
fn code_for(grade: &str, system: GradeSystem) -> Option<i64> {
    let (table, alt) = table_column(system);
    table
        .iter()
        .find(|(_, primary, secondary)| grade == if alt { *secondary } else { *primary })
        .map(|(code, _, _)| *code)
}

/// Display string for an ordinal code in the given system.
fn display_for(code: i64, system: GradeSystem) -> Option<&'static str> {
    let (table, alt) = table_column(system);
    table
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, primary, secondary)| if alt { *secondary } else { *primary })
}

/// Canonical display grade (YDS or V-scale) for a binned code.
pub fn binned_grade_for(code: i64) -> Option<&'static str> {
    if code >= 100 {
        display_for(code, GradeSystem::VScale)
    } else {
        display_for(code, GradeSystem::Yds)
    }
}

/// Lenient YDS parser used for binning.
///
/// Tolerates protection suffixes ("5.11c PG13", "5.8 R"), the -/+
/// shorthand ("5.10-" → 5.10a, "5.10+" → 5.10d, bare "5.10" → 5.10b)
/// and slash grades ("5.10b/c" → 5.10b). Returns the ordinal code.
pub fn route_code(grade: &str) -> Option<i64> {
    let token = grade.split_whitespace().next()?;
    let rest = token.strip_prefix("5.")?;

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let number: u32 = digits.parse().ok()?;
    let suffix = &rest[digits.len()..];

    if number <= 9 {
        return code_for(&format!("5.{}", number), GradeSystem::Yds);
    }

    let letter = match suffix.chars().next() {
        Some(c @ 'a'..='d') => c,
        Some('-') => 'a',
        Some('+') => 'd',
        None => 'b',
        Some(_) => return None,
    };
    code_for(&format!("5.{}{}", number, letter), GradeSystem::Yds)
}

/// Lenient V-scale parser used for binning.
///
/// Tolerates "v5" casing, "V5+" and range grades ("V4-5" → V4).
/// "V-easy" maps to VB.
pub fn boulder_code(grade: &str) -> Option<i64> {
    let token = grade.split_whitespace().next()?.to_ascii_uppercase();
    if token == "VB" || token.starts_with("V-EASY") {
        return code_for("VB", GradeSystem::VScale);
    }
    let rest = token.strip_prefix('V')?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    code_for(&format!("V{}", digits), GradeSystem::VScale)
}

type CacheKey = (String, GradeSystem, GradeSystem);

/// Grade conversion service with a bounded, evictable result cache.
///
/// The cache is an explicit component (not ambient global state) so it
/// can be injected and its hit/miss behavior asserted in tests. It is
/// read-heavy and safe for concurrent callers.
pub struct GradeService {
    cache: Mutex<LruCache<CacheKey, Option<String>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl GradeService {
    /// Create a service with the given cache capacity.
    pub fn new(cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Convert a grade string between systems, resolving through the
    /// ordinal code. Returns `None` for unparseable input; grade-text
    /// irregularity is a data-quality condition, not a pipeline fault.
    pub fn convert_grade_system(
        &self,
        grade: &str,
        from: GradeSystem,
        to: GradeSystem,
    ) -> Option<String> {
        let key = (grade.to_string(), from, to);
        if let Some(cached) = self.cache.lock().unwrap().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let converted =
            code_for(grade, from).and_then(|code| display_for(code, to).map(String::from));
        self.cache.lock().unwrap().put(key, converted.clone());
        converted
    }

    /// Number of conversions answered from the cache.
    pub fn cache_hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of conversions that had to resolve through the tables.
    pub fn cache_misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
