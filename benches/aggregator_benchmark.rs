use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cragsync::models::{CanonicalTick, LogbookType};
use cragsync::services::{aggregator, classifier};

/// Build a synthetic multi-year logbook cycling through grades and
/// disciplines, the shape a long-lived account produces.
fn synthetic_logbook(size: usize) -> Vec<CanonicalTick> {
    let grades = ["5.9", "5.10a", "5.10d", "5.11b", "5.12a", "V3", "V5", "V7"];
    let hints = ["sport", "trad", "boulder", "sport"];
    let styles = ["redpoint", "onsight", "attempt", "flash"];
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();

    (0..size)
        .map(|i| CanonicalTick {
            user_id: "bench-user".to_string(),
            logbook_type: LogbookType::MountainProject,
            route_name: format!("Route {}", i),
            tick_date: start + chrono::Days::new((i * 3) as u64),
            route_grade: grades[i % grades.len()].to_string(),
            location: Some("Boulder Canyon, Colorado".to_string()),
            length: Some(75.0),
            pitches: None,
            lead_style: Some(styles[i % styles.len()].to_string()),
            notes: Some("crimpy crux with a powerful finish".to_string()),
            discipline_hint: Some(hints[i % hints.len()].to_string()),
        })
        .collect()
}

fn benchmark_running_max(c: &mut Criterion) {
    let classified: Vec<_> = synthetic_logbook(5_000)
        .into_iter()
        .map(classifier::classify)
        .collect();

    let mut group = c.benchmark_group("aggregator");

    group.bench_function("stamp_running_max_5k", |b| {
        b.iter(|| aggregator::stamp_running_max(black_box(classified.clone())))
    });

    group.bench_function("classify_and_stamp_5k", |b| {
        let logbook = synthetic_logbook(5_000);
        b.iter(|| {
            let classified: Vec<_> = black_box(logbook.clone())
                .into_iter()
                .map(classifier::classify)
                .collect();
            aggregator::stamp_running_max(classified)
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_running_max);
criterion_main!(benches);
