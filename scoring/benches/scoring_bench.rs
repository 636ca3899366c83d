use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use qol_scoring::{score_location, LocationSource, ScoreReport, StaticLocations};

fn bench_score_location(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_location");
    let mohali = StaticLocations::mohali().locations();

    for count in [1usize, 10, 100] {
        let locations: Vec<_> = mohali.iter().cycle().take(count).cloned().collect();
        group.bench_with_input(BenchmarkId::new("overall", count), &count, |b, _| {
            b.iter(|| {
                for loc in &locations {
                    black_box(score_location(black_box(loc)));
                }
            });
        });
    }

    group.finish();
}

fn bench_score_report(c: &mut Criterion) {
    let mohali = StaticLocations::mohali().locations();
    c.bench_function("score_report", |b| {
        b.iter(|| black_box(ScoreReport::for_location(black_box(&mohali[0]))));
    });
}

criterion_group!(benches, bench_score_location, bench_score_report);
criterion_main!(benches);
