use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sentiment_chart_wasm::ChartConfig;
use sentiment_chart_wasm::application::SentimentChart;
use sentiment_chart_wasm::domain::sentiment::{RawDataset, RawRecord, RecordNormalizer, SeriesProjector, StockData};
use sentiment_chart_wasm::infrastructure::HeadlessContainer;
use sentiment_chart_wasm::time_utils::format_date;
use std::hint::black_box;
use std::rc::Rc;
use std::time::Duration;

const JAN_2: i64 = 1_704_153_600;
const DAY: i64 = 86_400;

/// Dataset with a realistic mix of gaps: every 7th day lacks prices, every
/// 5th lacks sentiment, keys arrive newest first.
fn generate_dataset(days: usize) -> RawDataset {
    (0..days)
        .rev()
        .map(|i| {
            let base = 100.0 + (i as f64 * 0.05).sin() * 10.0;
            let stock = (i % 7 != 0).then(|| StockData {
                open: Some(base),
                close: Some(base + (i as f64 * 0.3).cos()),
                day_high: Some(base + 2.0),
                day_low: Some(base - 2.0),
            });
            let sentiment = (i % 5 != 0).then(|| (i as f64 * 0.1).sin());
            (format_date(JAN_2 + i as i64 * DAY), RawRecord::new(stock, sentiment))
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    group.measurement_time(Duration::from_secs(5));

    for days in [30, 365, 2_000, 10_000] {
        let dataset = generate_dataset(days);
        let normalizer = RecordNormalizer::default();

        group.bench_with_input(BenchmarkId::new("normalize", days), &dataset, |b, dataset| {
            b.iter(|| normalizer.normalize(black_box(dataset)));
        });

        let points = normalizer.normalize(&dataset);
        group.bench_with_input(BenchmarkId::new("project", days), &points, |b, points| {
            b.iter(|| SeriesProjector::project(black_box(points)));
        });
    }
    group.finish();
}

fn bench_render_headless(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_headless");

    for days in [30, 365, 2_000] {
        let dataset = generate_dataset(days);
        let host = HeadlessContainer::new(1200.0);
        let mut chart = match SentimentChart::new(Rc::new(host.clone()), ChartConfig::default()) {
            Ok(chart) => chart,
            Err(_) => continue,
        };

        group.bench_with_input(BenchmarkId::new("render", days), &dataset, |b, dataset| {
            b.iter(|| chart.render(black_box(dataset)).map(|r| r.kept).unwrap_or(0));
        });

        group.bench_with_input(BenchmarkId::new("pointer_sweep", days), &days, |b, _| {
            b.iter(|| {
                for x in (60..1130).step_by(7) {
                    host.pointer_move(f64::from(x), 150.0);
                }
                host.pointer_leave();
            });
        });
    }
    group.finish();
}

criterion_group!(normalize_benches, bench_normalize, bench_render_headless);
criterion_main!(normalize_benches);
