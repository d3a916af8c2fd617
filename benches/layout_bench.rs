use criterion::{Criterion, criterion_group, criterion_main};
use stage_chart::api::{Chart, ChartOptions, DetachedTooltip};
use stage_chart::core::{Interval, LaneScale, SurfaceBounds, Viewport, layout_intervals};
use stage_chart::interaction::{NoopAffordance, PointerEvent};
use stage_chart::render::NullRenderer;
use std::hint::black_box;

fn night(count: usize) -> Vec<Interval> {
    (0..count)
        .map(|i| Interval::new(1.0 + (i % 7) as f64, (i * 3 + i / 5) % 4))
        .collect()
}

fn bench_layout_intervals_2k(c: &mut Criterion) {
    let intervals = night(2_000);
    let total: f64 = intervals.iter().map(|interval| interval.duration).sum();
    let scale = LaneScale::new(Viewport::new(1600, 400), (0.0, total), 4, 60.0, 20.0, 10.0)
        .expect("valid scale");

    c.bench_function("layout_intervals_2k", |b| {
        b.iter(|| {
            let steps = layout_intervals(black_box(&intervals), black_box(scale), 60.0, 2.0);
            black_box(steps.len());
        })
    });
}

fn bench_set_option_500(c: &mut Criterion) {
    let intervals = night(500);
    let total: f64 = intervals.iter().map(|interval| interval.duration).sum();
    let mut chart = Chart::new(NullRenderer::default(), Box::new(NoopAffordance));
    chart
        .init(&SurfaceBounds::at_origin(1200, 300), Box::new(DetachedTooltip))
        .expect("init");

    c.bench_function("set_option_500", |b| {
        b.iter(|| {
            chart
                .set_option(
                    ChartOptions::new()
                        .with_intervals(intervals.clone())
                        .with_x_domain(0.0, total),
                )
                .expect("set_option");
        })
    });
}

fn bench_pointer_dispatch_500(c: &mut Criterion) {
    let intervals = night(500);
    let total: f64 = intervals.iter().map(|interval| interval.duration).sum();
    let mut chart = Chart::new(NullRenderer::default(), Box::new(NoopAffordance));
    chart
        .init(&SurfaceBounds::at_origin(1200, 300), Box::new(DetachedTooltip))
        .expect("init");
    chart
        .set_option(
            ChartOptions::new()
                .with_intervals(intervals)
                .with_x_domain(0.0, total)
                .with_throttle_ms(0.0),
        )
        .expect("set_option");

    let mut now = 0.0;
    c.bench_function("pointer_dispatch_500", |b| {
        b.iter(|| {
            now += 1.0;
            chart
                .pointer_event(PointerEvent::moved(black_box(640.0), 100.0, now))
                .expect("dispatch");
            chart.run_deferred().expect("deferred");
        })
    });
}

criterion_group!(
    benches,
    bench_layout_intervals_2k,
    bench_set_option_500,
    bench_pointer_dispatch_500
);
criterion_main!(benches);
