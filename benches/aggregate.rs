use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use metricwatch::expression::NoopAlertSink;
use metricwatch::{parse, Bindings, Collection, EvalContext, GroupKey, SimplePath, Tags, Window};
use std::sync::Arc;

fn create_collection(hosts: usize) -> Collection {
    let timestamp = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let group = SimplePath::from_dotted("web.server").unwrap();
    let requests = SimplePath::from_dotted("requests").unwrap();
    let mut builder = Collection::builder(timestamp);
    for i in 0..hosts {
        let tags = Tags::new([("host", format!("host-{}", i)), ("zone", format!("zone-{}", i % 8))]).unwrap();
        let key = GroupKey::new(group.clone(), tags);
        builder.insert(&key, requests.clone(), (i as i64).into());
    }
    builder.build()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let expressions = [
        ("sum", "sum(web.server requests)"),
        ("avg_by_zone", "avg(web.server requests) by (zone)"),
        ("percentile_without_host", "percentile_agg(90.0, web.server requests) without (host)"),
    ];

    for size in [100, 1000, 10000].iter() {
        let window = Window::new(Arc::new(create_collection(*size)));
        let bindings = Bindings::new();
        let sink = NoopAlertSink;

        for (name, text) in expressions.iter() {
            let expr = parse(text).unwrap();
            group.bench_with_input(BenchmarkId::new(*name, size), size, |b, _| {
                b.iter(|| {
                    let ctx = EvalContext::new(window.view(), &bindings, &sink);
                    black_box(expr.evaluate(&ctx))
                });
            });
        }
    }

    group.finish();
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");

    for size in [100, 1000, 10000].iter() {
        let window = Window::new(Arc::new(create_collection(*size)));
        let bindings = Bindings::new();
        let sink = NoopAlertSink;
        let expr = parse("web.server requests * 2 > web.server requests").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let ctx = EvalContext::new(window.view(), &bindings, &sink);
                black_box(expr.evaluate(&ctx))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_join);
criterion_main!(benches);
