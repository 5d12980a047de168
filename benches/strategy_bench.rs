//! Compare sequential vs parallel strategy search, and time a full weekend.
//!
//! Run with: `cargo bench --bench strategy`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tyrestrat::predictor::{ReferencePaceModel, StaticWeather};
use tyrestrat::{
    plan_race_strategies, plan_weekend, Allocation, DegradationTable, Inventory, StrategyOptions,
    WeekendFormat,
};

fn bench_strategy_search(c: &mut Criterion) {
    let inventory = Inventory::build(&Allocation::default(), &DegradationTable::default());
    let predictor = ReferencePaceModel::with_base(82.0);
    let weather = StaticWeather::default();
    let parallel = StrategyOptions {
        max_stops: 3,
        ..StrategyOptions::default()
    };
    let sequential = StrategyOptions {
        parallel: false,
        ..parallel.clone()
    };

    let mut group = c.benchmark_group("strategy_search");
    group.sample_size(20);

    group.bench_function("sequential", |b| {
        b.iter(|| {
            black_box(plan_race_strategies(
                &inventory,
                black_box(53),
                &predictor,
                &weather,
                &sequential,
            ))
        });
    });

    group.bench_function("parallel", |b| {
        b.iter(|| {
            black_box(plan_race_strategies(
                &inventory,
                black_box(53),
                &predictor,
                &weather,
                &parallel,
            ))
        });
    });

    group.finish();
}

fn bench_full_weekend(c: &mut Criterion) {
    c.bench_function("plan_weekend_sprint", |b| {
        b.iter(|| black_box(plan_weekend("monza", WeekendFormat::Sprint, None)));
    });
}

criterion_group!(benches, bench_strategy_search, bench_full_weekend);
criterion_main!(benches);
