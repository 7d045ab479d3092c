//! Measures `EventBus::emit`/`check` throughput under concurrent
//! producers, the same benchmark_group-over-a-dimension shape the
//! teacher's own `sync_contention_bench.rs` used for its `SyncMode`
//! sweep -- here the dimension is producer thread count instead of
//! synchronization strategy, since this crate has one `EventBus`
//! design rather than several interchangeable ones.

use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use mine_truck_controller::model::{Event, EventKind};
use mine_truck_controller::sync::EventBus;

fn emit_contention_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_bus_emit_contention");

    for producers in [1usize, 2, 4, 8] {
        group.bench_function(BenchmarkId::new("producers", producers), |b| {
            b.iter(|| {
                let bus = Arc::new(EventBus::new());
                thread::scope(|scope| {
                    for _ in 0..producers {
                        let bus = Arc::clone(&bus);
                        scope.spawn(move || {
                            for _ in 0..100 {
                                bus.emit(Event::empty(EventKind::ModeChanged, 0.0));
                            }
                        });
                    }
                });
                while bus.check(EventKind::ModeChanged).is_some() {}
            });
        });
    }
    group.finish();
}

criterion_group!(benches, emit_contention_bench);
criterion_main!(benches);
