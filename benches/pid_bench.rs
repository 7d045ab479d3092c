//! Measures `PidController::compute` latency in isolation, the same
//! angle the teacher's own `pid_bench.rs` took at its `Controller`
//! wrapper -- here aimed at the hand-rolled PID this crate actually
//! drives `NavigationControl` with.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mine_truck_controller::control::PidController;

fn pid_compute_bench(c: &mut Criterion) {
    c.bench_function("pid_compute_enabled", |b| {
        let mut pid = PidController::new(0.5, 0.1, 0.05, -1.0, 1.0, 1e-9).unwrap();
        pid.enable(0.0);
        b.iter(|| black_box(pid.compute(black_box(1.2), black_box(2.5))));
    });

    c.bench_function("pid_compute_disabled", |b| {
        let mut pid = PidController::new(0.5, 0.1, 0.05, -1.0, 1.0, 1e-9).unwrap();
        b.iter(|| black_box(pid.compute(black_box(1.2), black_box(2.5))));
    });
}

criterion_group!(benches, pid_compute_bench);
criterion_main!(benches);
