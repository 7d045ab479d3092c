//! Measures the per-tick cost of `SensorProcessing`'s work: five
//! channel moving averages plus one `CircularBuffer::push`, excluding
//! I/O and scheduling -- the same isolation the teacher's own
//! `processing_bench.rs` doc comment describes for its noise-reduction
//! stage.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mine_truck_controller::filters::MultiChannelFilter;
use mine_truck_controller::model::FilteredSample;
use mine_truck_controller::sync::CircularBuffer;

fn moving_average_bench(c: &mut Criterion) {
    c.bench_function("multichannel_filter_push", |b| {
        let mut filter = MultiChannelFilter::new(5, 5).unwrap();
        b.iter(|| {
            black_box(filter.push(&[1.0, 2.0, 0.3, 4.0, 25.0]));
        });
    });
}

fn circular_buffer_bench(c: &mut Criterion) {
    c.bench_function("circular_buffer_push_full", |b| {
        let buffer = CircularBuffer::new(100).unwrap();
        for i in 0..100 {
            buffer.push(sample(i as f64));
        }
        b.iter(|| {
            buffer.push(black_box(sample(1.0)));
        });
    });

    c.bench_function("circular_buffer_latest", |b| {
        let buffer = CircularBuffer::new(100).unwrap();
        buffer.push(sample(1.0));
        b.iter(|| black_box(buffer.latest()));
    });
}

fn sample(t: f64) -> FilteredSample {
    FilteredSample {
        x: 1.0,
        y: 2.0,
        theta: 0.3,
        v: 4.0,
        temperature_c: 25.0,
        electrical_fault: false,
        hydraulic_fault: false,
        t,
    }
}

criterion_group!(benches, moving_average_bench, circular_buffer_bench);
criterion_main!(benches);
