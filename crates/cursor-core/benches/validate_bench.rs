//! Criterion benchmarks for the coordinate validator.
//!
//! `validate` runs on every `MoveTo` request before any work is queued for the
//! UI context, so it must stay far below the cost of a single UI frame.
//!
//! Run with:
//! ```bash
//! cargo bench --package cursor-core --bench validate_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cursor_core::{validate, DisplayBounds, OverlayState, Point};

fn bench_validate(c: &mut Criterion) {
    let bounds = DisplayBounds::new(393.0, 852.0);
    let mut group = c.benchmark_group("validate");

    let cases = [
        ("inside", 196.5, 426.0),
        ("corner", 393.0, 852.0),
        ("outside", 500.0, 426.0),
        ("nan", f64::NAN, 1.0),
    ];

    for (name, x, y) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(x, y), |b, &(x, y)| {
            b.iter(|| validate(black_box(x), black_box(y), black_box(bounds)))
        });
    }

    group.finish();
}

fn bench_state_transitions(c: &mut Criterion) {
    c.bench_function("overlay_state_move_chain_100", |b| {
        b.iter(|| {
            let mut state = OverlayState::default().shown_at(Point::ORIGIN);
            for i in 0..100 {
                state = state.moved_to(Point::new(black_box(i as f64), 1.0));
            }
            state
        })
    });
}

criterion_group!(benches, bench_validate, bench_state_transitions);
criterion_main!(benches);
