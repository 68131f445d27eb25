//! Packing throughput benchmarks.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use tilekit_layout::{Board, CellSpan, Metrics, ScrollAxis, Size, TileGroup};

const VIEWPORT: Size = Size::new(600.0, 2000.0);

fn mixed_spans(count: usize) -> Vec<CellSpan> {
    // Deterministic mix of every shape.
    let shapes = [
        CellSpan::Single,
        CellSpan::DoubleHorizontal,
        CellSpan::Single,
        CellSpan::Quad,
        CellSpan::DoubleVertical,
        CellSpan::Single,
        CellSpan::QuadHorizontal,
        CellSpan::custom(3, 2),
    ];
    (0..count).map(|i| shapes[i % shapes.len()]).collect()
}

fn group_with(count: usize, auto_fit: bool) -> TileGroup {
    let mut group = TileGroup::new(ScrollAxis::Vertical).auto_fit_tiles(auto_fit);
    for span in mixed_spans(count) {
        group.push_tile(span);
    }
    group
}

fn bench_reflow(c: &mut Criterion) {
    let metrics = Metrics::default();

    for &count in &[16usize, 64, 256] {
        c.bench_function(&format!("ordered_reflow_{count}"), |b| {
            let group = group_with(count, false);
            b.iter_batched(
                || group.clone(),
                |mut g| g.recalculate_size(&metrics, VIEWPORT),
                BatchSize::SmallInput,
            );
        });

        c.bench_function(&format!("auto_fit_reflow_{count}"), |b| {
            let group = group_with(count, true);
            b.iter_batched(
                || group.clone(),
                |mut g| g.recalculate_size(&metrics, VIEWPORT),
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_board(c: &mut Criterion) {
    c.bench_function("board_layout_8_groups", |b| {
        let mut board = Board::new(ScrollAxis::Vertical);
        for i in 0..8 {
            board.push_group(group_with(24, i % 2 == 0));
        }
        b.iter_batched(
            || board.clone(),
            |mut board| board.layout(VIEWPORT),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_reflow, bench_board);
criterion_main!(benches);
