//! Benchmarks for preview rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use textsmith::preview::render;

fn bench_render_simple(c: &mut Criterion) {
    let source = "Hello **world**";
    c.bench_function("render_simple", |b| b.iter(|| render(black_box(source))));
}

fn bench_render_mixed(c: &mut Criterion) {
    let source = "**bold** *italic* __under__ ~~strike~~ `code`\n> quoted\n\
                  ```ansi\n\x1b[31mred\x1b[0m \x1b[44mblue bg\x1b[0m\n```\n"
        .repeat(100);
    c.bench_function("render_mixed", |b| b.iter(|| render(black_box(&source))));
}

criterion_group!(benches, bench_render_simple, bench_render_mixed);
criterion_main!(benches);
