use criterion::{Criterion, criterion_group, criterion_main};
use inkpad_engine::codec::{from_plain_text, to_html, to_plain_text};
use inkpad_engine::editing::DocumentTree;
mod common;

fn bench_codec_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.sample_size(10);

    let content = common::generate_plain_content(200);
    let tree = from_plain_text(&content);
    let snapshot = tree.snapshot().unwrap();

    group.bench_function("from_plain_text", |b| {
        b.iter(|| std::hint::black_box(from_plain_text(std::hint::black_box(&content))));
    });

    group.bench_function("to_plain_text", |b| {
        b.iter(|| std::hint::black_box(to_plain_text(std::hint::black_box(&tree))));
    });

    group.bench_function("to_html", |b| {
        b.iter(|| std::hint::black_box(to_html(std::hint::black_box(&tree))));
    });

    group.bench_function("snapshot_roundtrip", |b| {
        b.iter(|| {
            let restored = DocumentTree::from_snapshot(std::hint::black_box(&snapshot)).unwrap();
            std::hint::black_box(restored);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_codec_operations);
criterion_main!(benches);
