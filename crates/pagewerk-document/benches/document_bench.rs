// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pagewerk-document crate: rebuild throughput
// on synthetic documents with a shuffled order and pending rotations.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use pagewerk_core::types::Rotation;
use pagewerk_core::{PageOrder, RotationLedger, Snapshot};
use pagewerk_document::{CodecOptions, fixtures, merge, rebuild};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Rebuild a document with every page reversed and every other page turned.
fn bench_rebuild(c: &mut Criterion) {
    let options = CodecOptions::default();
    let mut group = c.benchmark_group("rebuild");

    for pages in [10usize, 100] {
        let snapshot = Snapshot::new(fixtures::sample_pdf(pages), pages);
        let order = PageOrder::from_indices((0..pages).rev().collect());
        let mut ledger = RotationLedger::new();
        for original in (0..pages).step_by(2) {
            ledger.rotate(original, Rotation::QUARTER);
        }

        group.bench_with_input(BenchmarkId::from_parameter(pages), &pages, |b, _| {
            b.iter(|| {
                let output = rebuild(black_box(&snapshot), &order, &ledger, &options);
                black_box(output.ok());
            });
        });
    }
    group.finish();
}

/// Merge two 50-page documents.
fn bench_merge(c: &mut Criterion) {
    let options = CodecOptions::default();
    let sources = [fixtures::sample_pdf(50), fixtures::sample_pdf(50)];

    c.bench_function("merge (2 x 50 pages)", |b| {
        b.iter(|| black_box(merge(black_box(sources.as_slice()), &options).ok()));
    });
}

criterion_group!(benches, bench_rebuild, bench_merge);
criterion_main!(benches);
