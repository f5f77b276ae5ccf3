// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the date discovery pipeline: full scan+validate
// over a synthetic page of OCR-like text with dates of every pattern class
// sprinkled between numeric noise.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use datumwerk_dates::analyze;

fn bench_analyze(c: &mut Criterion) {
    // Roughly one page of noisy extraction output.
    let mut text = String::new();
    for i in 0..40 {
        text.push_str("Case file A-");
        text.push_str(&i.to_string());
        text.push_str(" ref 4429 total 1.234,56 due 15/03/2024 issued 2023-11-02 stamp 03152024 serial 0123456789\n");
    }

    c.bench_function("analyze (synthetic page)", |b| {
        b.iter(|| {
            let report = analyze(black_box(&text));
            black_box(report);
        });
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
