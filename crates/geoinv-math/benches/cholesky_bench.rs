// ─────────────────────────────────────────────────────────────────────
// GeoInv — Cholesky Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use geoinv_math::linalg::{cholesky, cholesky_inverse_diagonal, cholesky_solve};
use ndarray::{Array1, Array2};
use std::hint::black_box;

fn spd_matrix(n: usize) -> Array2<f64> {
    let b = Array2::from_shape_fn((n, n), |(i, j)| ((i * n + j) as f64 * 0.37).sin());
    let mut a = b.t().dot(&b);
    for i in 0..n {
        a[[i, i]] += n as f64;
    }
    a
}

fn bench_cholesky(c: &mut Criterion) {
    let mut group = c.benchmark_group("cholesky");
    group.sample_size(10);

    for n in [125usize, 512usize] {
        let a = spd_matrix(n);
        let rhs = Array1::from_elem(n, 1.0);

        group.bench_function(format!("factor_{n}"), |b| {
            b.iter(|| black_box(cholesky(&a.view()).unwrap()))
        });

        let l = cholesky(&a.view()).unwrap();
        group.bench_function(format!("solve_{n}"), |b| {
            b.iter(|| black_box(cholesky_solve(&l.view(), &rhs.view()).unwrap()))
        });
        group.bench_function(format!("inverse_diagonal_{n}"), |b| {
            b.iter(|| black_box(cholesky_inverse_diagonal(&l.view())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cholesky);
criterion_main!(benches);
