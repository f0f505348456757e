use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::prelude::*;

use tridiag_ql::{
    compute_tridiag_evd_ql_with_lanes, LaneGroup, Mat, RowPartition, TridiagQlParams,
};

fn random_tridiag(rng: &mut dyn RngCore, n: usize) -> (Vec<f64>, Vec<f64>) {
    let diag = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let offdiag = (0..n)
        .map(|i| if i == 0 { 0.0 } else { rng.gen_range(-1.0..1.0) })
        .collect();
    (diag, offdiag)
}

pub fn tridiag_ql(c: &mut Criterion) {
    let rng = &mut StdRng::seed_from_u64(0);

    for n in [64, 256, 1024] {
        let (diag, offdiag) = random_tridiag(rng, n);

        c.bench_function(&format!("tridiag-ql-values-{n}"), |b| {
            let mut lanes = LaneGroup::serial();
            b.iter_batched(
                || (diag.clone(), offdiag.clone()),
                |(mut d, mut e)| {
                    compute_tridiag_evd_ql_with_lanes(
                        &mut d,
                        &mut e,
                        None,
                        None,
                        &mut lanes,
                        Default::default(),
                    )
                    .unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        let max_width = rayon::current_num_threads();
        for width in [1, 2, 4, 8] {
            if width > max_width {
                continue;
            }
            let mut lanes = LaneGroup::with_width(width).unwrap();

            for partition in [RowPartition::Strided, RowPartition::Blocked] {
                if width == 1 && partition == RowPartition::Blocked {
                    continue;
                }
                let params = TridiagQlParams {
                    partition,
                    ..Default::default()
                };

                c.bench_function(&format!("tridiag-ql-vectors-{n}-w{width}-{partition:?}"), |b| {
                    let mut u = Mat::<f64>::zeros(n, n);
                    b.iter_batched(
                        || (diag.clone(), offdiag.clone()),
                        |(mut d, mut e)| {
                            compute_tridiag_evd_ql_with_lanes(
                                &mut d,
                                &mut e,
                                Some(u.as_mut()),
                                None,
                                &mut lanes,
                                params,
                            )
                            .unwrap();
                        },
                        BatchSize::SmallInput,
                    )
                });
            }
        }
    }
}

criterion_group!(benches, tridiag_ql);
criterion_main!(benches);
