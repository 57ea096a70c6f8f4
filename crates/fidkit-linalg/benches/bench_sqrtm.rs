use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use fidkit_linalg::{sqrtm, stats, Parallelism};
use fidkit_tensor::Tensor2;

fn random_features(rows: usize, cols: usize, seed: u64) -> Tensor2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows * cols)
        .map(|_| rng.random_range(0.0f32..1.0))
        .collect();
    Tensor2::from_shape_vec([rows, cols], data).unwrap()
}

fn bench_trace_sqrt(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_sqrt_product");

    for dim in [64, 256, 512].iter() {
        let x1 = random_features(2 * dim, *dim, 0);
        let x2 = random_features(2 * dim, *dim, 1);
        let s1 = stats::covariance(&x1, &stats::mean_rows(&x1).unwrap(), Parallelism::None).unwrap();
        let s2 = stats::covariance(&x2, &stats::mean_rows(&x2).unwrap(), Parallelism::None).unwrap();

        for (name, par) in [("serial", Parallelism::None), ("rayon", Parallelism::Rayon(0))] {
            group.bench_with_input(BenchmarkId::new(name, dim), dim, |b, _| {
                b.iter(|| {
                    sqrtm::trace_sqrt_product(black_box(s1.as_ref()), black_box(s2.as_ref()), par)
                        .unwrap()
                })
            });
        }
    }
    group.finish();
}

fn bench_covariance(c: &mut Criterion) {
    let mut group = c.benchmark_group("covariance");

    for (rows, cols) in [(100, 64), (1000, 256)].iter() {
        let x = random_features(*rows, *cols, 2);
        let mean = stats::mean_rows(&x).unwrap();
        let parameter_string = format!("{}x{}", rows, cols);

        group.bench_with_input(
            BenchmarkId::new("rayon", &parameter_string),
            &x,
            |b, x| b.iter(|| stats::covariance(black_box(x), &mean, Parallelism::Rayon(0)).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_trace_sqrt, bench_covariance);
criterion_main!(benches);
