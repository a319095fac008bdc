use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use esim::{
    calculate_counters, calculate_medoid, trim_outliers, CThreshold, NAry, WFactor, WeightScheme,
};
use ndarray::{Array1, Array2, Axis};

fn synthetic_cluster(frames: usize, dims: usize) -> Array2<f64> {
    Array2::from_shape_fn((frames, dims), |(i, j)| ((i * 31 + j * 17) % 100) as f64 / 100.0)
}

fn bench_counters(c: &mut Criterion) {
    let mut group = c.benchmark_group("counters");

    for dims in [128, 1024, 8192].iter() {
        let data = synthetic_cluster(64, *dims);
        let c_total: Array1<f64> = data.sum_axis(Axis(0));
        group.throughput(Throughput::Elements(*dims as u64));
        group.bench_function(format!("columns_{dims}"), |b| {
            b.iter(|| {
                calculate_counters(
                    black_box(c_total.view()),
                    64,
                    CThreshold::Auto,
                    WFactor::Fraction,
                )
                .expect("counters")
            })
        });
    }

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");

    for frames in [50, 200, 800].iter() {
        let data = synthetic_cluster(*frames, 256);
        group.throughput(Throughput::Elements(*frames as u64));
        group.bench_function(format!("medoid_{frames}"), |b| {
            b.iter(|| {
                calculate_medoid(black_box(data.view()), NAry::RR, WeightScheme::NonWeighted)
                    .expect("medoid")
            })
        });
        group.bench_function(format!("trim10_{frames}"), |b| {
            b.iter(|| {
                trim_outliers(
                    black_box(data.view()),
                    Some(0.1),
                    NAry::RR,
                    WeightScheme::NonWeighted,
                )
                .expect("trim")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_counters, bench_selection);
criterion_main!(benches);
