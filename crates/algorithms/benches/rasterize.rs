//! Benchmarks for rasterization and interpolation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geosplat_algorithms::interpolation::{interpolate, InterpolateParams, InterpolationMethod};
use geosplat_algorithms::rasterize::{rasterize, MarkerStyle, RasterizeParams};
use geosplat_core::vector::{Sample, SampleSet};

fn create_samples(n: usize) -> SampleSet {
    // Spread points over one square degree with a varied value pattern
    let samples = (0..n)
        .map(|i| {
            let lon = 10.0 + ((i * 7919) % 1000) as f64 / 1000.0;
            let lat = 54.0 + ((i * 104_729) % 997) as f64 / 997.0;
            let value = ((i * 13) % 100) as f64 + lat - 54.0;
            Sample::new(lat, lon, value)
        })
        .collect();
    SampleSet::from_samples(samples).expect("non-empty sample set")
}

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterize");
    let samples = create_samples(2000);

    for resolution in [100u32, 500, 1000].iter() {
        let params = RasterizeParams {
            resolution: *resolution,
            marker: MarkerStyle::circle_for_resolution(*resolution, Some(255)),
            margin: true,
        };
        group.bench_with_input(BenchmarkId::from_parameter(resolution), resolution, |b, _| {
            b.iter(|| rasterize(black_box(&samples), &params).unwrap())
        });
    }

    group.finish();
}

fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolate");
    group.sample_size(10);

    for n in [100usize, 500, 2000].iter() {
        let samples = create_samples(*n);
        for method in [InterpolationMethod::Linear, InterpolationMethod::Nearest] {
            let params = InterpolateParams {
                raster: RasterizeParams {
                    resolution: 300,
                    ..Default::default()
                },
                method,
                fill_value: 0.0,
            };
            let id = BenchmarkId::new(format!("{:?}", method), n);
            group.bench_with_input(id, n, |b, _| {
                b.iter(|| interpolate(black_box(&samples), &params).unwrap())
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_rasterize, bench_interpolate);
criterion_main!(benches);
