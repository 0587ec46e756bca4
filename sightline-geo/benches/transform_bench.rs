//! Coordinate transform benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_types::{Coord, Geometry, LineString, Polygon};
use sightline_geo::{CoordinateSystem, CrsTransformer, EdgeLimit, GeometryNormalizer};
use std::hint::black_box;

fn bench_point_transform(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let mut group = c.benchmark_group("Point Transform");
    let transformer = CrsTransformer::new().unwrap();

    group.bench_function("wgs84_to_sweref99tm_cold", |b| {
        let mut lon = 11.0;
        b.iter(|| {
            // Step past the cache quantum so every call misses.
            lon += 1e-4;
            if lon > 24.0 {
                lon = 11.0;
            }
            black_box(
                transformer
                    .transform_point(
                        lon,
                        62.0,
                        CoordinateSystem::Wgs84,
                        CoordinateSystem::Sweref99Tm,
                    )
                    .unwrap(),
            )
        });
    });

    group.bench_function("wgs84_to_sweref99tm_cached", |b| {
        b.iter(|| {
            black_box(
                transformer
                    .transform_point(
                        18.0686,
                        59.3293,
                        CoordinateSystem::Wgs84,
                        CoordinateSystem::Sweref99Tm,
                    )
                    .unwrap(),
            )
        });
    });

    group.finish();
}

fn bench_geometry_transform(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let mut group = c.benchmark_group("Geometry Transform");
    let transformer = CrsTransformer::new().unwrap();

    for size in [32, 128, 1024].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let ring: Vec<Coord<f64>> = (0..size)
                .map(|i| {
                    let theta = 2.0 * std::f64::consts::PI * i as f64 / size as f64;
                    Coord {
                        x: 18.0 + theta.cos(),
                        y: 62.0 + theta.sin() * 0.5,
                    }
                })
                .collect();
            let polygon: Geometry<f64> =
                Polygon::new(LineString::new(ring), Vec::new()).into();

            b.iter(|| {
                black_box(
                    transformer
                        .transform(
                            &polygon,
                            CoordinateSystem::Wgs84,
                            CoordinateSystem::Etrs89Laea,
                        )
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_concave_hull(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let mut group = c.benchmark_group("Concave Hull");
    let normalizer = GeometryNormalizer::new();

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let points: Vec<Geometry<f64>> = (0..size)
                .map(|i| {
                    let x = (i % 25) as f64;
                    let y = (i / 25) as f64;
                    Geometry::Point(geo_types::Point::new(x, y))
                })
                .collect();

            b.iter(|| {
                black_box(
                    normalizer
                        .concave_hull(&points, EdgeLimit::LengthRatio(0.3), false)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_point_transform,
    bench_geometry_transform,
    bench_concave_hull
);
criterion_main!(benches);
