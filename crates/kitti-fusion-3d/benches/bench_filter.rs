use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use kitti_fusion_3d::{
    filter::{OutlierFilterPipeline, RadiusOutlierRemoval, StatisticalOutlierRemoval},
    linalg::{ProjectionMatrix, RigidTransform},
    point::{Point3, SensorFrame},
    pointcloud::ColoredPointCloud,
    projection::CoordinateProjector,
};
use rand::Rng;

fn random_cloud(num_points: usize) -> ColoredPointCloud<SensorFrame> {
    let mut rng = rand::rng();
    let mut cloud = ColoredPointCloud::with_capacity(num_points);
    for _ in 0..num_points {
        let p = Point3::new(
            rng.random_range(0.0..40.0),
            rng.random_range(-20.0..20.0),
            rng.random_range(-2.0..1.0),
        );
        cloud.push(p, [rng.random(), rng.random(), rng.random()]);
    }
    cloud
}

fn bench_outlier_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("outlier_filter");

    for num_points in [1_000, 10_000, 50_000] {
        let cloud = random_cloud(num_points);

        group.bench_with_input(
            BenchmarkId::new("statistical", num_points),
            &cloud,
            |b, cloud| b.iter(|| black_box(StatisticalOutlierRemoval::default().filter(cloud))),
        );

        group.bench_with_input(
            BenchmarkId::new("radius", num_points),
            &cloud,
            |b, cloud| b.iter(|| black_box(RadiusOutlierRemoval::default().filter(cloud))),
        );

        group.bench_with_input(
            BenchmarkId::new("denoise", num_points),
            &cloud,
            |b, cloud| b.iter(|| black_box(OutlierFilterPipeline::default().denoise(cloud))),
        );
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    let projector = CoordinateProjector::new(
        RigidTransform::from_rows_3x4([
            [0.0, -1.0, 0.0, 0.0],
            [0.0, 0.0, -1.0, -0.08],
            [1.0, 0.0, 0.0, -0.27],
        ]),
        ProjectionMatrix::from_rows([
            [721.5377, 0.0, 609.5593, 44.85728],
            [0.0, 721.5377, 172.854, 0.2163791],
            [0.0, 0.0, 1.0, 0.002745884],
        ]),
    );

    for num_points in [10_000, 120_000] {
        let cloud = random_cloud(num_points);
        group.bench_with_input(
            BenchmarkId::new("project", num_points),
            cloud.points(),
            |b, points| b.iter(|| black_box(projector.project(points))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_outlier_filter, bench_projection);
criterion_main!(benches);
