use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use placemark::compute::geojson::{decode_geometry, encode_geometry};
use placemark::{Geometry, MapFeature, PlaceIndex, Point, SpatialEntity};

fn ring(center: (f64, f64), radius: f64, vertices: usize) -> Vec<(f64, f64)> {
    (0..vertices)
        .map(|i| {
            let angle = i as f64 / vertices as f64 * std::f64::consts::TAU;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

fn area_entity(key: &str, center: (f64, f64), vertices: usize) -> SpatialEntity {
    let geometry = Geometry::from_rings(&ring(center, 0.001, vertices), vec![]).unwrap();
    SpatialEntity::from_feature(&MapFeature::new(geometry).with_id(key), None).unwrap()
}

fn benchmark_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");

    for vertices in [8, 64, 512] {
        let geometry = Geometry::from_rings(&ring((13.4, 52.5), 0.01, vertices), vec![]).unwrap();
        let payload = encode_geometry(&geometry).unwrap();

        group.bench_with_input(BenchmarkId::new("centroid", vertices), &geometry, |b, g| {
            b.iter(|| black_box(g.centroid()))
        });
        group.bench_with_input(BenchmarkId::new("within_area", vertices), &geometry, |b, g| {
            let probe = Point::new(13.401, 52.501);
            b.iter(|| black_box(g.within_area(black_box(&probe))))
        });
        group.bench_with_input(BenchmarkId::new("decode_payload", vertices), &payload, |b, p| {
            b.iter(|| decode_geometry(black_box(p)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_entity(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity");

    let entity = area_entity("way/1", (13.4, 52.5), 64);
    group.bench_function("cached_geometry", |b| b.iter(|| black_box(entity.geometry())));

    group.bench_function("contains", |b| {
        let probe = Point::new(13.4, 52.5);
        b.iter(|| black_box(entity.contains(black_box(&probe))))
    });

    group.finish();
}

fn benchmark_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("index");

    let index = PlaceIndex::memory();
    for i in 0..10_000 {
        let lon = 13.0 + (i % 100) as f64 * 0.01;
        let lat = 52.0 + (i / 100) as f64 * 0.01;
        if i % 10 == 0 {
            index.insert(area_entity(&format!("way/{}", i), (lon, lat), 16)).unwrap();
        } else {
            index
                .insert(SpatialEntity::from_location_parameters(
                    Some(format!("node/{}", i)),
                    "poi",
                    Point::new(lon, lat),
                    None,
                ))
                .unwrap();
        }
    }

    let center = Point::new(13.5, 52.5);
    group.bench_function("within_radius_1km", |b| {
        b.iter(|| index.within_radius(black_box(&center), 1_000.0, Some(50)).unwrap())
    });
    group.bench_function("nearest_10", |b| {
        b.iter(|| index.nearest(black_box(&center), Some(10)).unwrap())
    });
    group.bench_function("containing", |b| {
        b.iter(|| index.containing(black_box(&center)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, benchmark_geometry, benchmark_entity, benchmark_index);
criterion_main!(benches);
