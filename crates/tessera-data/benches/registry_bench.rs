use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tessera_core::asset::{AssetId, AssetKind, RecordKey};
use tessera_data::{AssetLibrary, Dependency, Geometry, References};

fn bench_registries(c: &mut Criterion) {
    let mut library = AssetLibrary::new();
    let handles: Vec<_> = (0..10_000)
        .map(|i| library.add(Geometry::new(format!("g{i}"))))
        .collect();

    let mut group = c.benchmark_group("Session Tables");

    group.bench_function("Register 10k geometries", |b| {
        b.iter(|| {
            let mut session = Dependency::new();
            for handle in &handles {
                black_box(session.register_dependency(*handle));
            }
        });
    });

    // Every handle registered twice: the second pass only hits the lookup.
    group.bench_function("Re-register 10k geometries", |b| {
        let mut session = Dependency::new();
        for handle in &handles {
            session.register_dependency(*handle);
        }
        b.iter(|| {
            for handle in &handles {
                black_box(session.register_dependency(*handle));
            }
        });
    });

    group.bench_function("Declare and bind 10k references", |b| {
        b.iter(|| {
            let mut refs = References::new();
            for (index, handle) in handles.iter().enumerate() {
                let id = AssetId::from_index(index);
                refs.declare(RecordKey::new(AssetKind::Geometry, id)).unwrap();
                refs.register_reference(id, *handle).unwrap();
            }
            black_box(refs.get_geometry_reference(AssetId(9_999)).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_registries);
criterion_main!(benches);
