use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use romshelf::catalog::{paginate, Catalog};
use romshelf::types::PageRequest;
use std::fs;
use tempfile::TempDir;

fn create_rom_dir(roms: usize, other: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..roms {
        fs::write(temp_dir.path().join(format!("Game {:05}.gba", i)), b"rom").unwrap();
    }
    for i in 0..other {
        fs::write(temp_dir.path().join(format!("save_{:05}.sav", i)), b"sav").unwrap();
    }
    temp_dir
}

fn benchmark_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_list");
    for size in [100usize, 1_000, 10_000] {
        let dir = create_rom_dir(size, size / 4);
        let catalog = Catalog::new(dir.path(), ".gba");

        group.bench_with_input(BenchmarkId::new("unfiltered", size), &size, |b, _| {
            b.iter(|| black_box(catalog.list(&PageRequest::default())))
        });

        let filtered = PageRequest { query: Some("game 00".to_string()), page: 2, per_page: 24 };
        group.bench_with_input(BenchmarkId::new("filtered", size), &size, |b, _| {
            b.iter(|| black_box(catalog.list(&filtered)))
        });
    }
    group.finish();
}

fn benchmark_paginate(c: &mut Criterion) {
    let items: Vec<String> = (0..50_000).map(|i| format!("{:05}.gba", i)).collect();
    c.bench_function("paginate_last_page", |b| {
        b.iter(|| black_box(paginate(items.clone(), 2_084, 24)))
    });
}

criterion_group!(benches, benchmark_list, benchmark_paginate);
criterion_main!(benches);
