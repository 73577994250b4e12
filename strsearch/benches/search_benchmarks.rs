use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rayon::prelude::*;
use std::{fs::File, io::Write, num::NonZeroUsize, path::PathBuf, sync::Arc};
use strsearch::{
    filters::IgnoreSet,
    search,
    search::{list_files, LineMatcher},
    SearchConfig, WorkerPool,
};
use tempfile::tempdir;

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    lines_per_file: usize,
) -> std::io::Result<()> {
    for i in 0..file_count {
        let file_path = dir.path().join(format!("test_{}.txt", i));
        let mut file = File::create(file_path)?;
        for j in 0..lines_per_file {
            writeln!(
                file,
                "Line {} TODO: fix bug {} FIXME: optimize line {} NOTE: important task {}",
                j, j, j, j
            )?;
        }
    }
    Ok(())
}

fn bench_file_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("File Scaling");
    for file_count in [10, 100, 1000] {
        let dir = tempdir().unwrap();
        create_test_files(&dir, file_count, 50).unwrap();
        let config = SearchConfig::new("TODO", dir.path());

        group.bench_with_input(
            BenchmarkId::from_parameter(file_count),
            &config,
            |b, config| b.iter(|| black_box(search(config).unwrap())),
        );
    }
    group.finish();
}

fn bench_thread_scaling(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(&dir, 500, 50).unwrap();

    let mut group = c.benchmark_group("Thread Scaling");
    for threads in [1, 2, 4, 8] {
        let config = SearchConfig::new("FIXME", dir.path())
            .with_thread_count(NonZeroUsize::new(threads).unwrap());

        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, config| {
            b.iter(|| black_box(search(config).unwrap()))
        });
    }
    group.finish();
}

// Same per-file work, scheduled by the worker pool versus rayon's work stealing
fn bench_pool_vs_rayon(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(&dir, 500, 50).unwrap();
    let files: Vec<PathBuf> = list_files(dir.path(), &None, &IgnoreSet::default()).unwrap();
    let matcher = Arc::new(LineMatcher::new("NOTE").unwrap());

    let mut group = c.benchmark_group("Scheduler");
    group.bench_function("worker_pool", |b| {
        b.iter(|| {
            let mut pool = WorkerPool::with_default_threads().unwrap();
            let handles: Vec<_> = files
                .iter()
                .cloned()
                .map(|path| {
                    let matcher = Arc::clone(&matcher);
                    pool.submit(move || matcher.scan_file(&path)).unwrap()
                })
                .collect();
            let matched = handles
                .into_iter()
                .filter_map(|h| h.join().ok())
                .filter(|outcome| outcome.matched())
                .count();
            pool.shutdown().unwrap();
            black_box(matched)
        })
    });
    group.bench_function("rayon", |b| {
        b.iter(|| {
            let matched = files
                .par_iter()
                .filter_map(|path| matcher.scan_file(path).ok())
                .filter(|outcome| outcome.matched())
                .count();
            black_box(matched)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_file_scaling,
    bench_thread_scaling,
    bench_pool_vs_rayon
);
criterion_main!(benches);
