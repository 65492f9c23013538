use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use render_blueprint::{
    find_conflicts, from_yaml, merge_blueprints, prefix_blueprint, to_yaml, validate_blueprint,
    Blueprint, Database, DatabaseProperty, DeployConfig, EnvVar, EnvVarGroup, Runtime, Service,
    ServiceProperty, ServiceType, WebService,
};

// ============================================================================
// Test Data: generated blueprints of increasing size
// ============================================================================

/// `size` web services, each wired to its own database, a sibling worker,
/// a shared group and one external database.
fn generate_blueprint(size: usize, tag: &str) -> Blueprint {
    let mut bp = Blueprint::new()
        .with_env_var_groups([EnvVarGroup::new(format!("{tag}-shared")).with_env("LOG_LEVEL", "info")]);
    for i in 0..size {
        let db = format!("{tag}-db-{i}");
        let worker = format!("{tag}-worker-{i}");
        bp = bp
            .with_services([
                Service::web(format!("{tag}-api-{i}"), WebService::new(Runtime::Node)).with_env_vars([
                    EnvVar::from_database("DATABASE_URL", &db, DatabaseProperty::ConnectionString),
                    EnvVar::from_database("LEGACY_URL", "external-db", DatabaseProperty::Host),
                    EnvVar::from_service("WORKER", &worker, ServiceType::Worker, ServiceProperty::Host),
                    EnvVar::from_group(format!("{tag}-shared")),
                ]),
                Service::worker(worker, DeployConfig::new(Runtime::Python)),
            ])
            .with_databases([Database::new(&db).with_read_replicas([format!("{db}-replica")])]);
    }
    bp
}

const SIZES: [usize; 4] = [10, 100, 500, 1000];

// ============================================================================
// Composition
// ============================================================================

fn bench_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefix");
    for size in SIZES {
        let bp = generate_blueprint(size, "app");
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bp, |b, bp| {
            b.iter(|| prefix_blueprint(Some(black_box(bp)), "prod-"));
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for size in SIZES {
        let base = generate_blueprint(size, "base");
        let overlay = generate_blueprint(size, "overlay");
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(base, overlay),
            |b, (base, overlay)| {
                b.iter(|| merge_blueprints(Some(black_box(base)), Some(black_box(overlay))));
            },
        );
    }
    group.finish();
}

fn bench_conflicts_and_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("checks");
    for size in SIZES {
        let bp = generate_blueprint(size, "app");
        group.bench_with_input(BenchmarkId::new("conflicts", size), &bp, |b, bp| {
            b.iter(|| find_conflicts(Some(black_box(bp)), Some(black_box(bp))));
        });
        group.bench_with_input(BenchmarkId::new("validate", size), &bp, |b, bp| {
            b.iter(|| validate_blueprint(Some(black_box(bp))));
        });
    }
    group.finish();
}

// ============================================================================
// Codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for size in [10, 100, 500] {
        let bp = generate_blueprint(size, "app");
        let yaml = to_yaml(&bp).unwrap();
        group.throughput(Throughput::Bytes(yaml.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &bp, |b, bp| {
            b.iter(|| to_yaml(black_box(bp)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &yaml, |b, yaml| {
            b.iter(|| from_yaml(black_box(yaml)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(composition_benches, bench_prefix, bench_merge, bench_conflicts_and_validation);
criterion_group!(codec_benches, bench_codec);
criterion_main!(composition_benches, codec_benches);
