//! Latency benchmarks for the prediction hot path
//!
//! Measures schema validation on its own and full dispatch (lookup,
//! validation, prediction, output check) against the built-in Iris model.
//!
//! Run with: cargo bench -p modelhost-models

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;

use modelhost_core::PluginReference;
use modelhost_models::iris::{IRIS_CLASS, IRIS_MODULE};
use modelhost_models::{Dispatcher, IrisModel, Model, PluginLoader, RequestValidator, SharedRegistry};

const PAYLOADS: [(&str, &str); 4] = [
    (
        "valid",
        r#"{"sepal_length": 5.1, "sepal_width": 3.5, "petal_length": 1.4, "petal_width": 0.2}"#,
    ),
    ("missing_field", r#"{"sepal_length": 5.1, "sepal_width": 3.5, "petal_length": 1.4}"#),
    (
        "out_of_range",
        r#"{"sepal_length": 51, "sepal_width": 3.5, "petal_length": 1.4, "petal_width": 0.2}"#,
    ),
    ("malformed", r#"{"sepal_length": 5.1, "#),
];

/// Benchmark payload validation against the Iris input schema
fn benchmark_validator(c: &mut Criterion) {
    let validator = RequestValidator::new();
    let schema = IrisModel::new().input_schema();

    let mut group = c.benchmark_group("Request_Validator");
    group.sample_size(100);

    for (name, payload) in PAYLOADS {
        group.bench_with_input(BenchmarkId::new("validate", name), &payload, |b, payload| {
            b.iter(|| {
                let _ = validator.validate(black_box(payload.as_bytes()), &schema);
            });
        });
    }

    group.finish();
}

/// Benchmark end-to-end dispatch
fn benchmark_dispatcher(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let loader = PluginLoader::with_builtin_models();
    let registry = SharedRegistry::load(&loader, &[PluginReference::new(IRIS_MODULE, IRIS_CLASS)])
        .expect("Failed to load iris model");
    let dispatcher = Dispatcher::new(registry);

    let mut group = c.benchmark_group("Dispatcher");
    group.sample_size(100);

    for (name, payload) in PAYLOADS {
        group.bench_with_input(BenchmarkId::new("predict", name), &payload, |b, payload| {
            b.iter(|| {
                rt.block_on(async {
                    let _ = dispatcher
                        .predict(black_box("iris_model"), black_box(payload.as_bytes()))
                        .await;
                })
            });
        });
    }

    group.bench_function("predict/unknown_model", |b| {
        b.iter(|| {
            rt.block_on(async {
                let _ = dispatcher.predict(black_box("unicorn"), b"{}").await;
            })
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_validator, benchmark_dispatcher);
criterion_main!(benches);
