use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ort::session::builder::GraphOptimizationLevel;
use tonality::{ArtifactStore, RuntimeConfig, SentimentClassifier};

// Benchmarks expect real artifacts in the default model directory
// (TONALITY_MODEL_DIR or ./model).

fn setup_benchmark_classifier(config: RuntimeConfig) -> SentimentClassifier {
    SentimentClassifier::builder()
        .with_runtime_config(config)
        .with_artifacts(ArtifactStore::new_default().unwrap())
        .unwrap()
        .build()
        .unwrap()
}

fn bench_input_length(c: &mut Criterion) {
    let classifier = setup_benchmark_classifier(RuntimeConfig::default());
    let mut group = c.benchmark_group("InputLength");

    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| {
        b.iter(|| classifier.predict(black_box("Отличный фильм!")).unwrap())
    });

    group.bench_function("medium_text", |b| {
        b.iter(|| {
            classifier
                .predict(black_box(
                    "Сходили вчера на премьеру, и впечатления смешанные: картинка \
                     отличная, но сюжет провисает ближе к середине, а финал \
                     откровенно разочаровал. Пересматривать точно не буду.",
                ))
                .unwrap()
        })
    });

    // Past 128 tokens the cost should flatten out: extra input is truncated.
    let long_text = "очень длинный отзыв про кино ".repeat(100);
    group.bench_function("long_text_truncated", |b| {
        b.iter(|| classifier.predict(black_box(long_text.as_str())).unwrap())
    });

    group.finish();
}

fn bench_runtime_configs(c: &mut Criterion) {
    let mut group = c.benchmark_group("RuntimeConfig");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let configs = vec![
        (
            "single_thread",
            RuntimeConfig {
                prefer_accelerated: false,
                inter_threads: 1,
                intra_threads: 1,
                optimization_level: GraphOptimizationLevel::Level1,
            },
        ),
        (
            "multi_thread",
            RuntimeConfig {
                prefer_accelerated: false,
                inter_threads: 2,
                intra_threads: 2,
                optimization_level: GraphOptimizationLevel::Level2,
            },
        ),
        (
            "optimized",
            RuntimeConfig {
                prefer_accelerated: true,
                inter_threads: 0, // Let ONNX Runtime decide
                intra_threads: 0, // Let ONNX Runtime decide
                optimization_level: GraphOptimizationLevel::Level3,
            },
        ),
    ];

    for (name, config) in configs {
        let classifier = setup_benchmark_classifier(config);
        group.bench_function(format!("predict_{}", name), |b| {
            b.iter(|| {
                classifier
                    .predict(black_box("Каждый день одно и то же, как же это надоело"))
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_input_length, bench_runtime_configs);
criterion_main!(benches);
