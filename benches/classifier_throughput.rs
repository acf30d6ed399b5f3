//! Keyword classifier throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use triage_core::classifier::{KeywordClassifier, SymptomClassifier};

const SAMPLES: &[(&str, &str)] = &[
    ("no_match", "I feel dizzy and a little off today"),
    ("single", "dry cough"),
    (
        "respiratory",
        "cough, fever, trouble breathing and no sense of taste since Monday",
    ),
    (
        "mixed",
        "severe headache on one side, nausea, stomach cramps, diarrhea after a meal, itchy rash",
    ),
];

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let classifier = KeywordClassifier::new().unwrap();

    for (name, text) in SAMPLES {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| black_box(classifier.classify(black_box(text))))
        });
    }

    group.finish();
}

fn bench_long_description(c: &mut Criterion) {
    let classifier = KeywordClassifier::new().unwrap();
    let text = "my joints ache and I am tired, ".repeat(64);

    let mut group = c.benchmark_group("classify_long");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("repeated_2kb", |b| {
        b.iter(|| black_box(classifier.classify(black_box(&text))))
    });
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("classifier_build", |b| {
        b.iter(|| black_box(KeywordClassifier::new().unwrap()))
    });
}

criterion_group!(benches, bench_classify, bench_long_description, bench_build);
criterion_main!(benches);
