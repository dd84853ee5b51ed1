//! Performance benchmarks for key estimation and the full pipeline

use beatbank_dsp::features::chroma::extractor::extract_chroma;
use beatbank_dsp::{analyze_audio, AnalysisConfig, ChromaVector, KeyEstimator};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synth_chord(seconds: usize) -> Vec<f32> {
    // C4 E4 G4
    let freqs = [261.63f32, 329.63, 392.0];
    (0..44100 * seconds)
        .map(|i| {
            let t = i as f32 / 44100.0;
            freqs
                .iter()
                .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
                .sum::<f32>()
                * 0.2
        })
        .collect()
}

fn bench_estimate(c: &mut Criterion) {
    let estimator = KeyEstimator::new();
    let chroma = ChromaVector::new([
        0.9, 0.1, 0.3, 0.1, 0.7, 0.5, 0.1, 0.8, 0.1, 0.4, 0.1, 0.2,
    ])
    .unwrap();

    c.bench_function("key_estimate", |b| {
        b.iter(|| estimator.estimate(black_box(&chroma)));
    });
    c.bench_function("key_detect_ranked", |b| {
        b.iter(|| estimator.detect(black_box(&chroma)));
    });
}

fn bench_chroma(c: &mut Criterion) {
    let samples = synth_chord(10);
    let config = AnalysisConfig::default();

    c.bench_function("extract_chroma_10s", |b| {
        b.iter(|| extract_chroma(black_box(&samples), 44100, &config));
    });
}

fn bench_analyze_audio(c: &mut Criterion) {
    let samples = synth_chord(30);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_audio_30s", |b| {
        b.iter(|| analyze_audio(black_box(&samples), black_box(44100), config.clone()));
    });
}

criterion_group!(benches, bench_estimate, bench_chroma, bench_analyze_audio);
criterion_main!(benches);
