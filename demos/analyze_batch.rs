//! Example: Analyze multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] <file1> <file2> ...
//!
//! Parallelism is across files. A file that fails to decode or analyze is
//! reported and the batch carries on.

use beatbank_dsp::{analyze_file, AnalysisConfig, AnalysisResult};
use rayon::prelude::*;
use serde_json::json;
use std::env;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn percentile(mut xs: Vec<f32>, p: f32) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(|a, b| a.total_cmp(b));
    let idx = ((xs.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    Some(xs[idx.min(xs.len() - 1)])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mut json_out = false;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.next() {
        match a.as_str() {
            "--json" => json_out = true,
            "--jobs" => {
                let v = args.next().ok_or("--jobs requires a value")?.parse::<usize>()?;
                jobs = Some(std::cmp::max(1, v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] <file1> <file2> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n\
                     --json     Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let config = AnalysisConfig::default();
    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<(String, Result<AnalysisResult, String>)> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let r = analyze_file(path, config.clone()).map_err(|e| e.to_string());
                (path.clone(), r)
            })
            .collect()
    });

    for (idx, (path, out)) in outs.iter().enumerate() {
        match (out, json_out) {
            (Ok(res), true) => println!(
                "{}",
                json!({
                    "file": path,
                    "bpm": res.bpm,
                    "bpm_confidence": res.bpm_confidence,
                    "key": res.key.name(),
                    "camelot": res.key.camelot(),
                    "key_confidence": res.key.confidence,
                    "key_clarity": res.key_clarity,
                    "flags": res.metadata.flags,
                    "processing_time_ms": res.metadata.processing_time_ms,
                })
            ),
            (Err(e), true) => println!("{}", json!({ "file": path, "error": e })),
            (Ok(res), false) => println!(
                "[{}/{}] {}: BPM={:.2} (conf={:.3}) Key={} [{}] (conf={:.3}) time={:.2}ms",
                idx + 1,
                outs.len(),
                path,
                res.bpm,
                res.bpm_confidence,
                res.key.name(),
                res.key.camelot(),
                res.key.confidence,
                res.metadata.processing_time_ms
            ),
            (Err(e), false) => {
                println!("[{}/{}] {}: ERROR: {}", idx + 1, outs.len(), path, e)
            }
        }
    }

    let ok_times: Vec<f32> = outs
        .iter()
        .filter_map(|(_, r)| r.as_ref().ok())
        .map(|r| r.metadata.processing_time_ms)
        .collect();
    let wall_ms = t0.elapsed().as_secs_f64() * 1000.0;

    eprintln!("Done: ok={}/{} wall={:.0}ms", ok_times.len(), outs.len(), wall_ms);
    if !ok_times.is_empty() {
        let mean = ok_times.iter().sum::<f32>() / ok_times.len() as f32;
        let p50 = percentile(ok_times.clone(), 0.50).unwrap_or(mean);
        let p90 = percentile(ok_times.clone(), 0.90).unwrap_or(mean);
        eprintln!(
            "processing_time_ms: mean={:.2} p50={:.2} p90={:.2}",
            mean, p50, p90
        );
    }

    Ok(())
}
