//! Example: Analyze a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--json] [--soft-chroma] <file>

use beatbank_dsp::{analyze_file, AnalysisConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut json = false;
    let mut config = AnalysisConfig::default();
    let mut path: Option<String> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--soft-chroma" => config.soft_chroma_mapping = true,
            "--help" | "-h" => {
                eprintln!("Usage: analyze_file [--json] [--soft-chroma] <file>");
                return Ok(());
            }
            _ => path = Some(arg),
        }
    }

    let Some(path) = path else {
        eprintln!("ERROR: Provide an audio file path. Use --help for usage.");
        std::process::exit(2);
    };

    let result = analyze_file(&path, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Analysis Results for {}:", path);
    println!("  BPM: {:.2} (confidence: {:.2})", result.bpm, result.bpm_confidence);
    println!(
        "  Key: {} / {} (confidence: {:.3}, clarity: {:.3})",
        result.key.name(),
        result.key.camelot(),
        result.key.confidence,
        result.key_clarity
    );
    println!("  Duration: {:.1} s", result.metadata.duration_seconds);
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);
    for warning in &result.metadata.confidence_warnings {
        println!("  Warning: {}", warning);
    }

    Ok(())
}
