//! # Beatbank DSP
//!
//! Tempo and musical key estimation for a music library.
//!
//! ## Features
//!
//! - **Key Detection**: Krumhansl-Schmuckler correlation of an averaged chroma
//!   vector with the 24 rotated Krumhansl-Kessler key profiles
//! - **BPM Detection**: Energy flux onset envelope with FFT autocorrelation
//! - **Decoding**: Any format Symphonia supports, downmixed to mono
//!
//! ## Quick Start
//!
//! ```no_run
//! use beatbank_dsp::{analyze_file, AnalysisConfig};
//!
//! let result = analyze_file("track.flac", AnalysisConfig::default())?;
//!
//! println!("BPM: {:.2} (confidence: {:.2})", result.bpm, result.bpm_confidence);
//! println!("Key: {} (confidence: {:.2})", result.key.name(), result.key.confidence);
//! # Ok::<(), beatbank_dsp::AnalysisError>(())
//! ```
//!
//! The key estimator can also be used on its own with chroma from any source:
//!
//! ```
//! use beatbank_dsp::{ChromaVector, KeyEstimator};
//!
//! let chroma = ChromaVector::new([
//!     6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
//! ])?;
//! let key = KeyEstimator::new().estimate(&chroma)?;
//! assert_eq!(key.name(), "C");
//! # Ok::<(), beatbank_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio File -> Decoding -> Feature Extraction (tempo, chroma) -> Key Estimation -> Result
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

use std::path::Path;
use std::time::Instant;

// Re-export main types
pub use analysis::result::{
    camelot_notation, parse_camelot, AnalysisFlag, AnalysisMetadata, AnalysisResult, KeyEstimate,
    Mode, PitchClass,
};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::chroma::{ChromaMatrix, ChromaVector};
pub use features::key::{estimate_key, KeyDetectionResult, KeyEstimator, KeyTemplates};
pub use features::period::TempoEstimate;
pub use features::{DspFeatureExtractor, ExtractedFeatures, FeatureExtractor};
pub use io::{decode_audio, DecodedAudio};

/// Key clarity below which [`AnalysisFlag::WeakTonality`] is raised
const WEAK_TONALITY_CLARITY: f32 = 0.02;

/// Tempo confidence below which [`AnalysisFlag::LowTempoConfidence`] is raised
const LOW_TEMPO_CONFIDENCE: f32 = 0.1;

/// Main analysis function
///
/// Analyzes mono samples with the built-in feature extractor and returns BPM,
/// key and confidence metrics.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// - `AnalysisError::InvalidInput` for empty samples, a zero sample rate or
///   an invalid configuration
/// - `AnalysisError::DegenerateInput` if the audio has no energy in the
///   chroma frequency range (e.g. silence)
///
/// # Example
///
/// ```no_run
/// use beatbank_dsp::{analyze_audio, AnalysisConfig};
///
/// let samples = vec![0.1f32; 44100 * 30];
/// let result = analyze_audio(&samples, 44100, AnalysisConfig::default())?;
/// # Ok::<(), beatbank_dsp::AnalysisError>(())
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;
    analyze_with(&DspFeatureExtractor::new(config), samples, sample_rate)
}

/// Analyze mono samples with a caller-supplied feature extractor
///
/// # Errors
///
/// Same as [`analyze_audio`], plus whatever the extractor returns.
pub fn analyze_with<E: FeatureExtractor + ?Sized>(
    extractor: &E,
    samples: &[f32],
    sample_rate: u32,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting audio analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate".to_string(),
        ));
    }

    let features = extractor.extract(samples, sample_rate)?;
    log::debug!(
        "Extracted features: tempo {:.2} BPM, {} chroma frames",
        features.tempo.bpm,
        features.chroma.len()
    );

    let aggregated = features.chroma.mean()?;
    let detection = KeyEstimator::new().detect(&aggregated)?;

    let mut flags = Vec::new();
    let mut confidence_warnings = Vec::new();

    if detection.clarity < WEAK_TONALITY_CLARITY {
        flags.push(AnalysisFlag::WeakTonality);
        confidence_warnings.push(format!(
            "Key is ambiguous: clarity {:.3}, runner-up {}",
            detection.clarity,
            detection
                .all_scores
                .get(1)
                .map(|c| format!("{} {}", c.pitch_class, c.mode))
                .unwrap_or_else(|| "none".to_string())
        ));
    }

    if features.tempo.confidence < LOW_TEMPO_CONFIDENCE {
        flags.push(AnalysisFlag::LowTempoConfidence);
        confidence_warnings.push(format!(
            "Tempo is unreliable: confidence {:.3}",
            features.tempo.confidence
        ));
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Analysis done in {:.2} ms: {:.2} BPM, key {}",
        processing_time_ms,
        features.tempo.bpm,
        detection.key
    );

    Ok(AnalysisResult {
        bpm: features.tempo.bpm,
        bpm_confidence: features.tempo.confidence,
        key: detection.key,
        key_clarity: detection.clarity,
        metadata: AnalysisMetadata {
            duration_seconds: samples.len() as f32 / sample_rate as f32,
            sample_rate,
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            chroma_frames: features.chroma.len(),
            flags,
            confidence_warnings,
        },
    })
}

/// Decode an audio file and analyze it
///
/// # Errors
///
/// `AnalysisError::DecodingError` for unreadable files, otherwise as
/// [`analyze_audio`].
pub fn analyze_file(
    path: impl AsRef<Path>,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let path = path.as_ref();
    log::debug!("Starting analysis on {}", path.display());
    let audio = decode_audio(path)?;
    analyze_audio(&audio.samples, audio.sample_rate, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use features::key::templates::{KRUMHANSL_MAJOR, KRUMHANSL_MINOR};

    struct FixedFeatures {
        tempo: TempoEstimate,
        chroma: [f32; 12],
    }

    impl FeatureExtractor for FixedFeatures {
        fn extract(
            &self,
            _samples: &[f32],
            _sample_rate: u32,
        ) -> Result<ExtractedFeatures, AnalysisError> {
            Ok(ExtractedFeatures {
                tempo: self.tempo,
                chroma: ChromaMatrix::new(vec![ChromaVector::new(self.chroma)?; 4]),
            })
        }
    }

    fn fixed(chroma: [f32; 12], bpm: f32, confidence: f32) -> FixedFeatures {
        FixedFeatures {
            tempo: TempoEstimate { bpm, confidence },
            chroma,
        }
    }

    #[test]
    fn test_analyze_audio_empty_samples() {
        let result = analyze_audio(&[], 44100, AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_analyze_audio_zero_sample_rate() {
        let result = analyze_audio(&[0.1; 4096], 0, AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_analyze_audio_invalid_config() {
        let config = AnalysisConfig {
            min_bpm: 200.0,
            max_bpm: 100.0,
            ..AnalysisConfig::default()
        };
        let result = analyze_audio(&[0.1; 4096], 44100, config);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_analyze_audio_silence_is_degenerate() {
        let result = analyze_audio(&vec![0.0; 44100], 44100, AnalysisConfig::default());
        assert!(result.unwrap_err().is_degenerate());
    }

    #[test]
    fn test_analyze_with_custom_extractor() {
        let extractor = fixed(KRUMHANSL_MINOR, 128.0, 0.8);
        let mut rotated = [0.0; 12];
        for (j, &w) in extractor.chroma.iter().enumerate() {
            rotated[(j + 9) % 12] = w;
        }
        let extractor = FixedFeatures { chroma: rotated, ..extractor };

        let result = analyze_with(&extractor, &[0.0; 1000], 1000).unwrap();
        assert_eq!(result.key.pitch_class, PitchClass::A);
        assert_eq!(result.key.mode, Mode::Minor);
        assert_eq!(result.key.camelot(), "8A");
        assert_eq!(result.bpm, 128.0);
        assert_eq!(result.metadata.chroma_frames, 4);
        assert_eq!(result.metadata.duration_seconds, 1.0);
        assert_eq!(result.metadata.algorithm_version, env!("CARGO_PKG_VERSION"));
        assert!(result.metadata.flags.is_empty());
        assert!(result.metadata.confidence_warnings.is_empty());
    }

    #[test]
    fn test_weak_tonality_flag() {
        // Summed profiles put C major and C minor within a hair of each other
        let mut both = [0.0; 12];
        for i in 0..12 {
            both[i] = KRUMHANSL_MAJOR[i] + KRUMHANSL_MINOR[i];
        }
        let result = analyze_with(&fixed(both, 120.0, 0.9), &[0.0; 10], 10).unwrap();
        assert_eq!(result.key.pitch_class, PitchClass::C);
        assert!(result.metadata.flags.contains(&AnalysisFlag::WeakTonality));
        assert!(!result.metadata.flags.contains(&AnalysisFlag::LowTempoConfidence));
        assert_eq!(result.metadata.confidence_warnings.len(), 1);
    }

    #[test]
    fn test_low_tempo_confidence_flag() {
        let result =
            analyze_with(&fixed(KRUMHANSL_MAJOR, 0.0, 0.0), &[0.0; 10], 10).unwrap();
        assert_eq!(result.key.pitch_class, PitchClass::C);
        assert_eq!(result.metadata.flags, vec![AnalysisFlag::LowTempoConfidence]);
    }

    #[test]
    fn test_analyze_file_missing() {
        let result = analyze_file("/nonexistent/track.flac", AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }
}
