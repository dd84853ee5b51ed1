//! Period estimation modules
//!
//! Convert an onset envelope to a tempo estimate using FFT autocorrelation.

pub mod autocorrelation;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::onset::energy_flux::compute_energy_flux;
use autocorrelation::estimate_bpm_from_autocorrelation;
use serde::{Deserialize, Serialize};

/// BPM candidate with confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmCandidate {
    /// BPM estimate
    pub bpm: f32,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

/// Final tempo estimate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TempoEstimate {
    /// BPM estimate, 0.0 when no periodicity was found
    pub bpm: f32,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

/// Estimate the tempo of a mono signal
///
/// Energy flux envelope -> autocorrelation -> strongest period inside
/// `[config.min_bpm, config.max_bpm]`.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate or an invalid
/// configuration. Audio without usable onsets is not an error; it yields a
/// zero estimate.
pub fn estimate_tempo(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<TempoEstimate, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }
    config.validate()?;

    let envelope = compute_energy_flux(samples, config.frame_size, config.hop_size)?;
    if envelope.iter().all(|&f| f <= 0.0) {
        log::warn!("Onset envelope is flat, no tempo detected");
        return Ok(TempoEstimate::default());
    }

    let candidates = estimate_bpm_from_autocorrelation(
        &envelope,
        sample_rate,
        config.hop_size,
        config.min_bpm,
        config.max_bpm,
    )?;

    match candidates.first() {
        Some(best) => {
            log::debug!(
                "Tempo: {:.2} BPM (confidence {:.3}, {} candidates)",
                best.bpm,
                best.confidence,
                candidates.len()
            );
            Ok(TempoEstimate {
                bpm: best.bpm,
                confidence: best.confidence,
            })
        }
        None => {
            log::warn!(
                "No periodicity between {:.1} and {:.1} BPM",
                config.min_bpm,
                config.max_bpm
            );
            Ok(TempoEstimate::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decaying 1 kHz bursts at a fixed interval
    fn click_track(bpm: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        let period = (60.0 * sample_rate as f32 / bpm).round() as usize;
        let click_len = sample_rate as usize / 100;
        let mut samples = vec![0.0f32; n];
        for start in (0..n).step_by(period) {
            for i in 0..click_len.min(n - start) {
                let t = i as f32 / sample_rate as f32;
                let decay = 1.0 - i as f32 / click_len as f32;
                samples[start + i] = (2.0 * std::f32::consts::PI * 1000.0 * t).sin() * decay;
            }
        }
        samples
    }

    #[test]
    fn test_estimate_tempo_click_track() {
        // hop of 441 puts a 120 BPM beat exactly 50 frames apart
        let config = AnalysisConfig {
            hop_size: 441,
            ..AnalysisConfig::default()
        };
        let samples = click_track(120.0, 44100, 8.0);
        let tempo = estimate_tempo(&samples, 44100, &config).unwrap();
        assert!(
            (tempo.bpm - 120.0).abs() < 2.0,
            "expected ~120 BPM, got {:.2}",
            tempo.bpm
        );
        assert!(tempo.confidence > 0.0 && tempo.confidence <= 1.0);
    }

    #[test]
    fn test_estimate_tempo_silence() {
        let tempo =
            estimate_tempo(&vec![0.0; 44100 * 2], 44100, &AnalysisConfig::default()).unwrap();
        assert_eq!(tempo, TempoEstimate::default());
    }

    #[test]
    fn test_estimate_tempo_zero_sample_rate() {
        assert!(estimate_tempo(&[0.0; 4096], 0, &AnalysisConfig::default()).is_err());
    }
}
