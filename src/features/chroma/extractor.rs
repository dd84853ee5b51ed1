//! Chroma vector extraction
//!
//! Converts a Hann-windowed STFT power spectrum into one 12-element chroma
//! vector per frame.
//!
//! # Example
//!
//! ```no_run
//! use beatbank_dsp::features::chroma::extractor::extract_chroma;
//! use beatbank_dsp::AnalysisConfig;
//!
//! let samples = vec![0.0f32; 44100 * 5];
//! let chroma = extract_chroma(&samples, 44100, &AnalysisConfig::default())?;
//! println!("{} chroma frames", chroma.len());
//! # Ok::<(), beatbank_dsp::AnalysisError>(())
//! ```

use super::normalization::max_normalize;
use super::{ChromaMatrix, ChromaVector, N_PITCH_CLASSES};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f32::consts::PI;

/// Contribution of one FFT bin to one pitch class
#[derive(Debug, Clone, Copy)]
struct BinWeight {
    bin: usize,
    pitch_class: usize,
    weight: f32,
}

/// Extract chroma vectors from audio samples
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Uses `chroma_frame_size`, `chroma_hop_size`, the frequency
///   range, tuning and soft-mapping parameters
///
/// # Returns
///
/// One max-normalized chroma vector per STFT frame. Signals shorter than a
/// frame are zero-padded to a single frame.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for empty input, a zero sample rate
/// or an invalid configuration.
pub fn extract_chroma(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<ChromaMatrix, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }
    config.validate()?;

    let frame_size = config.chroma_frame_size;
    let hop_size = config.chroma_hop_size;

    log::debug!(
        "Extracting chroma: {} samples at {} Hz, frame={}, hop={}",
        samples.len(),
        sample_rate,
        frame_size,
        hop_size
    );

    let mapping = build_bin_mapping(frame_size, sample_rate, config);
    if mapping.is_empty() {
        log::warn!(
            "No FFT bins fall inside [{:.1}, {:.1}] Hz at {} Hz; chroma will be empty",
            config.min_frequency,
            config.max_frequency,
            sample_rate
        );
    }

    let window: Vec<f32> = (0..frame_size)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / frame_size as f32).cos())
        .collect();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];

    let num_frames = if samples.len() <= frame_size {
        1
    } else {
        (samples.len() - frame_size) / hop_size + 1
    };

    let mut frames = Vec::with_capacity(num_frames);
    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_size;
        for (n, slot) in buffer.iter_mut().enumerate() {
            let s = samples.get(start + n).copied().unwrap_or(0.0);
            *slot = Complex::new(s * window[n], 0.0);
        }

        fft.process(&mut buffer);

        let mut chroma = [0.0f32; N_PITCH_CLASSES];
        for m in &mapping {
            chroma[m.pitch_class] += buffer[m.bin].norm_sqr() * m.weight;
        }
        max_normalize(&mut chroma);

        frames.push(ChromaVector::new(chroma)?);
    }

    log::debug!("Extracted {} chroma frames", frames.len());

    Ok(ChromaMatrix::new(frames))
}

/// Precompute which pitch classes each in-range FFT bin feeds
fn build_bin_mapping(
    frame_size: usize,
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Vec<BinWeight> {
    let bin_hz = sample_rate as f32 / frame_size as f32;
    let nyquist = sample_rate as f32 / 2.0;
    let max_freq = config.max_frequency.min(nyquist);

    let mut mapping = Vec::new();
    for bin in 1..frame_size / 2 {
        let freq = bin as f32 * bin_hz;
        if freq < config.min_frequency || freq > max_freq {
            continue;
        }

        let midi = 69.0 + 12.0 * (freq / config.center_frequency).log2();
        let nearest = midi.round();

        if config.soft_chroma_mapping {
            let two_sigma_sq = 2.0 * config.soft_mapping_sigma * config.soft_mapping_sigma;
            for offset in -1..=1 {
                let semitone = nearest + offset as f32;
                let d = midi - semitone;
                mapping.push(BinWeight {
                    bin,
                    pitch_class: pitch_class_of(semitone),
                    weight: (-d * d / two_sigma_sq).exp(),
                });
            }
        } else {
            mapping.push(BinWeight {
                bin,
                pitch_class: pitch_class_of(nearest),
                weight: 1.0,
            });
        }
    }
    mapping
}

/// MIDI note number (already rounded) to pitch class, C = 0
fn pitch_class_of(midi: f32) -> usize {
    (midi as i64).rem_euclid(N_PITCH_CLASSES as i64) as usize
}
