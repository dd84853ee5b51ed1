//! Autocorrelation-based BPM estimation
//!
//! Finds periodicity in an onset envelope using FFT-accelerated autocorrelation.
//!
//! # Algorithm
//!
//! 1. Compute autocorrelation using FFT acceleration: `ACF = IFFT(|FFT(signal)|²)`
//! 2. Find local maxima of the ACF inside the lag range implied by the BPM range
//! 3. Refine each peak with parabolic interpolation
//! 4. Convert lag values to BPM: `BPM = (60 * sample_rate) / (lag * hop_size)`
//!
//! # Reference
//!
//! Ellis, D. P. W., & Pikrakis, A. (2006). Real-time Beat Induction.
//! *Proceedings of the International Conference on Music Information Retrieval*.

use super::BpmCandidate;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const EPSILON: f32 = 1e-10;

/// Estimate BPM candidates from an onset envelope
///
/// # Arguments
///
/// * `envelope` - Onset strength per frame
/// * `sample_rate` - Sample rate in Hz
/// * `hop_size` - Hop size used for the envelope (samples per frame)
/// * `min_bpm` - Minimum BPM to consider
/// * `max_bpm` - Maximum BPM to consider
///
/// # Returns
///
/// BPM candidates ranked by confidence (highest first). Empty when the
/// envelope is too short to contain the lag range or has no peaks in it.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate or hop size,
/// or an invalid BPM range.
pub fn estimate_bpm_from_autocorrelation(
    envelope: &[f32],
    sample_rate: u32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
) -> Result<Vec<BpmCandidate>, AnalysisError> {
    log::debug!(
        "Estimating BPM from autocorrelation: {} frames, {} Hz, hop={}, range=[{:.1}, {:.1}] BPM",
        envelope.len(),
        sample_rate,
        hop_size,
        min_bpm,
        max_bpm
    );

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid hop size: 0".to_string(),
        ));
    }

    if !(min_bpm > 0.0 && min_bpm < max_bpm) {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid BPM range: [{:.1}, {:.1}]",
            min_bpm, max_bpm
        )));
    }

    let acf = compute_autocorrelation_fft(envelope);
    if acf.len() < 3 || acf[0] <= EPSILON {
        return Ok(vec![]);
    }

    // lag = (60 * sample_rate) / (BPM * hop_size)
    let frames_per_minute = 60.0 * sample_rate as f32 / hop_size as f32;
    let lag_min = ((frames_per_minute / max_bpm).ceil() as usize).max(1);
    let lag_max = ((frames_per_minute / min_bpm).floor() as usize).min(acf.len() - 2);

    if lag_min > lag_max {
        log::warn!(
            "Envelope of {} frames too short for lag range [{}, {}]",
            envelope.len(),
            lag_min,
            (frames_per_minute / min_bpm).floor()
        );
        return Ok(vec![]);
    }

    let mut candidates = Vec::new();
    for lag in lag_min..=lag_max {
        let (prev, value, next) = (acf[lag - 1], acf[lag], acf[lag + 1]);
        if value <= EPSILON || value <= prev || value < next {
            continue;
        }

        let refined_lag = lag as f32 + parabolic_offset(prev, value, next);
        let bpm = frames_per_minute / refined_lag;
        if bpm < min_bpm || bpm > max_bpm {
            continue;
        }

        candidates.push(BpmCandidate {
            bpm,
            confidence: (value / acf[0]).clamp(0.0, 1.0),
        });
    }

    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    log::debug!("Found {} autocorrelation peaks", candidates.len());

    Ok(candidates)
}

/// Linear (non-circular) autocorrelation via FFT
///
/// Zero-pads to at least twice the signal length so lags don't wrap around.
/// `acf[0]` is the signal energy.
pub fn compute_autocorrelation_fft(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let fft_len = (2 * n).next_power_of_two();
    let mut buffer: Vec<Complex<f32>> = signal
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(fft_len)
        .collect();

    let mut planner = FftPlanner::<f32>::new();
    planner.plan_fft_forward(fft_len).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(fft_len).process(&mut buffer);

    // rustfft does not normalize the inverse transform
    buffer
        .iter()
        .take(n)
        .map(|c| c.re / fft_len as f32)
        .collect()
}

/// Vertex offset of the parabola through three points, in [-0.5, 0.5]
fn parabolic_offset(prev: f32, value: f32, next: f32) -> f32 {
    let denom = prev - 2.0 * value + next;
    if denom.abs() <= EPSILON {
        return 0.0;
    }
    (0.5 * (prev - next) / denom).clamp(-0.5, 0.5)
}
