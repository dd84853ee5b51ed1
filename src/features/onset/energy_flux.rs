//! Energy flux onset envelope
//!
//! Onset strength per frame from the frame-by-frame energy derivative.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame
//! 3. Compute energy derivative (flux): E_flux[n] = max(0, E[n] - E[n-1])
//!
//! # Example
//!
//! ```no_run
//! use beatbank_dsp::features::onset::energy_flux::compute_energy_flux;
//!
//! let samples = vec![0.0f32; 44100 * 30]; // 30 seconds of audio
//! let envelope = compute_energy_flux(&samples, 2048, 512)?;
//! println!("{} envelope frames", envelope.len());
//! # Ok::<(), beatbank_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// Compute the energy flux onset envelope
///
/// # Reference
///
/// Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
/// A Tutorial on Onset Detection in Music Signals.
/// *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.
///
/// # Arguments
///
/// * `samples` - Audio samples (mono)
/// * `frame_size` - Frame size for analysis (typically 2048)
/// * `hop_size` - Hop size between frames (typically 512)
///
/// # Returns
///
/// Half-wave rectified energy difference, one value per hop. Entry `n`
/// describes the rise from frame `n` to frame `n + 1`. Empty when the audio is
/// shorter than two frames.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if frame or hop size is zero.
pub fn compute_energy_flux(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    if frame_size > samples.len() {
        log::warn!(
            "Frame size ({}) larger than audio length ({}), returning empty envelope",
            frame_size,
            samples.len()
        );
        return Ok(Vec::new());
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    if num_frames < 2 {
        return Ok(Vec::new());
    }

    log::debug!(
        "Computing energy flux: {} samples, frame={}, hop={}, {} frames",
        samples.len(),
        frame_size,
        hop_size,
        num_frames
    );

    let energies: Vec<f32> = (0..num_frames)
        .map(|i| {
            let frame = &samples[i * hop_size..i * hop_size + frame_size];
            let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
            (sum_sq / frame_size as f32).sqrt()
        })
        .collect();

    Ok(energies
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sizes() {
        assert!(compute_energy_flux(&[0.0; 4096], 0, 512).is_err());
        assert!(compute_energy_flux(&[0.0; 4096], 2048, 0).is_err());
    }

    #[test]
    fn test_short_audio_is_empty() {
        assert!(compute_energy_flux(&[0.5; 100], 2048, 512).unwrap().is_empty());
    }

    #[test]
    fn test_silence_has_no_flux() {
        let flux = compute_energy_flux(&vec![0.0; 44100], 2048, 512).unwrap();
        assert!(!flux.is_empty());
        assert!(flux.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_step_produces_rise_only() {
        // Silence then a constant tone: energy rises once, never falls
        let mut samples = vec![0.0f32; 8192];
        samples.extend(std::iter::repeat(0.5f32).take(8192));
        let flux = compute_energy_flux(&samples, 1024, 512).unwrap();

        let rising: Vec<usize> = flux
            .iter()
            .enumerate()
            .filter(|(_, &f)| f > 0.0)
            .map(|(i, _)| i)
            .collect();
        assert!(!rising.is_empty());
        // Rise happens around sample 8192 (frames 14-16)
        assert!(rising.iter().all(|&i| (13..=16).contains(&i)), "{:?}", rising);
        assert!(flux.iter().all(|&f| f >= 0.0));
    }
}
