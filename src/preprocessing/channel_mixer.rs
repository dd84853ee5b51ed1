//! Channel mixing utilities (multichannel to mono conversion)

use crate::error::AnalysisError;

/// Average interleaved multichannel samples down to mono
///
/// # Arguments
///
/// * `interleaved` - Samples ordered frame by frame (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// One sample per frame, the mean across channels. A trailing partial frame
/// is dropped.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero.
pub fn downmix_interleaved(
    interleaved: &[f32],
    channels: usize,
) -> Result<Vec<f32>, AnalysisError> {
    match channels {
        0 => Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        )),
        1 => Ok(interleaved.to_vec()),
        _ => {
            if interleaved.len() % channels != 0 {
                log::warn!(
                    "Dropping {} samples of a partial {}-channel frame",
                    interleaved.len() % channels,
                    channels
                );
            }
            Ok(interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo() {
        let mono = downmix_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2).unwrap();
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        assert_eq!(downmix_interleaved(&[0.1, 0.2], 1).unwrap(), vec![0.1, 0.2]);
    }

    #[test]
    fn test_downmix_drops_partial_frame() {
        let mono = downmix_interleaved(&[0.3, 0.3, 0.3, 0.9], 3).unwrap();
        assert_eq!(mono.len(), 1);
    }

    #[test]
    fn test_downmix_zero_channels() {
        assert!(downmix_interleaved(&[0.0], 0).is_err());
    }
}
