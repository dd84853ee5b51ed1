//! Key clarity scoring
//!
//! Estimates how "tonal" vs "atonal" a track is.

use super::KeyCandidate;

/// Compute key clarity from ranked key scores
///
/// # Arguments
///
/// * `ranked` - Key candidates, winner first
///
/// # Returns
///
/// `(best - second) / best`, clamped to 0.0-1.0. Higher = more tonal.
/// Returns 0.0 with fewer than two candidates or a non-positive best score.
pub fn compute_key_clarity(ranked: &[KeyCandidate]) -> f32 {
    let (best, second) = match ranked {
        [best, second, ..] => (best.score, second.score),
        _ => return 0.0,
    };

    if best <= 0.0 {
        return 0.0;
    }

    ((best - second) / best).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::{Mode, PitchClass};
    use approx::assert_relative_eq;

    fn candidate(score: f32) -> KeyCandidate {
        KeyCandidate {
            pitch_class: PitchClass::C,
            mode: Mode::Major,
            score,
        }
    }

    #[test]
    fn test_clarity_margin() {
        let clarity = compute_key_clarity(&[candidate(0.8), candidate(0.6), candidate(0.1)]);
        assert_relative_eq!(clarity, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_clarity_degenerate_inputs() {
        assert_eq!(compute_key_clarity(&[]), 0.0);
        assert_eq!(compute_key_clarity(&[candidate(0.9)]), 0.0);
        assert_eq!(compute_key_clarity(&[candidate(0.0), candidate(0.0)]), 0.0);
    }

    #[test]
    fn test_clarity_clamped_when_winner_is_not_highest() {
        // Tie-break can put a slightly lower score first
        assert_eq!(compute_key_clarity(&[candidate(0.5), candidate(0.50001)]), 0.0);
    }
}
