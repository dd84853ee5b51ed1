//! Chroma normalization strategies

use crate::error::AnalysisError;

/// Frames whose peak energy is below this stay all-zero
const EPSILON: f32 = 1e-10;

/// Euclidean norm of a pitch-class vector
///
/// Values are scaled by the peak before squaring so that very large or very
/// small magnitudes neither overflow nor flush to zero. Squares are summed in
/// ascending order so that any permutation of the same values (e.g. a
/// transposed chroma vector) yields a bit-identical norm.
pub fn l2_norm(values: &[f32; 12]) -> f32 {
    let peak = peak(values);
    if peak == 0.0 {
        return 0.0;
    }
    peak * scaled_norm(&values.map(|v| v / peak))
}

/// Scale to unit Euclidean norm
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateInput` if every element is zero.
pub fn l2_normalize(values: &[f32; 12]) -> Result<[f32; 12], AnalysisError> {
    let peak = peak(values);
    if peak == 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "Chroma vector has zero norm and cannot be normalized".to_string(),
        ));
    }
    let scaled = values.map(|v| v / peak);
    let norm = scaled_norm(&scaled);
    Ok(scaled.map(|v| v / norm))
}

/// Largest absolute value
fn peak(values: &[f32; 12]) -> f32 {
    values.iter().fold(0.0f32, |m, v| m.max(v.abs()))
}

/// Norm of a vector whose largest magnitude is 1.0, so the result is in [1, sqrt(12)]
fn scaled_norm(scaled: &[f32; 12]) -> f32 {
    let mut squares = scaled.map(|v| v * v);
    squares.sort_by(|a, b| a.total_cmp(b));
    squares.iter().sum::<f32>().sqrt()
}

/// Scale so the strongest pitch class is 1.0 (in place)
///
/// Near-silent frames are zeroed instead of amplified.
pub fn max_normalize(values: &mut [f32; 12]) {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    if max <= EPSILON {
        *values = [0.0; 12];
        return;
    }
    for v in values.iter_mut() {
        *v /= max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_l2_norm_permutation_invariant() {
        let a = [0.3, 0.1, 0.7, 0.0, 0.25, 0.9, 0.05, 0.4, 0.33, 0.12, 0.6, 0.2];
        let mut b = a;
        b.rotate_left(5);
        assert_eq!(l2_norm(&a).to_bits(), l2_norm(&b).to_bits());
    }

    #[test]
    fn test_l2_normalize_zero() {
        assert!(l2_normalize(&[0.0; 12]).unwrap_err().is_degenerate());
    }

    #[test]
    fn test_l2_normalize_extreme_magnitudes() {
        for scale in [1e20f32, 1e-24, f32::MAX / 2.0] {
            let mut v = [scale; 12];
            v[0] = scale * 1.5;
            let unit = l2_normalize(&v).unwrap();
            assert_relative_eq!(l2_norm(&unit), 1.0, epsilon = 1e-6);
            assert!(unit[0] > unit[1]);
        }
    }

    #[test]
    fn test_l2_norm_tiny_values_not_zero() {
        let norm = l2_norm(&[1e-24; 12]);
        assert_relative_eq!(norm, 1e-24 * 12f32.sqrt(), max_relative = 1e-5);
    }

    #[test]
    fn test_max_normalize() {
        let mut v = [0.0f32; 12];
        v[2] = 4.0;
        v[9] = 1.0;
        max_normalize(&mut v);
        assert_relative_eq!(v[2], 1.0);
        assert_relative_eq!(v[9], 0.25);
    }

    #[test]
    fn test_max_normalize_silent_frame() {
        let mut v = [1e-12f32; 12];
        max_normalize(&mut v);
        assert_eq!(v, [0.0; 12]);
    }
}
