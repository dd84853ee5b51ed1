//! Krumhansl-Kessler key templates
//!
//! Tonal profiles for C major and C minor. The other 22 keys are rotations of
//! these two, applied on the fly by the detector.

use crate::error::AnalysisError;
use crate::features::chroma::normalization::l2_normalize;
use std::sync::OnceLock;

/// Krumhansl-Kessler C major profile (probe-tone ratings, C..B)
pub const KRUMHANSL_MAJOR: [f32; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl-Kessler C minor profile (probe-tone ratings, C..B)
pub const KRUMHANSL_MINOR: [f32; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

static KRUMHANSL: OnceLock<KeyTemplates> = OnceLock::new();

/// Unit-norm major and minor profiles with tonic C
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyTemplates {
    major: [f32; 12],
    minor: [f32; 12],
}

impl KeyTemplates {
    /// Shared Krumhansl-Kessler templates, normalized on first use
    pub fn krumhansl() -> &'static KeyTemplates {
        KRUMHANSL.get_or_init(|| {
            log::debug!("Normalizing Krumhansl-Kessler key profiles");
            Self {
                major: unit(KRUMHANSL_MAJOR),
                minor: unit(KRUMHANSL_MINOR),
            }
        })
    }

    /// Templates from custom C major / C minor profiles
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DegenerateInput` if either profile is all zero,
    /// `AnalysisError::InvalidInput` if a weight is negative or not finite.
    pub fn from_profiles(major: [f32; 12], minor: [f32; 12]) -> Result<Self, AnalysisError> {
        for (name, profile) in [("major", &major), ("minor", &minor)] {
            if profile.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(AnalysisError::InvalidInput(format!(
                    "Key profile '{}' must contain finite, non-negative weights",
                    name
                )));
            }
        }
        Ok(Self {
            major: l2_normalize(&major)?,
            minor: l2_normalize(&minor)?,
        })
    }

    /// Normalized major profile (tonic C)
    pub fn major(&self) -> &[f32; 12] {
        &self.major
    }

    /// Normalized minor profile (tonic C)
    pub fn minor(&self) -> &[f32; 12] {
        &self.minor
    }

    /// Major profile rotated to `tonic` (0 = C, 11 = B)
    pub fn get_major_template(&self, tonic: usize) -> [f32; 12] {
        rotate(&self.major, tonic)
    }

    /// Minor profile rotated to `tonic` (0 = C, 11 = B)
    pub fn get_minor_template(&self, tonic: usize) -> [f32; 12] {
        rotate(&self.minor, tonic)
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        *Self::krumhansl()
    }
}

fn unit(profile: [f32; 12]) -> [f32; 12] {
    l2_normalize(&profile).expect("built-in key profiles are strictly positive")
}

fn rotate(profile: &[f32; 12], tonic: usize) -> [f32; 12] {
    let mut out = [0.0; 12];
    for (j, &w) in profile.iter().enumerate() {
        out[(j + tonic) % 12] = w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::chroma::normalization::l2_norm;
    use approx::assert_relative_eq;

    #[test]
    fn test_profiles_are_unit_norm() {
        let t = KeyTemplates::krumhansl();
        assert_relative_eq!(l2_norm(t.major()), 1.0, epsilon = 1e-6);
        assert_relative_eq!(l2_norm(t.minor()), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_builtin_profiles_keep_their_shape() {
        let t = KeyTemplates::krumhansl();
        let scale = t.major()[0] / KRUMHANSL_MAJOR[0];
        for (w, raw) in t.major().iter().zip(KRUMHANSL_MAJOR) {
            assert_relative_eq!(*w, raw * scale, epsilon = 1e-6);
        }
        assert!(scale < 1.0);
    }

    #[test]
    fn test_shared_instance() {
        assert!(std::ptr::eq(KeyTemplates::krumhansl(), KeyTemplates::krumhansl()));
    }

    #[test]
    fn test_rotation_moves_tonic() {
        let t = KeyTemplates::krumhansl();
        let g_major = t.get_major_template(7);
        // Tonic weight is the largest in the major profile
        assert_eq!(g_major[7], t.major()[0]);
        assert_eq!(g_major[2], t.major()[7]);
        assert_eq!(t.get_minor_template(0), *t.minor());
    }

    #[test]
    fn test_custom_profiles() {
        let t = KeyTemplates::from_profiles([1.0; 12], KRUMHANSL_MINOR).unwrap();
        assert_relative_eq!(t.major()[0], 1.0 / 12f32.sqrt(), epsilon = 1e-6);

        assert!(KeyTemplates::from_profiles([0.0; 12], KRUMHANSL_MINOR)
            .unwrap_err()
            .is_degenerate());

        let mut bad = KRUMHANSL_MAJOR;
        bad[1] = -1.0;
        assert!(matches!(
            KeyTemplates::from_profiles(bad, KRUMHANSL_MINOR),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
