//! Key detection algorithm
//!
//! Correlates a unit-normalized chroma vector with the 12 rotations of the
//! unit-normalized Krumhansl-Kessler major and minor profiles (the
//! Krumhansl-Schmuckler method) and picks the best of the 24 keys.
//!
//! # Reference
//!
//! Krumhansl, C. L. (1990). *Cognitive Foundations of Musical Pitch*.
//! Oxford University Press.

use super::{compute_key_clarity, templates::KeyTemplates, KeyDetectionResult};
use crate::analysis::result::{KeyEstimate, Mode, PitchClass};
use crate::error::AnalysisError;
use crate::features::chroma::{ChromaMatrix, ChromaVector};

/// Number of candidates kept in [`KeyDetectionResult::top_keys`]
const TOP_N: usize = 3;

/// One of the 24 keys with its correlation score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyCandidate {
    /// Tonic
    pub pitch_class: PitchClass,
    /// Mode
    pub mode: Mode,
    /// Correlation with the normalized chroma vector
    pub score: f32,
}

/// Correlation of a chroma vector with all 24 key profiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyScores {
    /// Major key scores by tonic (0 = C)
    pub major: [f32; 12],
    /// Minor key scores by tonic (0 = C)
    pub minor: [f32; 12],
}

impl KeyScores {
    /// Pick the winning key
    ///
    /// Argmax over the 24 scores with strict `>` comparisons: within a mode
    /// the lowest tonic index wins ties, and minor must score strictly higher
    /// than major to win.
    pub fn best(&self) -> KeyEstimate {
        let major_idx = argmax(&self.major);
        let minor_idx = argmax(&self.minor);
        let major_score = self.major[major_idx];
        let minor_score = self.minor[minor_idx];

        if minor_score > major_score {
            KeyEstimate {
                pitch_class: PitchClass::from_index(minor_idx),
                mode: Mode::Minor,
                confidence: minor_score,
            }
        } else {
            KeyEstimate {
                pitch_class: PitchClass::from_index(major_idx),
                mode: Mode::Major,
                confidence: major_score,
            }
        }
    }

    /// All 24 candidates, highest score first
    ///
    /// Majors precede minors and lower tonics precede higher ones before a
    /// stable sort, so equal scores keep the order [`KeyScores::best`] uses and
    /// the winner is always first.
    pub fn ranked(&self) -> Vec<KeyCandidate> {
        let mut ranked: Vec<KeyCandidate> = (0..12)
            .map(|i| KeyCandidate {
                pitch_class: PitchClass::from_index(i),
                mode: Mode::Major,
                score: self.major[i],
            })
            .chain((0..12).map(|i| KeyCandidate {
                pitch_class: PitchClass::from_index(i),
                mode: Mode::Minor,
                score: self.minor[i],
            }))
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

/// Krumhansl-Schmuckler key estimator
///
/// Holds a copy of the (already normalized) templates; stateless otherwise,
/// so one instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct KeyEstimator {
    templates: KeyTemplates,
}

impl KeyEstimator {
    /// Estimator using the Krumhansl-Kessler profiles
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator using custom templates
    pub fn with_templates(templates: KeyTemplates) -> Self {
        Self { templates }
    }

    /// Templates in use
    pub fn templates(&self) -> &KeyTemplates {
        &self.templates
    }

    /// Estimate the key of an aggregated chroma vector
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DegenerateInput` if the chroma vector is all zero.
    ///
    /// # Example
    ///
    /// ```
    /// use beatbank_dsp::{ChromaVector, KeyEstimator, Mode, PitchClass};
    ///
    /// // C major triad
    /// let mut values = [0.0f32; 12];
    /// values[0] = 1.0;
    /// values[4] = 1.0;
    /// values[7] = 1.0;
    /// let chroma = ChromaVector::new(values)?;
    ///
    /// let key = KeyEstimator::new().estimate(&chroma)?;
    /// assert_eq!(key.pitch_class, PitchClass::C);
    /// assert_eq!(key.mode, Mode::Major);
    /// # Ok::<(), beatbank_dsp::AnalysisError>(())
    /// ```
    pub fn estimate(&self, chroma: &ChromaVector) -> Result<KeyEstimate, AnalysisError> {
        let estimate = self.score(chroma)?.best();
        log::debug!(
            "Estimated key: {} (confidence {:.4})",
            estimate,
            estimate.confidence
        );
        Ok(estimate)
    }

    /// Correlate a chroma vector with all 24 key profiles
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DegenerateInput` if the chroma vector is all zero.
    pub fn score(&self, chroma: &ChromaVector) -> Result<KeyScores, AnalysisError> {
        let normalized = chroma.normalized()?;
        let x = normalized.values();

        let mut major = [0.0f32; 12];
        let mut minor = [0.0f32; 12];
        for tonic in 0..12 {
            major[tonic] = rotated_dot(x, self.templates.major(), tonic);
            minor[tonic] = rotated_dot(x, self.templates.minor(), tonic);
        }

        Ok(KeyScores { major, minor })
    }

    /// Full detection result: winner, ranked candidates and clarity
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DegenerateInput` if the chroma vector is all zero.
    pub fn detect(&self, chroma: &ChromaVector) -> Result<KeyDetectionResult, AnalysisError> {
        let scores = self.score(chroma)?;
        let key = scores.best();
        let all_scores = scores.ranked();
        let clarity = compute_key_clarity(&all_scores);
        let top_keys = all_scores.iter().take(TOP_N).copied().collect();

        log::debug!(
            "Detected key: {}, score: {:.4}, clarity: {:.4}",
            key,
            key.confidence,
            clarity
        );

        Ok(KeyDetectionResult {
            key,
            clarity,
            all_scores,
            top_keys,
        })
    }

    /// Estimate the key of a chroma matrix, aggregated by mean over frames
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for an empty matrix and
    /// `AnalysisError::DegenerateInput` if every frame is silent.
    pub fn estimate_frames(&self, chroma: &ChromaMatrix) -> Result<KeyEstimate, AnalysisError> {
        log::debug!("Estimating key from {} chroma frames", chroma.len());
        self.estimate(&chroma.mean()?)
    }
}

/// Estimate a key with the shared Krumhansl-Kessler templates
///
/// # Errors
///
/// Returns `AnalysisError::DegenerateInput` if the chroma vector is all zero.
pub fn estimate_key(chroma: &ChromaVector) -> Result<KeyEstimate, AnalysisError> {
    KeyEstimator::new().estimate(chroma)
}

/// Dot product of `x` with `profile` rotated to `tonic`
///
/// Summed in the profile's own index order, so a transposed input reproduces
/// the same score bit for bit at the transposed tonic.
fn rotated_dot(x: &[f32; 12], profile: &[f32; 12], tonic: usize) -> f32 {
    profile
        .iter()
        .enumerate()
        .map(|(j, &w)| x[(tonic + j) % 12] * w)
        .sum()
}

/// Index of the maximum; the first one wins ties
fn argmax(scores: &[f32; 12]) -> usize {
    let mut best = 0;
    for i in 1..12 {
        if scores[i] > scores[best] {
            best = i;
        }
    }
    best
}
