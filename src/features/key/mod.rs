//! Key detection modules
//!
//! Detect musical key using:
//! - Krumhansl-Kessler templates (24 keys)
//! - Template correlation (Krumhansl-Schmuckler)
//! - Key clarity scoring

pub mod detector;
pub mod key_clarity;
pub mod templates;

pub use detector::{estimate_key, KeyCandidate, KeyEstimator, KeyScores};
pub use key_clarity::compute_key_clarity;
pub use templates::KeyTemplates;

use crate::analysis::result::KeyEstimate;

/// Key detection result
#[derive(Debug, Clone)]
pub struct KeyDetectionResult {
    /// Detected key (best match)
    pub key: KeyEstimate,

    /// Key clarity (0.0-1.0), margin of the winner over the runner-up
    pub clarity: f32,

    /// All 24 key scores (ranked, winner first)
    pub all_scores: Vec<KeyCandidate>,

    /// Top 3 keys with scores
    /// Useful for ambiguous cases or DJ key mixing
    pub top_keys: Vec<KeyCandidate>,
}
