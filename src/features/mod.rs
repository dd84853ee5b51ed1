//! Feature extraction modules
//!
//! This module contains all feature extraction algorithms:
//! - Onset envelope (energy flux)
//! - Period estimation (BPM detection)
//! - Chroma extraction
//! - Key detection
//!
//! [`FeatureExtractor`] is the seam between signal-level feature extraction
//! and key estimation. [`DspFeatureExtractor`] is the built-in implementation;
//! callers with their own chroma/tempo front end implement the trait instead.

pub mod chroma;
pub mod key;
pub mod onset;
pub mod period;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use chroma::extractor::extract_chroma;
use chroma::ChromaMatrix;
use period::{estimate_tempo, TempoEstimate};

/// Features consumed by key estimation and reported alongside it
#[derive(Debug, Clone)]
pub struct ExtractedFeatures {
    /// Tempo estimate
    pub tempo: TempoEstimate,

    /// Per-frame chroma
    pub chroma: ChromaMatrix,
}

/// Turns a decoded mono signal into tempo and chroma features
pub trait FeatureExtractor {
    /// Extract features from mono samples
    ///
    /// # Errors
    ///
    /// Implementations return `AnalysisError` for unusable input.
    fn extract(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<ExtractedFeatures, AnalysisError>;
}

/// STFT chroma + autocorrelation tempo, parameterized by [`AnalysisConfig`]
#[derive(Debug, Clone, Default)]
pub struct DspFeatureExtractor {
    config: AnalysisConfig,
}

impl DspFeatureExtractor {
    /// Create an extractor with the given configuration
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

impl FeatureExtractor for DspFeatureExtractor {
    fn extract(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<ExtractedFeatures, AnalysisError> {
        let tempo = estimate_tempo(samples, sample_rate, &self.config)?;
        let chroma = extract_chroma(samples, sample_rate, &self.config)?;
        Ok(ExtractedFeatures { tempo, chroma })
    }
}
