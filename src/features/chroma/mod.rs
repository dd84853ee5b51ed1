//! Chroma extraction modules
//!
//! Pitch-class energy distribution (12 semitones) of an audio signal:
//! - Chroma vector and matrix types
//! - STFT-based chroma computation
//! - Normalization strategies

pub mod extractor;
pub mod normalization;

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Number of pitch classes per octave
pub const N_PITCH_CLASSES: usize = 12;

/// Energy per pitch class (index 0 = C, 11 = B)
///
/// Values are finite and non-negative. Construct with [`ChromaVector::new`] or
/// [`ChromaVector::from_slice`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromaVector([f32; N_PITCH_CLASSES]);

impl ChromaVector {
    /// Create a chroma vector
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if any value is negative or not finite.
    pub fn new(values: [f32; N_PITCH_CLASSES]) -> Result<Self, AnalysisError> {
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "Chroma value at index {} must be finite and non-negative, got {}",
                i, v
            )));
        }
        Ok(Self(values))
    }

    /// Create a chroma vector from a slice of exactly 12 values
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for the wrong length or invalid values.
    pub fn from_slice(values: &[f32]) -> Result<Self, AnalysisError> {
        let arr: [f32; N_PITCH_CLASSES] = values.try_into().map_err(|_| {
            AnalysisError::InvalidInput(format!(
                "Chroma vectors must have 12 elements, got {}",
                values.len()
            ))
        })?;
        Self::new(arr)
    }

    /// All-zero vector
    pub fn zeros() -> Self {
        Self([0.0; N_PITCH_CLASSES])
    }

    /// Raw values
    pub fn values(&self) -> &[f32; N_PITCH_CLASSES] {
        &self.0
    }

    /// Euclidean norm
    pub fn norm(&self) -> f32 {
        normalization::l2_norm(&self.0)
    }

    /// Unit-norm copy of this vector
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DegenerateInput` if the vector is all zero.
    pub fn normalized(&self) -> Result<Self, AnalysisError> {
        normalization::l2_normalize(&self.0).map(Self)
    }

    /// Transpose up by `semitones`: energy at pitch class `j` moves to `j + semitones`
    pub fn rotate(&self, semitones: usize) -> Self {
        let mut out = [0.0; N_PITCH_CLASSES];
        for (j, &v) in self.0.iter().enumerate() {
            out[(j + semitones) % N_PITCH_CLASSES] = v;
        }
        Self(out)
    }

    /// Index of the strongest pitch class (lowest index on ties)
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.0.iter().enumerate().skip(1) {
            if v > self.0[best] {
                best = i;
            }
        }
        best
    }
}

/// Time-indexed chroma: one [`ChromaVector`] per analysis frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromaMatrix {
    frames: Vec<ChromaVector>,
}

impl ChromaMatrix {
    /// Wrap a list of per-frame chroma vectors
    pub fn new(frames: Vec<ChromaVector>) -> Self {
        Self { frames }
    }

    /// Build from nested per-frame vectors (each must hold 12 values)
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first malformed frame.
    pub fn from_frames(frames: &[Vec<f32>]) -> Result<Self, AnalysisError> {
        let frames = frames
            .iter()
            .enumerate()
            .map(|(i, f)| {
                ChromaVector::from_slice(f).map_err(|e| {
                    AnalysisError::InvalidInput(format!("Chroma frame {}: {}", i, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { frames })
    }

    /// Per-frame chroma vectors
    pub fn frames(&self) -> &[ChromaVector] {
        &self.frames
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Mean chroma over all frames
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for an empty matrix.
    pub fn mean(&self) -> Result<ChromaVector, AnalysisError> {
        if self.frames.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Empty chroma matrix".to_string(),
            ));
        }

        let mut sum = [0.0f32; N_PITCH_CLASSES];
        for frame in &self.frames {
            for (acc, &v) in sum.iter_mut().zip(frame.values()) {
                *acc += v;
            }
        }
        let n = self.frames.len() as f32;
        for v in &mut sum {
            *v /= n;
        }
        ChromaVector::new(sum)
    }
}
