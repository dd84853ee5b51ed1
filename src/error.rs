//! Error types for the analysis engine

use thiserror::Error;

/// Errors that can occur during audio analysis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Input cannot be normalized (all-zero chroma vector or key profile)
    ///
    /// This is the only error the key estimator itself produces. Callers
    /// decide whether to skip, retry or abort.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Audio decoding error
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// Processing error during analysis
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

impl AnalysisError {
    /// True for [`AnalysisError::DegenerateInput`]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, AnalysisError::DegenerateInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = AnalysisError::DegenerateInput("zero chroma".to_string());
        assert_eq!(e.to_string(), "Degenerate input: zero chroma");
        assert!(e.is_degenerate());

        let e = AnalysisError::DecodingError("bad header".to_string());
        assert_eq!(e.to_string(), "Decoding error: bad header");
        assert!(!e.is_degenerate());
    }
}
