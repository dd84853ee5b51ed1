//! Configuration parameters for audio analysis

use crate::error::AnalysisError;

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Tempo estimation
    /// Frame size for the onset energy envelope (default: 2048)
    pub frame_size: usize,

    /// Hop size for the onset energy envelope (default: 512)
    pub hop_size: usize,

    /// Minimum BPM to consider (default: 60.0)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 180.0)
    pub max_bpm: f32,

    // Chroma extraction
    /// STFT frame size for chroma extraction (default: 4096)
    ///
    /// 4096 samples at 44.1 kHz gives ~10.8 Hz bin spacing, enough to separate
    /// adjacent semitones from roughly C3 upwards.
    pub chroma_frame_size: usize,

    /// STFT hop size for chroma extraction (default: 2048)
    pub chroma_hop_size: usize,

    /// Reference tuning frequency for A4 (default: 440.0 Hz)
    pub center_frequency: f32,

    /// Lowest frequency mapped into chroma bins (default: 65.0 Hz, ~C2)
    pub min_frequency: f32,

    /// Highest frequency mapped into chroma bins (default: 2000.0 Hz)
    ///
    /// Above this, overtones rather than fundamentals dominate the spectrum.
    pub max_frequency: f32,

    /// Spread each FFT bin over neighbouring semitones (default: false)
    pub soft_chroma_mapping: bool,

    /// Soft mapping standard deviation in semitones (default: 0.5)
    pub soft_mapping_sigma: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            min_bpm: 60.0,
            max_bpm: 180.0,
            chroma_frame_size: 4096,
            chroma_hop_size: 2048,
            center_frequency: 440.0,
            min_frequency: 65.0,
            max_frequency: 2000.0,
            soft_chroma_mapping: false,
            soft_mapping_sigma: 0.5,
        }
    }
}

impl AnalysisConfig {
    /// Check that all parameters are usable
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first bad parameter.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size == 0 || self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame and hop size must be > 0 (frame={}, hop={})",
                self.frame_size, self.hop_size
            )));
        }

        if self.chroma_frame_size == 0 || self.chroma_hop_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Chroma frame and hop size must be > 0 (frame={}, hop={})",
                self.chroma_frame_size, self.chroma_hop_size
            )));
        }

        if !(self.min_bpm > 0.0 && self.min_bpm < self.max_bpm) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                self.min_bpm, self.max_bpm
            )));
        }

        if !(self.center_frequency > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Center frequency must be > 0, got {}",
                self.center_frequency
            )));
        }

        if !(self.min_frequency > 0.0 && self.min_frequency < self.max_frequency) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid chroma frequency range: [{:.1}, {:.1}] Hz",
                self.min_frequency, self.max_frequency
            )));
        }

        if self.soft_chroma_mapping && !(self.soft_mapping_sigma > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Soft mapping sigma must be > 0, got {}",
                self.soft_mapping_sigma
            )));
        }

        Ok(())
    }
}
