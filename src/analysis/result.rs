//! Analysis result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pitch class names in chromatic order starting at C
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the 12 pitch classes, independent of octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    /// C
    C,
    /// C sharp / D flat
    CSharp,
    /// D
    D,
    /// D sharp / E flat
    DSharp,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    FSharp,
    /// G
    G,
    /// G sharp / A flat
    GSharp,
    /// A
    A,
    /// A sharp / B flat
    ASharp,
    /// B
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Pitch class for a semitone index; wraps modulo 12
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Semitone index (0 = C, 11 = B)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Shift by `semitones` (negative values transpose down)
    ///
    /// ```
    /// use beatbank_dsp::PitchClass;
    ///
    /// assert_eq!(PitchClass::C.transpose(3), PitchClass::DSharp);
    /// assert_eq!(PitchClass::C.transpose(-1), PitchClass::B);
    /// ```
    pub fn transpose(self, semitones: i32) -> Self {
        let idx = (self.index() as i32 + semitones).rem_euclid(12);
        Self::from_index(idx as usize)
    }

    /// Note name using sharps ("C", "C#", ...)
    pub fn name(self) -> &'static str {
        PITCH_CLASS_NAMES[self.index()]
    }

    /// Parse a sharp-spelled note name
    pub fn from_name(name: &str) -> Option<Self> {
        PITCH_CLASS_NAMES
            .iter()
            .position(|&n| n == name)
            .map(Self::from_index)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tonal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Major key
    Major,
    /// Minor key
    Minor,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => f.write_str("Major"),
            Mode::Minor => f.write_str("Minor"),
        }
    }
}

/// Estimated key of a track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Tonic of the key
    pub pitch_class: PitchClass,

    /// Major or minor
    pub mode: Mode,

    /// Correlation of the winning key profile with the normalized chroma
    /// vector, in [-1.0, 1.0]
    pub confidence: f32,
}

impl KeyEstimate {
    /// Key name in musical notation (e.g., "C", "Am", "F#", "D#m")
    ///
    /// # Example
    ///
    /// ```
    /// use beatbank_dsp::{KeyEstimate, Mode, PitchClass};
    ///
    /// let key = KeyEstimate { pitch_class: PitchClass::A, mode: Mode::Minor, confidence: 0.9 };
    /// assert_eq!(key.name(), "Am");
    /// ```
    pub fn name(&self) -> String {
        match self.mode {
            Mode::Major => self.pitch_class.name().to_string(),
            Mode::Minor => format!("{}m", self.pitch_class.name()),
        }
    }

    /// Key in Camelot wheel notation (e.g., "8B" for C major, "8A" for A minor)
    ///
    /// Numbers follow the circle of fifths; relative major/minor pairs share a
    /// number.
    ///
    /// ```
    /// use beatbank_dsp::{KeyEstimate, Mode, PitchClass};
    ///
    /// let c = KeyEstimate { pitch_class: PitchClass::C, mode: Mode::Major, confidence: 1.0 };
    /// let g = KeyEstimate { pitch_class: PitchClass::G, mode: Mode::Major, confidence: 1.0 };
    /// assert_eq!(c.camelot(), "8B");
    /// assert_eq!(g.camelot(), "9B");
    /// ```
    pub fn camelot(&self) -> String {
        camelot_notation(self.pitch_class, self.mode)
    }
}

impl fmt::Display for KeyEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pitch_class, self.mode)
    }
}

/// Camelot number (1-12) of a major key's tonic
fn camelot_number_major(tonic: usize) -> usize {
    // C sits at 8; each step on the wheel is a fifth (7 semitones)
    (tonic * 7 % 12 + 7) % 12 + 1
}

/// Camelot notation for a tonic and mode
pub fn camelot_notation(tonic: PitchClass, mode: Mode) -> String {
    match mode {
        Mode::Major => format!("{}B", camelot_number_major(tonic.index())),
        // A minor key shares its number with its relative major (+3 semitones)
        Mode::Minor => format!("{}A", camelot_number_major((tonic.index() + 3) % 12)),
    }
}

/// Parse Camelot notation ("1A".."12B") back to tonic and mode
///
/// Returns `None` for malformed input.
///
/// ```
/// use beatbank_dsp::{parse_camelot, Mode, PitchClass};
///
/// assert_eq!(parse_camelot("8B"), Some((PitchClass::C, Mode::Major)));
/// assert_eq!(parse_camelot("8A"), Some((PitchClass::A, Mode::Minor)));
/// assert_eq!(parse_camelot("13A"), None);
/// ```
pub fn parse_camelot(notation: &str) -> Option<(PitchClass, Mode)> {
    let mut chars = notation.chars();
    let suffix = chars.next_back()?;
    let num: usize = chars.as_str().parse().ok()?;
    if !(1..=12).contains(&num) {
        return None;
    }

    let mode = match suffix {
        'A' => Mode::Minor,
        'B' => Mode::Major,
        _ => return None,
    };

    PitchClass::ALL
        .iter()
        .copied()
        .find(|&pc| camelot_notation(pc, mode) == notation)
        .map(|pc| (pc, mode))
}

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Best and second-best key scores nearly equal
    WeakTonality,
    /// No clear periodicity in the onset envelope
    LowTempoConfidence,
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// BPM estimate (0.0 when no periodicity was found)
    pub bpm: f32,

    /// BPM confidence (0.0-1.0)
    pub bpm_confidence: f32,

    /// Detected key
    pub key: KeyEstimate,

    /// Key clarity (0.0-1.0)
    ///
    /// Relative margin of the best key over the runner-up. Krumhansl
    /// correlations of neighbouring keys sit close together, so values above
    /// ~0.05 already indicate a clear winner.
    pub key_clarity: f32,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Number of chroma frames aggregated into the key estimate
    pub chroma_frames: usize,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,

    /// Confidence warnings (low confidence, ambiguous results, etc.)
    pub confidence_warnings: Vec<String>,
}
