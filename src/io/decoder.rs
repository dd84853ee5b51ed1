//! Audio decoding using Symphonia
//!
//! Any container/codec Symphonia is built with (WAV, AIFF, FLAC, MP3,
//! AAC/MP4, Vorbis, ...) is decoded to mono `f32` samples.

use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::downmix_interleaved;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded mono audio
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count of the source before downmixing
    pub channels: usize,
}

impl DecodedAudio {
    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode an audio file to mono PCM samples
///
/// Uses the file extension as a probing hint, decodes the first audio track
/// and averages all channels. Corrupt packets are skipped with a warning.
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if the file cannot be opened, the
/// format is not recognized, no audio track exists or decoding fails fatally.
pub fn decode_audio(path: impl AsRef<Path>) -> Result<DecodedAudio, AnalysisError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let file = File::open(path).map_err(|e| {
        AnalysisError::DecodingError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_error(path, e))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            AnalysisError::DecodingError(format!(
                "No supported audio tracks in {}",
                path.display()
            ))
        })?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
        AnalysisError::DecodingError(format!("Unknown sample rate in {}", path.display()))
    })?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(path, e))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(0);
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channels = spec.channels.count();

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend(downmix_interleaved(buf.samples(), channels)?);
            }
            Err(SymphoniaError::DecodeError(e)) => {
                skipped_packets += 1;
                log::warn!("Skipping corrupt packet in {}: {}", path.display(), e);
            }
            Err(e) => return Err(decode_error(path, e)),
        }
    }

    log::debug!(
        "Decoded {}: {} samples at {} Hz, {} channel(s), {} packet(s) skipped",
        path.display(),
        samples.len(),
        sample_rate,
        channels,
        skipped_packets
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

fn decode_error(path: &Path, e: SymphoniaError) -> AnalysisError {
    AnalysisError::DecodingError(format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = decode_audio("/definitely/not/here.wav").unwrap_err();
        assert!(matches!(err, AnalysisError::DecodingError(_)));
    }

    #[test]
    fn test_not_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.wav");
        std::fs::write(&path, b"this is not a RIFF file").unwrap();
        assert!(matches!(
            decode_audio(&path),
            Err(AnalysisError::DecodingError(_))
        ));
    }

    #[test]
    fn test_decode_stereo_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..22050 {
            writer.write_sample(16384i16).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let audio = decode_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.samples.len(), 22050);
        assert!((audio.duration_seconds() - 1.0).abs() < 1e-3);
        // Left at half scale, right silent -> quarter scale mono
        assert!(audio.samples.iter().all(|&s| (s - 0.25).abs() < 1e-3));
    }

    /// Minimal mono 16-bit AIFF: FORM header, COMM and SSND chunks, big-endian
    fn aiff_bytes(samples: &[i16]) -> Vec<u8> {
        let data_len = 2 * samples.len() as u32;
        let mut out = Vec::new();
        out.extend_from_slice(b"FORM");
        out.extend_from_slice(&(4 + 26 + 16 + data_len).to_be_bytes());
        out.extend_from_slice(b"AIFF");

        out.extend_from_slice(b"COMM");
        out.extend_from_slice(&18u32.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&(samples.len() as u32).to_be_bytes());
        out.extend_from_slice(&16u16.to_be_bytes());
        // 44100.0 as an 80-bit extended float
        out.extend_from_slice(&[0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]);

        out.extend_from_slice(b"SSND");
        out.extend_from_slice(&(8 + data_len).to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_be_bytes());
        }
        out
    }

    #[test]
    fn test_decode_aiff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.aiff");
        std::fs::write(&path, aiff_bytes(&[16384i16; 4410])).unwrap();

        let audio = decode_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 44100);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.samples.len(), 4410);
        assert!(audio.samples.iter().all(|&s| (s - 0.5).abs() < 1e-3));
    }
}
