//! PCM payload decoding.
//!
//! The speech service returns raw signed 16-bit little-endian PCM, base64
//! encoded, single channel at 24 kHz.

use crate::error::SpeechError;
use base64::Engine;

pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;

/// A decoded, playable buffer: normalized f32 samples tagged with their rate.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioClip {
    /// Decode a base64 PCM16-LE payload into normalized samples in
    /// [-1.0, 1.0).
    pub fn from_pcm16_base64(payload: &str) -> Result<Self, SpeechError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| SpeechError::Decode(format!("invalid base64: {e}")))?;
        if bytes.len() % 2 != 0 {
            return Err(SpeechError::Decode(format!(
                "odd byte count {} for 16-bit samples",
                bytes.len()
            )));
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
            .collect();

        Ok(Self {
            samples,
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
        })
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / (self.sample_rate as f32 * f32::from(self.channels))
    }
}
