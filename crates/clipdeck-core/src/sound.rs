//! PCM sound assets.

use crate::error::{ClipdeckError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bytes per stored sample (16-bit PCM).
pub const BYTES_PER_SAMPLE: usize = 2;

/// Unique identifier for a stored sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundId(pub Uuid);

impl SoundId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SoundId {
    fn default() -> Self {
        Self::new()
    }
}

/// A mono PCM sound asset.
///
/// Samples are 16-bit signed little-endian at the engine sample rate. The
/// length in samples is always derived from the vector, never stored.
#[derive(Debug, Clone)]
pub struct Sound {
    /// Unique sound ID
    pub id: SoundId,
    /// Mono 16-bit samples
    pub samples: Vec<i16>,
}

impl Sound {
    /// Create a sound from samples, assigning a fresh id.
    pub fn new(samples: Vec<i16>) -> Self {
        Self {
            id: SoundId::new(),
            samples,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the sound holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Decode little-endian 16-bit PCM bytes.
    pub fn from_raw_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % BYTES_PER_SAMPLE != 0 {
            return Err(ClipdeckError::CorruptContainer(format!(
                "PCM byte length {} is not sample-aligned",
                bytes.len()
            )));
        }
        let samples = bytes
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        Ok(Self::new(samples))
    }

    /// Encode the samples as little-endian bytes.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * BYTES_PER_SAMPLE);
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    /// Borrow the samples in `[start, end)`, clamped to the sound's length.
    ///
    /// Returns `SampleRangeInvalid` when the clamped range is empty, so
    /// callers never receive a zero-length window by accident.
    pub fn fetch(&self, start: usize, end: usize) -> Result<&[i16]> {
        let clamped_start = start.min(self.samples.len());
        let clamped_end = end.min(self.samples.len());
        if clamped_start >= clamped_end {
            return Err(ClipdeckError::SampleRangeInvalid {
                start,
                end,
                len: self.samples.len(),
            });
        }
        Ok(&self.samples[clamped_start..clamped_end])
    }

    /// Duration in seconds at the given sample rate.
    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        self.samples.len() as f64 / sample_rate as f64
    }
}
